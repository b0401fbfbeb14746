//! Quiz definitions and grading. The engine is stateless: it validates a
//! definition and grades whatever answer set it is handed. Time-limit
//! enforcement belongs to the caller.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::error::{ValidationError, Violation};

pub const OPTIONS_PER_QUESTION: usize = 4;
pub const DEFAULT_POINTS: u32 = 10;

fn default_points() -> u32 {
    DEFAULT_POINTS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct QuizQuestion {
    /// Unique within the quiz, assigned at authoring time.
    pub id: u32,
    pub prompt: String,
    pub options: Vec<String>,
    /// Index into `options`.
    pub correct_answer: u8,
    #[serde(default = "default_points")]
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct QuizDefinition {
    pub questions: Vec<QuizQuestion>,
    /// Minimum percentage to pass, 0..=100.
    pub passing_score: u8,
    /// Minutes; `None` means unlimited.
    pub time_limit_minutes: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct GradeReport {
    pub score: u32,
    pub max_score: u32,
    pub percentage: u8,
    pub passed: bool,
}

pub fn is_passing(percentage: u8, passing_score: u8) -> bool {
    percentage >= passing_score
}

impl QuizDefinition {
    /// Collects every violation in the definition instead of stopping at the
    /// first, so authors see all problems in one round.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Vec::new();

        if self.passing_score > 100 {
            violations.push(Violation::field(
                "passing_score",
                "must be between 0 and 100",
            ));
        }

        if let Some(limit) = self.time_limit_minutes
            && limit == 0
        {
            violations.push(Violation::field(
                "time_limit_minutes",
                "must be a positive number of minutes",
            ));
        }

        let mut seen_ids = HashSet::new();
        for (index, question) in self.questions.iter().enumerate() {
            if question.options.len() != OPTIONS_PER_QUESTION {
                violations.push(Violation::question(
                    index,
                    format!(
                        "must have exactly {OPTIONS_PER_QUESTION} options, has {}",
                        question.options.len()
                    ),
                ));
            }
            if usize::from(question.correct_answer) >= OPTIONS_PER_QUESTION {
                violations.push(Violation::question(
                    index,
                    format!(
                        "correct_answer must be between 0 and {}",
                        OPTIONS_PER_QUESTION - 1
                    ),
                ));
            }
            if question.points == 0 {
                violations.push(Violation::question(index, "points must be positive"));
            }
            if !seen_ids.insert(question.id) {
                violations.push(Violation::question(
                    index,
                    format!("duplicate question id {}", question.id),
                ));
            }
        }

        ValidationError::check(violations)
    }

    /// Grades an answer set (question id -> selected option index).
    /// Unanswered questions score zero; a quiz with no questions is
    /// vacuously passed at 100%.
    pub fn grade(&self, answers: &HashMap<u32, u8>) -> GradeReport {
        let max_score: u32 = self.questions.iter().map(|q| q.points).sum();
        let score: u32 = self
            .questions
            .iter()
            .filter(|q| answers.get(&q.id) == Some(&q.correct_answer))
            .map(|q| q.points)
            .sum();

        let percentage = if max_score > 0 {
            ((f64::from(score) / f64::from(max_score)) * 100.0).round() as u8
        } else {
            100
        };

        GradeReport {
            score,
            max_score,
            percentage,
            passed: is_passing(percentage, self.passing_score),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn question(id: u32, correct: u8, points: u32) -> QuizQuestion {
        QuizQuestion {
            id,
            prompt: format!("q{id}"),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_answer: correct,
            points,
        }
    }

    fn definition(questions: Vec<QuizQuestion>, passing_score: u8) -> QuizDefinition {
        QuizDefinition {
            questions,
            passing_score,
            time_limit_minutes: None,
        }
    }

    #[test]
    fn full_correct_answers_score_100() {
        let quiz = definition(vec![question(1, 0, 10), question(2, 3, 5)], 70);
        let answers = HashMap::from([(1, 0), (2, 3)]);
        let report = quiz.grade(&answers);
        assert_eq!(report.score, 15);
        assert_eq!(report.max_score, 15);
        assert_eq!(report.percentage, 100);
        assert!(report.passed);
    }

    #[test]
    fn empty_answer_map_scores_0() {
        let quiz = definition(vec![question(1, 0, 10), question(2, 1, 10)], 70);
        let report = quiz.grade(&HashMap::new());
        assert_eq!(report.score, 0);
        assert_eq!(report.percentage, 0);
        assert!(!report.passed);
    }

    #[test]
    fn zero_question_quiz_is_vacuously_passed() {
        let quiz = definition(vec![], 70);
        let report = quiz.grade(&HashMap::new());
        assert_eq!(report.max_score, 0);
        assert_eq!(report.percentage, 100);
        assert!(report.passed);
    }

    #[test]
    fn wrong_answers_and_unknown_ids_score_nothing() {
        let quiz = definition(vec![question(1, 2, 10)], 50);
        let answers = HashMap::from([(1, 0), (99, 2)]);
        let report = quiz.grade(&answers);
        assert_eq!(report.score, 0);
        assert!(!report.passed);
    }

    #[test]
    fn two_of_three_rounds_to_67() {
        let quiz = definition(
            vec![question(1, 0, 10), question(2, 1, 10), question(3, 2, 10)],
            70,
        );
        let answers = HashMap::from([(1, 0), (2, 1), (3, 0)]);
        let report = quiz.grade(&answers);
        assert_eq!(report.percentage, 67);
        assert!(!report.passed);
    }

    #[test]
    fn is_passing_is_monotonic() {
        let passing_score = 70;
        let mut passed_before = false;
        for percentage in 0..=100u8 {
            let passed = is_passing(percentage, passing_score);
            assert!(passed || !passed_before, "pass flipped back at {percentage}");
            passed_before = passed;
        }
        assert!(is_passing(70, 70));
        assert!(!is_passing(69, 70));
    }

    #[test]
    fn validate_reports_every_offending_question() {
        let mut three_options = question(1, 0, 10);
        three_options.options.pop();
        let out_of_range = question(2, 4, 10);
        let zero_points = question(3, 1, 0);

        let quiz = definition(vec![three_options, out_of_range, zero_points], 70);
        let err = quiz.validate().unwrap_err();

        let indices: Vec<_> = err.violations().iter().filter_map(|v| v.question).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn validate_rejects_duplicate_ids_and_bad_bounds() {
        let quiz = QuizDefinition {
            questions: vec![question(7, 0, 10), question(7, 1, 10)],
            passing_score: 101,
            time_limit_minutes: Some(0),
        };
        let err = quiz.validate().unwrap_err();
        let fields: Vec<_> = err.violations().iter().map(|v| v.field.as_str()).collect();
        assert!(fields.contains(&"passing_score"));
        assert!(fields.contains(&"time_limit_minutes"));
        assert!(err.violations().iter().any(|v| v.question == Some(1)));
    }

    #[test]
    fn validate_accepts_a_well_formed_quiz() {
        let quiz = QuizDefinition {
            questions: vec![question(1, 0, 10), question(2, 3, 20)],
            passing_score: 100,
            time_limit_minutes: Some(15),
        };
        assert!(quiz.validate().is_ok());
    }
}
