//! Course content domain: lesson content variants, quiz grading, catalog
//! ordering. Pure and storage-free; persistence lives in `crate::model`.

mod error;
pub use error::{ValidationError, Violation};

pub mod catalog;
pub use catalog::{CatalogEntry, SectionGroup, ordered_sections, validate_reorder};

pub mod quiz;
pub use quiz::{GradeReport, QuizDefinition, QuizQuestion, is_passing};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Video,
    Text,
    Quiz,
}

impl ContentType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "video" => Some(Self::Video),
            "text" => Some(Self::Text),
            "quiz" => Some(Self::Quiz),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Text => "text",
            Self::Quiz => "quiz",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Untyped column soup a lesson row (or create payload) carries before the
/// declared content type is applied to it.
#[derive(Debug, Clone, Default)]
pub struct RawContent {
    pub text_body: Option<String>,
    pub video_url: Option<String>,
    pub video_duration_minutes: u32,
    pub quiz: Option<QuizDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LessonContent {
    Video { url: String, duration_minutes: u32 },
    Text { body: String },
    Quiz(QuizDefinition),
}

impl LessonContent {
    /// Checks that the payload matches the declared content type and returns
    /// the typed variant. All violations are collected, not just the first.
    pub fn assemble(kind: ContentType, raw: RawContent) -> Result<Self, ValidationError> {
        match kind {
            ContentType::Video => {
                let url = raw.video_url.unwrap_or_default();
                if url.trim().is_empty() {
                    return Err(ValidationError::single(Violation::field(
                        "video_url",
                        "video lessons require a source url",
                    )));
                }
                Ok(Self::Video {
                    url,
                    duration_minutes: raw.video_duration_minutes,
                })
            }
            ContentType::Text => match raw.text_body {
                // empty body is permitted, absence is not
                Some(body) => Ok(Self::Text { body }),
                None => Err(ValidationError::single(Violation::field(
                    "content",
                    "text lessons require a content body",
                ))),
            },
            ContentType::Quiz => {
                let definition = raw.quiz.ok_or_else(|| {
                    ValidationError::single(Violation::field(
                        "quiz_questions",
                        "quiz lessons require a question list",
                    ))
                })?;
                definition.validate()?;
                Ok(Self::Quiz(definition))
            }
        }
    }

    pub fn content_type(&self) -> ContentType {
        match self {
            Self::Video { .. } => ContentType::Video,
            Self::Text { .. } => ContentType::Text,
            Self::Quiz(_) => ContentType::Quiz,
        }
    }

    pub fn quiz(&self) -> Option<&QuizDefinition> {
        match self {
            Self::Quiz(definition) => Some(definition),
            _ => None,
        }
    }
}

/// Completed published lessons over total published lessons, rounded.
/// A course with no published lessons reports 0 (unlike the vacuous quiz
/// pass, which reports 100).
pub fn progress_percentage(completed: i64, total_published: i64) -> i32 {
    if total_published <= 0 {
        return 0;
    }
    ((completed as f64 / total_published as f64) * 100.0).round() as i32
}

#[cfg(test)]
mod test {
    use super::*;

    fn question(id: u32) -> QuizQuestion {
        QuizQuestion {
            id,
            prompt: format!("q{id}"),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_answer: 0,
            points: 10,
        }
    }

    #[test]
    fn assemble_video_requires_url() {
        let err = LessonContent::assemble(ContentType::Video, RawContent::default()).unwrap_err();
        assert_eq!(err.violations()[0].field, "video_url");

        let raw = RawContent {
            video_url: Some("https://videos.example/intro.mp4".into()),
            ..Default::default()
        };
        let content = LessonContent::assemble(ContentType::Video, raw).unwrap();
        assert_eq!(content.content_type(), ContentType::Video);
    }

    #[test]
    fn assemble_video_duration_defaults_to_zero() {
        let raw = RawContent {
            video_url: Some("https://videos.example/intro.mp4".into()),
            ..Default::default()
        };
        match LessonContent::assemble(ContentType::Video, raw).unwrap() {
            LessonContent::Video { duration_minutes, .. } => assert_eq!(duration_minutes, 0),
            other => panic!("expected video, got {other:?}"),
        }
    }

    #[test]
    fn assemble_text_accepts_empty_body_but_not_absence() {
        let raw = RawContent {
            text_body: Some(String::new()),
            ..Default::default()
        };
        assert!(LessonContent::assemble(ContentType::Text, raw).is_ok());

        let err = LessonContent::assemble(ContentType::Text, RawContent::default()).unwrap_err();
        assert_eq!(err.violations()[0].field, "content");
    }

    #[test]
    fn assemble_quiz_delegates_to_definition_validation() {
        let mut bad = question(1);
        bad.options.pop();
        let raw = RawContent {
            quiz: Some(QuizDefinition {
                questions: vec![bad],
                passing_score: 70,
                time_limit_minutes: None,
            }),
            ..Default::default()
        };
        let err = LessonContent::assemble(ContentType::Quiz, raw).unwrap_err();
        assert_eq!(err.violations()[0].question, Some(0));
    }

    #[test]
    fn content_type_parse_rejects_unknown() {
        assert_eq!(ContentType::parse("video"), Some(ContentType::Video));
        assert_eq!(ContentType::parse("podcast"), None);
    }

    #[test]
    fn progress_zero_published_lessons_is_zero() {
        assert_eq!(progress_percentage(0, 0), 0);
        assert_eq!(progress_percentage(3, 0), 0);
    }

    #[test]
    fn progress_rounds() {
        assert_eq!(progress_percentage(2, 3), 67);
        assert_eq!(progress_percentage(1, 3), 33);
        assert_eq!(progress_percentage(3, 3), 100);
    }
}
