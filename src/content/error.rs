use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct Violation {
    /// Payload field the violation refers to.
    pub field: String,
    /// Index of the offending quiz question, when applicable.
    pub question: Option<usize>,
    pub message: String,
}

impl Violation {
    pub fn field<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self {
            field: field.into(),
            question: None,
            message: message.into(),
        }
    }

    pub fn question<M: Into<String>>(index: usize, message: M) -> Self {
        Self {
            field: String::from("quiz_questions"),
            question: Some(index),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.question {
            Some(index) => write!(f, "{} (question {}): {}", self.field, index, self.message),
            None => write!(f, "{}: {}", self.field, self.message),
        }
    }
}

/// Carries every violation found in a payload so the caller can surface all
/// of them at once instead of fixing one at a time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", render(.violations))]
pub struct ValidationError {
    violations: Vec<Violation>,
}

fn render(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    pub fn new(violations: Vec<Violation>) -> Self {
        debug_assert!(!violations.is_empty());
        Self { violations }
    }

    pub fn single(violation: Violation) -> Self {
        Self::new(vec![violation])
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Ok when nothing was collected, Err wrapping the batch otherwise.
    pub fn check(violations: Vec<Violation>) -> Result<(), ValidationError> {
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(violations))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn check_collects_everything() {
        let err = ValidationError::check(vec![
            Violation::question(0, "needs exactly 4 options"),
            Violation::question(2, "correct_answer out of range"),
        ])
        .unwrap_err();

        assert_eq!(err.violations().len(), 2);
        let rendered = err.to_string();
        assert!(rendered.contains("question 0"));
        assert!(rendered.contains("question 2"));
    }

    #[test]
    fn check_empty_is_ok() {
        assert!(ValidationError::check(vec![]).is_ok());
    }
}
