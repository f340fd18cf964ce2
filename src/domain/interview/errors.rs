//! Error types for the interview domain

use crate::domain::foundation::ValidationError;

/// Misuse of an interview orchestrator.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum InterviewError {
    #[error("Interview has not been opened yet")]
    NotOpened,

    #[error("Interview was already opened")]
    AlreadyOpened,

    #[error("Interview is complete; no further turns are accepted")]
    InterviewComplete,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_misuse_errors() {
        assert_eq!(
            InterviewError::NotOpened.to_string(),
            "Interview has not been opened yet"
        );
        assert!(InterviewError::InterviewComplete
            .to_string()
            .contains("complete"));
    }

    #[test]
    fn wraps_validation_errors() {
        let err: InterviewError = ValidationError::empty_field("questions").into();
        assert!(matches!(err, InterviewError::Validation(_)));
        assert!(err.to_string().contains("questions"));
    }
}
