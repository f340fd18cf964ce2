//! Top-level interview phase.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Stage of the interview as a whole.
///
/// `Main` while catalog questions remain, `Done` once the catalog is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewPhase {
    /// Asking catalog questions.
    #[default]
    Main,
    /// Catalog exhausted. Terminal.
    Done,
}

impl InterviewPhase {
    /// Returns true while questions are still being asked.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Main)
    }
}

impl StateMachine for InterviewPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            Self::Main => vec![Self::Main, Self::Done],
            Self::Done => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_phase_is_main() {
        assert_eq!(InterviewPhase::default(), InterviewPhase::Main);
    }

    #[test]
    fn serializes_to_snake_case() {
        assert_eq!(serde_json::to_string(&InterviewPhase::Done).unwrap(), "\"done\"");
    }

    #[test]
    fn main_can_finish() {
        assert_eq!(
            InterviewPhase::Main.transition_to(InterviewPhase::Done),
            Ok(InterviewPhase::Done)
        );
    }

    #[test]
    fn done_is_terminal() {
        assert!(InterviewPhase::Done.is_terminal());
        assert!(InterviewPhase::Done.transition_to(InterviewPhase::Main).is_err());
    }

    #[test]
    fn only_main_is_active() {
        assert!(InterviewPhase::Main.is_active());
        assert!(!InterviewPhase::Done.is_active());
    }
}
