//! State machine trait for status enums.
//!
//! Gives lifecycle enums (such as the interview phase) one way to declare
//! their legal transitions and to perform checked transitions.

use super::ValidationError;

/// Trait for status enums that represent state machines.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for InterviewPhase {
///     fn can_transition_to(&self, target: &Self) -> bool {
///         matches!((self, target), (Main, Main) | (Main, Done))
///     }
///
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             Main => vec![Main, Done],
///             Done => vec![],
///         }
///     }
/// }
///
/// let next = InterviewPhase::Main.transition_to(InterviewPhase::Done)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
