//! Foundation module - Shared domain primitives.
//!
//! Identifiers, timestamps, error types and the state machine trait that the
//! interview domain is built on.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::ValidationError;
pub use ids::SessionId;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
