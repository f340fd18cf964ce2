//! Application handlers.
//!
//! Command handlers that coordinate ports with the interview domain.

pub mod interview;

pub use interview::{ConductTurnCommand, ConductTurnError, ConductTurnHandler, ConductTurnResult};
