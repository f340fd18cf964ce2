//! Application layer - Commands and Handlers.
//!
//! This layer awaits the external collaborators and feeds their resolved
//! outputs to the synchronous interview domain.

pub mod handlers;

pub use handlers::{ConductTurnCommand, ConductTurnError, ConductTurnHandler, ConductTurnResult};
