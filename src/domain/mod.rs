//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine)
//! - `interview` - Action gating, enforcement, message composition and the orchestrator

pub mod foundation;
pub mod interview;
