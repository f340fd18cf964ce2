//! Adapters - Implementations of port interfaces.
//!
//! - `scripted` - In-memory judge and generator that replay queued responses

pub mod scripted;

pub use scripted::{ScriptedAuditJudge, ScriptedGenerator};
