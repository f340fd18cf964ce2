//! Scripted collaborators.
//!
//! In-memory implementations of the judge and generator ports that replay
//! queued responses. Used by tests and for offline demos.

mod audit_judge;
mod utterance_generator;

pub use audit_judge::ScriptedAuditJudge;
pub use utterance_generator::ScriptedGenerator;
