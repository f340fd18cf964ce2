//! Ports - interfaces to the external collaborators of an interview.
//!
//! - `AuditJudge` - grades each answer
//! - `UtteranceGenerator` - drafts the interviewer's reply

mod audit_judge;
mod utterance_generator;

pub use audit_judge::{AuditJudge, AuditRequest, CollaboratorError};
pub use utterance_generator::{GenerationRequest, UtteranceGenerator};
