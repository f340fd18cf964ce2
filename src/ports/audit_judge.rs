//! Audit Judge Port - Interface for grading a participant's answer.
//!
//! The judge reads the current question and the conversation so far and
//! returns an [`AuditResult`]: whether the answer is complete, which follow-up
//! to pin, topic coverage and tags. Implementations typically call an LLM.
//!
//! # Example
//!
//! ```ignore
//! struct AlwaysPass;
//!
//! #[async_trait]
//! impl AuditJudge for AlwaysPass {
//!     async fn audit(&self, _request: &AuditRequest) -> Result<AuditResult, CollaboratorError> {
//!         Ok(AuditResult::with_verdict(ALLOW_NEXT_QUESTION))
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::domain::foundation::SessionId;
use crate::domain::interview::{AuditResult, TranscriptEntry};

/// Port for judging answers.
#[async_trait]
pub trait AuditJudge: Send + Sync {
    /// Audits the participant's latest answer.
    async fn audit(&self, request: &AuditRequest) -> Result<AuditResult, CollaboratorError>;
}

/// Everything the judge sees for one answer.
#[derive(Debug, Clone)]
pub struct AuditRequest {
    pub session_id: SessionId,
    /// Question being answered.
    pub question: String,
    pub question_index: usize,
    /// The answer under audit.
    pub user_message: String,
    /// Conversation so far, excluding `user_message`.
    pub transcript: Vec<TranscriptEntry>,
    /// The last question only closes once its follow-ups are covered.
    pub is_final_question: bool,
    /// True while a pinned follow-up is awaiting an answer.
    pub followup_mode: bool,
}

/// Failure of an external collaborator (judge or generator).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollaboratorError {
    /// Service is down or refused the call.
    #[error("collaborator unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// Call did not finish in time.
    #[error("collaborator timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },

    /// Response could not be used.
    #[error("invalid collaborator response: {0}")]
    InvalidResponse(String),
}

impl CollaboratorError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }
}
