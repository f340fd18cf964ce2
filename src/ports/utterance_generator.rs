//! Utterance Generator Port - Interface for drafting the interviewer's reply.
//!
//! The generator is offered the legal actions and returns raw text, ideally
//! a JSON object with `action` and `utterance`. The orchestrator parses it
//! leniently and enforces the action, so generators may be sloppy.

use async_trait::async_trait;

use crate::domain::foundation::SessionId;
use crate::domain::interview::{Action, FollowupPrompt, TranscriptEntry};

use super::CollaboratorError;

/// Port for drafting replies.
#[async_trait]
pub trait UtteranceGenerator: Send + Sync {
    /// Returns the generator's raw output for the next turn.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, CollaboratorError>;
}

/// Context handed to the generator.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub session_id: SessionId,
    pub question: String,
    pub next_question: Option<String>,
    /// Ordered; the generator should pick one of these.
    pub legal_actions: Vec<Action>,
    pub pending_followup: Option<FollowupPrompt>,
    pub transcript: Vec<TranscriptEntry>,
}

impl GenerationRequest {
    /// Wire names of the legal actions, for prompt templates.
    pub fn legal_action_names(&self) -> Vec<&'static str> {
        self.legal_actions.iter().map(Action::as_str).collect()
    }
}
