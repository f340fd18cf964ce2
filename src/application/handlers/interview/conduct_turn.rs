//! ConductTurnHandler - Runs one participant reply through the collaborators
//! and the orchestrator.
//!
//! The judge and generator are awaited first; the synchronous orchestrator is
//! only called with their resolved outputs. Collaborator failures never fail
//! the turn: a failed audit counts as "not yet" and a failed generation as an
//! empty proposal, so the fixed texts and pinned follow-ups still work.

use std::sync::Arc;

use crate::domain::foundation::Timestamp;
use crate::domain::interview::{
    AuditResult, InterviewError, InterviewOrchestrator, ProposedTurn, Speaker, TranscriptEntry,
    TurnOutcome,
};
use crate::ports::{AuditJudge, AuditRequest, GenerationRequest, UtteranceGenerator};

/// Command carrying the participant's reply.
#[derive(Debug, Clone)]
pub struct ConductTurnCommand {
    pub message: String,
}

impl ConductTurnCommand {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result of a conducted turn.
#[derive(Debug, Clone)]
pub struct ConductTurnResult {
    pub outcome: TurnOutcome,
    /// The judge failed and a "not yet" audit was used instead.
    pub audit_degraded: bool,
    /// The generator failed and an empty proposal was used instead.
    pub generation_degraded: bool,
}

/// Errors from conducting a turn.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ConductTurnError {
    #[error("Message cannot be empty")]
    EmptyMessage,

    #[error(transparent)]
    Interview(#[from] InterviewError),
}

/// Handler for participant turns.
pub struct ConductTurnHandler {
    judge: Arc<dyn AuditJudge>,
    generator: Arc<dyn UtteranceGenerator>,
}

impl ConductTurnHandler {
    pub fn new(judge: Arc<dyn AuditJudge>, generator: Arc<dyn UtteranceGenerator>) -> Self {
        Self { judge, generator }
    }

    /// Processes one reply. Turns of a single interview must not overlap,
    /// which the `&mut` borrow enforces.
    pub async fn handle(
        &self,
        interview: &mut InterviewOrchestrator,
        cmd: ConductTurnCommand,
    ) -> Result<ConductTurnResult, ConductTurnError> {
        // 1. Validate input and interview state before spending collaborator calls
        let message = cmd.message.trim();
        if message.is_empty() {
            return Err(ConductTurnError::EmptyMessage);
        }
        if !interview.is_opened() {
            return Err(InterviewError::NotOpened.into());
        }
        if interview.is_complete() {
            return Err(InterviewError::InterviewComplete.into());
        }

        let state = interview.state();
        let session_id = state.session_id();
        let question_index = state.question_index();
        let question = state.current_question().unwrap_or_default().to_string();

        // 2. Audit the answer
        let audit_request = AuditRequest {
            session_id,
            question: question.clone(),
            question_index,
            user_message: message.to_string(),
            transcript: interview.transcript().to_vec(),
            is_final_question: state.is_final_question(),
            followup_mode: state.has_pending_followup(),
        };

        let (audit, audit_degraded) = match self.judge.audit(&audit_request).await {
            Ok(audit) => (audit, false),
            Err(err) => {
                tracing::warn!(
                    session_id = %session_id,
                    question_index,
                    error = %err,
                    "Audit failed; treating answer as incomplete"
                );
                (AuditResult::default(), true)
            }
        };

        // 3. Ask the generator, offering what the audit makes legal
        let preview = interview.preview_turn(&audit);
        let mut transcript = interview.transcript().to_vec();
        transcript.push(TranscriptEntry {
            speaker: Speaker::Participant,
            text: message.to_string(),
            question_index,
            at: Timestamp::now(),
        });

        let generation_request = GenerationRequest {
            session_id,
            question,
            next_question: interview.state().next_question().map(str::to_string),
            legal_actions: preview.legal_actions,
            pending_followup: preview.pending_followup,
            transcript,
        };

        let (proposal, generation_degraded) =
            match self.generator.generate(&generation_request).await {
                Ok(raw) => (ProposedTurn::parse(&raw), false),
                Err(err) => {
                    tracing::warn!(
                        session_id = %session_id,
                        question_index,
                        error = %err,
                        "Generation failed; continuing with an empty proposal"
                    );
                    (ProposedTurn::default(), true)
                }
            };

        // 4. Decide and render
        let outcome = interview.process_turn(message, &audit, &proposal)?;

        tracing::debug!(
            session_id = %session_id,
            action = %outcome.action,
            advanced = outcome.advanced,
            "Turn conducted"
        );

        Ok(ConductTurnResult {
            outcome,
            audit_degraded,
            generation_degraded,
        })
    }
}
