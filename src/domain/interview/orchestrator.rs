//! Interview orchestrator - one conversation's turn loop
//!
//! Wires the gate, heuristics, enforcer, composer and transition engine into
//! a single synchronous `process_turn`. No I/O: the audit result and the
//! generator's proposal arrive already resolved.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, ValidationError};

use super::action::Action;
use super::advancement::should_advance;
use super::audit::{AuditResult, FollowupPrompt};
use super::catalog::QuestionCatalog;
use super::composer::{ComposerTexts, MessageComposer, PhrasePicker};
use super::enforcer::enforce;
use super::errors::InterviewError;
use super::gate;
use super::phase::InterviewPhase;
use super::proposal::ProposedTurn;
use super::session::SessionState;
use super::tags::TagTable;
use super::transition::advance_to_next_question;

/// Highest follow-up budget accepted for a single question.
pub const MAX_FOLLOWUP_CAP: u32 = 10;

/// Per-interview tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewSettings {
    pub followup_cap: u32,
    pub background_followup_cap: u32,
    pub tag_table: TagTable,
    pub texts: ComposerTexts,
}

impl Default for InterviewSettings {
    fn default() -> Self {
        Self {
            followup_cap: 3,
            background_followup_cap: 0,
            tag_table: TagTable::default(),
            texts: ComposerTexts::default(),
        }
    }
}

impl InterviewSettings {
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, cap) in [
            ("followup_cap", self.followup_cap),
            ("background_followup_cap", self.background_followup_cap),
        ] {
            if cap > MAX_FOLLOWUP_CAP {
                return Err(ValidationError::out_of_range(
                    field,
                    0,
                    MAX_FOLLOWUP_CAP as usize,
                    cap as usize,
                ));
            }
        }

        for (field, text) in [
            ("welcome_text", &self.texts.welcome),
            ("closing_text", &self.texts.closing),
            ("acknowledgement_text", &self.texts.acknowledgement),
            ("generic_prompt", &self.texts.generic_prompt),
        ] {
            if text.trim().is_empty() {
                return Err(ValidationError::empty_field(field));
            }
        }
        Ok(())
    }
}

/// Who said a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Interviewer,
    Participant,
}

/// One line of the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub text: String,
    pub question_index: usize,
    pub at: Timestamp,
}

/// Result of one processed turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOutcome {
    /// Message to show the participant.
    pub message: String,
    /// Action actually taken after enforcement.
    pub action: Action,
    /// Whether the interview moved past the question this turn.
    pub advanced: bool,
    /// Phase after the turn.
    pub phase: InterviewPhase,
    /// Current question after the turn.
    pub question_index: usize,
}

impl TurnOutcome {
    pub fn is_complete(&self) -> bool {
        self.phase == InterviewPhase::Done
    }
}

/// Legal actions and pinned follow-up for the turn being prepared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnPreview {
    pub legal_actions: Vec<Action>,
    pub pending_followup: Option<FollowupPrompt>,
}

/// Drives a single interview from welcome to closing.
#[derive(Debug)]
pub struct InterviewOrchestrator {
    state: SessionState,
    composer: MessageComposer,
    transcript: Vec<TranscriptEntry>,
    opened: bool,
}

impl InterviewOrchestrator {
    /// Creates an orchestrator positioned on the first question.
    pub fn new(catalog: QuestionCatalog, settings: InterviewSettings) -> Result<Self, InterviewError> {
        settings.validate()?;

        let state = SessionState::new(catalog, settings.followup_cap)
            .with_background_followup_cap(settings.background_followup_cap)
            .with_tag_table(settings.tag_table);

        Ok(Self {
            state,
            composer: MessageComposer::new(settings.texts),
            transcript: Vec::new(),
            opened: false,
        })
    }

    /// Replaces the transition phrase picker.
    pub fn with_picker(mut self, picker: impl PhrasePicker + 'static) -> Self {
        self.composer = self.composer.with_picker(picker);
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub fn is_opened(&self) -> bool {
        self.opened
    }

    pub fn is_complete(&self) -> bool {
        !self.state.phase().is_active()
    }

    /// Ordered legal actions to offer the text generator.
    pub fn legal_actions_for_prompt(&self) -> Vec<Action> {
        self.state.legal_actions_for_prompt()
    }

    /// Produces the first outbound message: the welcome plus the first question.
    pub fn open(&mut self) -> Result<String, InterviewError> {
        if self.opened {
            return Err(InterviewError::AlreadyOpened);
        }

        let message = self.composer.compose(
            &self.state,
            Action::NextQuestion,
            "",
            self.state.current_question(),
            self.state.next_question(),
            self.state.style_hints(),
            true,
        );
        self.opened = true;
        self.record(Speaker::Interviewer, &message);

        tracing::info!(
            session_id = %self.state.session_id(),
            questions = self.state.catalog().len(),
            "Interview opened"
        );
        Ok(message)
    }

    /// Processes one participant reply.
    ///
    /// `audit` is the judge's verdict on the reply; `proposal` is what the
    /// text generator suggested saying next.
    pub fn process_turn(
        &mut self,
        user_message: &str,
        audit: &AuditResult,
        proposal: &ProposedTurn,
    ) -> Result<TurnOutcome, InterviewError> {
        if !self.opened {
            return Err(InterviewError::NotOpened);
        }
        if self.is_complete() {
            return Err(InterviewError::InterviewComplete);
        }

        self.record(Speaker::Participant, user_message);

        let question = self.state.question_index();
        let is_final = self.state.is_final_question();

        ingest_audit(&mut self.state, audit);

        let enforced = enforce(&self.state, proposal.action, question);
        if enforced == Action::AskFollowup {
            self.state.register_followup(question);
        }

        let advance = !self.state.has_pending_followup()
            && should_advance(&audit.verdict, &self.state, question, is_final, |q| {
                self.state.all_followups_covered(q)
            });

        let action = if advance && is_final {
            Action::End
        } else {
            enforced
        };

        tracing::debug!(
            question_index = question,
            verdict = %audit.verdict,
            proposed = ?proposal.action,
            action = %action,
            advance,
            "Turn decided"
        );

        let message = self.composer.compose(
            &self.state,
            action,
            &proposal.utterance,
            self.state.current_question(),
            self.state.next_question(),
            self.state.style_hints(),
            false,
        );

        if action == Action::AskFollowup {
            gate::consume_pending_followup(&mut self.state);
        }
        if advance {
            advance_to_next_question(&mut self.state);
        }
        self.record(Speaker::Interviewer, &message);

        Ok(TurnOutcome {
            message,
            action,
            advanced: advance,
            phase: self.state.phase(),
            question_index: self.state.question_index(),
        })
    }

    /// What the next turn would offer the generator once `audit` is applied.
    ///
    /// Works on a copy; the session is untouched.
    pub fn preview_turn(&self, audit: &AuditResult) -> TurnPreview {
        let mut state = self.state.clone();
        ingest_audit(&mut state, audit);
        TurnPreview {
            legal_actions: state.legal_actions_for_prompt(),
            pending_followup: state.pending_followup().cloned(),
        }
    }

    fn record(&mut self, speaker: Speaker, text: &str) {
        self.transcript.push(TranscriptEntry {
            speaker,
            text: text.to_string(),
            question_index: self.state.question_index(),
            at: Timestamp::now(),
        });
    }
}

/// Applies an audit round and the heuristics that depend on it.
fn ingest_audit(state: &mut SessionState, audit: &AuditResult) {
    let question = state.question_index();
    let is_final = state.is_final_question();

    gate::apply_audit(state, audit);
    if audit.scores.is_some() {
        state.record_scores(question, audit.scores.clone());
    }

    let covered = state.all_followups_covered(question);
    gate::apply_no_experience_heuristic(state, question, is_final, |_| covered);
    gate::apply_style_heuristics(state);
}
