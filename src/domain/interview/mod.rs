//! Interview domain - the orchestrator's decision engine.
//!
//! Given a judge's audit of the participant's last answer and a generator's
//! proposed reply, decides which single action the interviewer takes, renders
//! the message, and moves through the question catalog.
//!
//! # Module Structure
//!
//! - `action` - Actions and the legal-action bitset
//! - `catalog` - Ordered question list
//! - `session` - Per-conversation state
//! - `audit` - Judge output and its tolerant parsing
//! - `tags` - Tag to forced-action table
//! - `gate` - Legal-action computation and heuristics
//! - `advancement` - Whether to leave the current question
//! - `transition` - Moving to the next question
//! - `enforcer` - Coercing proposals into legal actions
//! - `composer` - Message rendering
//! - `proposal` - Generator output parsing
//! - `orchestrator` - The per-turn loop tying it together

mod action;
mod advancement;
mod audit;
mod catalog;
mod composer;
mod enforcer;
mod errors;
mod orchestrator;
mod phase;
mod proposal;
mod session;
mod tags;

pub mod gate;
pub mod transition;

#[cfg(test)]
mod properties;

pub use action::{Action, ActionSet, UnknownAction};
pub use advancement::should_advance;
pub use audit::{
    looks_like_audit_reasoning, parse_coverage_map, signals_no_experience, AuditResult,
    AuditVerdict, CoverageMap, FollowupPrompt, FollowupStatus, ALLOW_NEXT_QUESTION,
};
pub use catalog::{Question, QuestionCatalog, QuestionKind};
pub use composer::{
    ensure_single_question, ComposerTexts, FirstPhrasePicker, MessageComposer, PhrasePicker,
    RandomPhrasePicker, DEFAULT_ACKNOWLEDGEMENT, DEFAULT_CLOSING, DEFAULT_GENERIC_PROMPT,
    DEFAULT_WELCOME,
};
pub use enforcer::enforce;
pub use errors::InterviewError;
pub use orchestrator::{
    InterviewOrchestrator, InterviewSettings, Speaker, TranscriptEntry, TurnOutcome, TurnPreview,
    MAX_FOLLOWUP_CAP,
};
pub use phase::InterviewPhase;
pub use proposal::ProposedTurn;
pub use session::{HintValue, QuestionProgress, SessionState, StyleHints};
pub use tags::{TagTable, NO_ABLE_ANSWER};
pub use transition::advance_to_next_question;
