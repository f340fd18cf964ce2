//! Session state for one interview conversation.
//!
//! Owned exclusively by one conversation and mutated only by the gate, the
//! transition engine and the heuristics. Nothing here performs I/O; the type
//! is serializable so an outside persistence layer can store it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::domain::foundation::{SessionId, Timestamp};

use super::action::{Action, ActionSet};
use super::audit::{CoverageMap, FollowupPrompt, FollowupStatus};
use super::catalog::{QuestionCatalog, QuestionKind};
use super::phase::InterviewPhase;
use super::tags::TagTable;

/// Progress on a single question. Created on first touch, never removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionProgress {
    /// Question text, kept for observability.
    pub question: String,
    pub followup_count: u32,
    pub last_scores: Option<Value>,
    /// Set by the no-experience heuristic.
    pub skip: bool,
    /// Every follow-up topic surfaced for this question, with its latest status.
    pub coverage: CoverageMap,
}

impl QuestionProgress {
    fn for_question(question: &str) -> Self {
        Self {
            question: question.to_string(),
            ..Default::default()
        }
    }

    /// True when every surfaced topic is covered (vacuously true with none).
    pub fn all_topics_covered(&self) -> bool {
        self.coverage.values().all(FollowupStatus::is_covered)
    }
}

/// A style hint value outside the named ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HintValue {
    Flag(bool),
    Choice(String),
}

/// Hints the composer reads when rendering text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleHints {
    /// Lead a question change with a transition phrase.
    #[serde(default)]
    pub prefer_transition: bool,
    /// Recap background answers with a neutral acknowledgement only.
    #[serde(default)]
    pub avoid_outcome_for_background_only: bool,
    #[serde(default, flatten)]
    pub extra: BTreeMap<String, HintValue>,
}

impl StyleHints {
    /// Reads a boolean hint by name, named hints included.
    pub fn flag(&self, name: &str) -> bool {
        match name {
            "prefer_transition" | "preferTransition" => self.prefer_transition,
            "avoid_outcome_for_background_only" | "avoidOutcomeForBackgroundOnly" => {
                self.avoid_outcome_for_background_only
            }
            other => matches!(self.extra.get(other), Some(HintValue::Flag(true))),
        }
    }
}

/// Mutable record of interview progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub(crate) session_id: SessionId,
    pub(crate) started_at: Timestamp,
    pub(crate) catalog: QuestionCatalog,
    pub(crate) phase: InterviewPhase,
    pub(crate) question_index: usize,
    pub(crate) legal_actions: ActionSet,
    pub(crate) progress: BTreeMap<usize, QuestionProgress>,
    pub(crate) followup_cap: u32,
    pub(crate) background_followup_cap: u32,
    pub(crate) last_completion_audit: Option<Value>,
    pub(crate) last_presence_audit: Option<Value>,
    pub(crate) last_tags: Vec<String>,
    pub(crate) pending_followup: Option<FollowupPrompt>,
    pub(crate) followup_coverage: Option<CoverageMap>,
    pub(crate) style_hints: StyleHints,
    pub(crate) tag_table: TagTable,
}

impl SessionState {
    /// Starts a session on the first question with the baseline actions legal.
    pub fn new(catalog: QuestionCatalog, followup_cap: u32) -> Self {
        Self {
            session_id: SessionId::new(),
            started_at: Timestamp::now(),
            catalog,
            phase: InterviewPhase::Main,
            question_index: 0,
            legal_actions: ActionSet::baseline(),
            progress: BTreeMap::new(),
            followup_cap,
            background_followup_cap: 0,
            last_completion_audit: None,
            last_presence_audit: None,
            last_tags: Vec::new(),
            pending_followup: None,
            followup_coverage: None,
            style_hints: StyleHints::default(),
            tag_table: TagTable::default(),
        }
    }

    /// Sets the follow-up budget for background questions.
    pub fn with_background_followup_cap(mut self, cap: u32) -> Self {
        self.background_followup_cap = cap;
        self
    }

    /// Replaces the tag table.
    pub fn with_tag_table(mut self, table: TagTable) -> Self {
        self.tag_table = table;
        self
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    pub fn phase(&self) -> InterviewPhase {
        self.phase
    }

    pub fn question_index(&self) -> usize {
        self.question_index
    }

    /// Current question text; `None` once the interview is done.
    pub fn current_question(&self) -> Option<&str> {
        if !self.phase.is_active() {
            return None;
        }
        self.catalog.text(self.question_index)
    }

    /// Question after the current one, if any.
    pub fn next_question(&self) -> Option<&str> {
        if !self.phase.is_active() {
            return None;
        }
        self.catalog.next_text(self.question_index)
    }

    pub fn is_final_question(&self) -> bool {
        self.phase.is_active() && self.catalog.is_final(self.question_index)
    }

    pub fn current_kind(&self) -> QuestionKind {
        self.catalog.kind(self.question_index)
    }

    pub fn legal_actions(&self) -> ActionSet {
        self.legal_actions
    }

    pub fn is_legal(&self, action: Action) -> bool {
        self.legal_actions.contains(action)
    }

    /// Ordered legal actions, as offered to the text generator.
    pub fn legal_actions_for_prompt(&self) -> Vec<Action> {
        self.legal_actions.to_vec()
    }

    pub fn pending_followup(&self) -> Option<&FollowupPrompt> {
        self.pending_followup.as_ref()
    }

    pub fn has_pending_followup(&self) -> bool {
        self.pending_followup.is_some()
    }

    pub fn last_tags(&self) -> &[String] {
        &self.last_tags
    }

    /// True if the latest tags force moving on.
    pub fn tags_fast_forward(&self) -> bool {
        self.tag_table.fast_forwards(&self.last_tags)
    }

    /// In-question action the latest tags force, if any.
    pub fn tag_forced_action(&self) -> Option<Action> {
        self.tag_table.forced_action(&self.last_tags)
    }

    pub fn tag_table(&self) -> &TagTable {
        &self.tag_table
    }

    pub fn followup_coverage(&self) -> Option<&CoverageMap> {
        self.followup_coverage.as_ref()
    }

    pub fn style_hints(&self) -> &StyleHints {
        &self.style_hints
    }

    pub fn last_completion_audit(&self) -> Option<&Value> {
        self.last_completion_audit.as_ref()
    }

    pub fn last_presence_audit(&self) -> Option<&Value> {
        self.last_presence_audit.as_ref()
    }

    pub fn followup_cap(&self) -> u32 {
        self.followup_cap
    }

    /// Progress on a question, if it has been touched.
    pub fn progress(&self, question: usize) -> Option<&QuestionProgress> {
        self.progress.get(&question)
    }

    pub(crate) fn progress_mut(&mut self, question: usize) -> &mut QuestionProgress {
        let text = self.catalog.text(question).unwrap_or_default().to_string();
        self.progress
            .entry(question)
            .or_insert_with(|| QuestionProgress::for_question(&text))
    }

    /// Follow-ups asked so far on a question.
    pub fn followup_count(&self, question: usize) -> u32 {
        self.progress(question).map(|p| p.followup_count).unwrap_or(0)
    }

    /// Follow-up budget for a question, by kind.
    pub fn cap_for(&self, question: usize) -> u32 {
        match self.catalog.kind(question) {
            QuestionKind::Background => self.background_followup_cap,
            QuestionKind::Main => self.followup_cap,
        }
    }

    /// Counts one follow-up against the question's budget.
    pub fn register_followup(&mut self, question: usize) {
        self.progress_mut(question).followup_count += 1;
    }

    /// True once the question's follow-up budget is spent.
    pub fn at_followup_cap(&self, question: usize) -> bool {
        self.followup_count(question) >= self.cap_for(question)
    }

    /// Stores the judge's latest opaque scores for a question.
    pub fn record_scores(&mut self, question: usize, scores: Option<Value>) {
        self.progress_mut(question).last_scores = scores;
    }

    /// Overwrites both audit payloads.
    pub fn store_audits(&mut self, completion: Option<Value>, presence: Option<Value>) {
        self.last_completion_audit = completion;
        self.last_presence_audit = presence;
    }

    pub fn is_skipped(&self, question: usize) -> bool {
        self.progress(question).map(|p| p.skip).unwrap_or(false)
    }

    /// Default coverage check: every topic ever surfaced for the question is covered.
    pub fn all_followups_covered(&self, question: usize) -> bool {
        self.progress(question)
            .map(QuestionProgress::all_topics_covered)
            .unwrap_or(true)
    }
}
