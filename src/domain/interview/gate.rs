//! Action gate.
//!
//! After each audit round these functions decide exactly which actions are
//! legal for the upcoming turn and whether one follow-up is pinned.

use serde_json::Value;

use super::action::ActionSet;
use super::audit::{
    looks_like_audit_reasoning, parse_coverage_map, signals_no_experience, AuditResult,
    AuditVerdict, FollowupPrompt, FollowupStatus,
};
use super::catalog::QuestionKind;
use super::session::SessionState;

/// Ingests one audit round: stores its payloads and recomputes the gate.
pub fn apply_audit(state: &mut SessionState, audit: &AuditResult) {
    state.store_audits(audit.completion_audit.clone(), audit.presence_audit.clone());
    apply_audit_result(
        state,
        &audit.verdict,
        audit.coverage_map.as_ref(),
        audit.next_followup.as_ref(),
        audit.tags.as_deref(),
    );
}

/// Recomputes legal actions and the pending follow-up from an audit verdict.
///
/// Fast-forward (a tag mapped to `NEXT_QUESTION`, or `ALLOW_NEXT_QUESTION`)
/// wins over everything else and clears any pending follow-up. Otherwise a
/// pending follow-up allows only `ASK_FOLLOWUP`.
pub fn apply_audit_result(
    state: &mut SessionState,
    verdict: &AuditVerdict,
    coverage_map: Option<&Value>,
    next_followup: Option<&FollowupPrompt>,
    tags: Option<&[String]>,
) {
    if let Some(tags) = tags {
        state.last_tags = tags.to_vec();
    }

    if let Some(coverage) = coverage_map.and_then(parse_coverage_map) {
        let question = state.question_index;
        state
            .progress_mut(question)
            .coverage
            .extend(coverage.iter().map(|(topic, status)| (topic.clone(), *status)));
        state.followup_coverage = Some(coverage);
    }

    if verdict.allows_next() {
        state.pending_followup = None;
    } else if let Some(followup) = next_followup.filter(|f| f.has_prompt()) {
        if looks_like_audit_reasoning(&followup.prompt) {
            tracing::debug!(
                followup_id = %followup.id,
                "Discarding suggested follow-up that reads like audit reasoning"
            );
        } else {
            pin_followup(state, followup.clone());
        }
    }

    let fast_forward = verdict.allows_next() || state.tags_fast_forward();
    if fast_forward {
        state.pending_followup = None;
        state.legal_actions = ActionSet::fast_forward();
    } else if state.pending_followup.is_some() {
        state.legal_actions = ActionSet::pinned_followup();
    } else {
        let mut legal = ActionSet::probing();
        if let Some(forced) = state.tag_forced_action() {
            legal.insert(forced);
        }
        state.legal_actions = legal;
    }

    tracing::debug!(
        question_index = state.question_index,
        verdict = %verdict,
        fast_forward,
        pending = state.pending_followup.is_some(),
        legal_actions = ?state.legal_actions,
        "Applied audit result"
    );
}

fn pin_followup(state: &mut SessionState, followup: FollowupPrompt) {
    if !followup.id.is_empty() {
        let question = state.question_index;
        state
            .progress_mut(question)
            .coverage
            .entry(followup.id.clone())
            .or_insert(FollowupStatus::Uncovered);
    }
    state.pending_followup = Some(followup);
}

/// Marks the pinned follow-up as asked and returns it.
///
/// A pinned follow-up is owed for one turn only; the next audit decides
/// whether anything further is pinned.
pub fn consume_pending_followup(state: &mut SessionState) -> Option<FollowupPrompt> {
    let asked = state.pending_followup.take()?;
    state.legal_actions = ActionSet::probing();
    tracing::debug!(
        question_index = state.question_index,
        followup_id = %asked.id,
        "Pinned follow-up asked"
    );
    Some(asked)
}

/// Resets the gate for a question that has just become current.
///
/// Idempotent: calling it twice without an audit in between yields the same set.
pub fn reset_legal_actions_for_question(state: &mut SessionState) {
    state.legal_actions = if state.pending_followup.is_some() {
        ActionSet::pinned_followup()
    } else {
        ActionSet::baseline()
    };
}

/// Returns true if the latest audits or tags say the user has nothing to share.
pub fn no_experience_signalled(state: &SessionState) -> bool {
    let audit_says = [&state.last_presence_audit, &state.last_completion_audit]
        .into_iter()
        .flatten()
        .any(signals_no_experience);
    audit_says || state.tags_fast_forward()
}

/// Lets the interview bail out of a topic the user cannot speak to.
///
/// The final question is only skipped once its follow-ups are all covered.
/// Returns true if the question was marked skipped.
pub fn apply_no_experience_heuristic<F>(
    state: &mut SessionState,
    question: usize,
    is_final_question: bool,
    all_followups_covered: F,
) -> bool
where
    F: Fn(usize) -> bool,
{
    if !no_experience_signalled(state) {
        return false;
    }
    if is_final_question && !all_followups_covered(question) {
        tracing::debug!(
            question_index = question,
            "No-experience signal ignored on final question with open follow-ups"
        );
        return false;
    }

    state.progress_mut(question).skip = true;
    state.pending_followup = None;
    state.legal_actions = ActionSet::fast_forward();
    tracing::debug!(question_index = question, "Question skipped for lack of experience");
    true
}

/// Sets the composer's style hints for the upcoming turn.
pub fn apply_style_heuristics(state: &mut SessionState) {
    let question = state.question_index;
    let moving_on = state.legal_actions.contains(super::action::Action::NextQuestion)
        && (state.is_skipped(question) || state.tags_fast_forward());

    state.style_hints.prefer_transition = moving_on;
    state.style_hints.avoid_outcome_for_background_only =
        state.current_kind() == QuestionKind::Background;
}
