//! Moves the session from one question to the next.

use crate::domain::foundation::StateMachine;

use super::gate::reset_legal_actions_for_question;
use super::phase::InterviewPhase;
use super::session::SessionState;

/// Advances to the next question, or to `Done` past the last one.
///
/// The index always moves forward while the interview is active, so once
/// `Done` it equals the catalog length and names no question. Clears the
/// pending follow-up and resets the legal actions either way.
pub fn advance_to_next_question(state: &mut SessionState) {
    if state.phase.is_active() {
        let from = state.question_index;
        state.question_index = from.saturating_add(1);

        if state.question_index < state.catalog.len() {
            tracing::info!(
                from_question = from,
                question_index = state.question_index,
                "Advanced to next question"
            );
        } else {
            match state.phase.transition_to(InterviewPhase::Done) {
                Ok(done) => state.phase = done,
                Err(err) => tracing::error!(error = %err, "Phase transition rejected"),
            }
            tracing::info!(questions = state.catalog.len(), "Interview complete");
        }
    }

    state.pending_followup = None;
    state.last_tags.clear();
    state.followup_coverage = None;
    state.style_hints = Default::default();
    reset_legal_actions_for_question(state);
}
