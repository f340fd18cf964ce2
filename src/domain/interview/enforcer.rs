//! Coerces a proposed action into a legal one.
//!
//! The text generator proposes, the enforcer disposes. Nothing here mutates
//! the session; follow-up counting happens after enforcement.

use super::action::Action;
use super::session::SessionState;

/// Returns the action the turn will actually take.
///
/// `proposed` may be absent when the generator's choice could not be parsed.
pub fn enforce(state: &SessionState, proposed: Option<Action>, question: usize) -> Action {
    let pending = state.has_pending_followup();
    let legal = |action: Action| state.is_legal(action);

    if proposed == Some(Action::AskFollowup) && !pending {
        if state.at_followup_cap(question) {
            let action = first_legal(state, &[Action::SummarizeQuestion, Action::RequestClarify])
                .unwrap_or(Action::NextQuestion);
            tracing::debug!(
                question_index = question,
                followups = state.followup_count(question),
                action = %action,
                "Follow-up cap reached"
            );
            return action;
        }
        if state.tags_fast_forward() {
            return first_legal(state, &[Action::SummarizeQuestion, Action::NextQuestion])
                .unwrap_or(Action::RequestClarify);
        }
    }

    if pending {
        return Action::AskFollowup;
    }

    if let Some(forced) = state.tag_forced_action().filter(|a| legal(*a)) {
        if proposed != Some(forced) {
            tracing::debug!(
                question_index = question,
                proposed = ?proposed,
                action = %forced,
                "Tag forced action"
            );
        }
        return forced;
    }

    match proposed {
        Some(action) if legal(action) => action,
        _ => fallback(state, proposed),
    }
}

fn first_legal(state: &SessionState, preference: &[Action]) -> Option<Action> {
    preference.iter().copied().find(|a| state.is_legal(*a))
}

fn fallback(state: &SessionState, proposed: Option<Action>) -> Action {
    let chosen = first_legal(
        state,
        &[
            Action::RequestClarify,
            Action::SummarizeQuestion,
            Action::NextQuestion,
        ],
    )
    .or_else(|| state.legal_actions().iter().next());

    match chosen {
        Some(action) => {
            tracing::debug!(
                proposed = ?proposed,
                action = %action,
                "Replaced illegal proposed action"
            );
            action
        }
        None => {
            tracing::error!(
                question_index = state.question_index(),
                "Legal action set is empty; forcing NEXT_QUESTION"
            );
            Action::NextQuestion
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::interview::action::ActionSet;
    use crate::domain::interview::audit::FollowupPrompt;
    use crate::domain::interview::catalog::QuestionCatalog;

    fn session(cap: u32) -> SessionState {
        SessionState::new(QuestionCatalog::new(["Q1", "Q2"]).unwrap(), cap)
    }

    fn with_legal(mut state: SessionState, actions: &[Action]) -> SessionState {
        state.legal_actions = ActionSet::of(actions);
        state
    }

    mod cap {
        use super::*;

        #[test]
        fn capped_followup_becomes_summary_when_legal() {
            let mut state = session(1);
            state.register_followup(0);
            let state = with_legal(state, &[Action::AskFollowup, Action::SummarizeQuestion]);
            assert_eq!(
                enforce(&state, Some(Action::AskFollowup), 0),
                Action::SummarizeQuestion
            );
        }

        #[test]
        fn capped_followup_becomes_clarify_without_summary() {
            let mut state = session(1);
            state.register_followup(0);
            let state = with_legal(state, &[Action::AskFollowup, Action::RequestClarify]);
            assert_eq!(
                enforce(&state, Some(Action::AskFollowup), 0),
                Action::RequestClarify
            );
        }

        #[test]
        fn capped_followup_falls_back_to_next() {
            let state = with_legal(session(0), &[Action::AskFollowup]);
            assert_eq!(
                enforce(&state, Some(Action::AskFollowup), 0),
                Action::NextQuestion
            );
        }

        #[test]
        fn under_cap_followup_is_kept() {
            let state = with_legal(session(2), &[Action::AskFollowup, Action::RequestClarify]);
            assert_eq!(
                enforce(&state, Some(Action::AskFollowup), 0),
                Action::AskFollowup
            );
        }
    }

    mod tags {
        use super::*;

        #[test]
        fn fast_forward_tag_turns_followup_into_summary() {
            let mut state = with_legal(session(3), &[Action::NextQuestion, Action::SummarizeQuestion]);
            state.last_tags = vec!["No_able_answer".into()];
            assert_eq!(
                enforce(&state, Some(Action::AskFollowup), 0),
                Action::SummarizeQuestion
            );
        }

        #[test]
        fn fast_forward_tag_prefers_next_over_clarify() {
            let mut state = with_legal(session(3), &[Action::NextQuestion]);
            state.last_tags = vec!["No_able_answer".into()];
            assert_eq!(
                enforce(&state, Some(Action::AskFollowup), 0),
                Action::NextQuestion
            );
        }
    }

    mod forced_by_tag {
        use super::*;
        use crate::domain::interview::tags::TagTable;

        fn tagged(tag: &str, action: Action, legal: &[Action]) -> SessionState {
            let mut state = with_legal(
                session(3).with_tag_table(TagTable::default().with_entry(tag, action)),
                legal,
            );
            state.last_tags = vec![tag.to_string()];
            state
        }

        #[test]
        fn clarify_tag_overrides_followup_proposal() {
            let state = tagged(
                "Off_topic",
                Action::RequestClarify,
                &[Action::AskFollowup, Action::RequestClarify],
            );
            assert_eq!(
                enforce(&state, Some(Action::AskFollowup), 0),
                Action::RequestClarify
            );
        }

        #[test]
        fn summarize_tag_applies_when_legal() {
            let state = tagged(
                "Repeating",
                Action::SummarizeQuestion,
                &[Action::AskFollowup, Action::RequestClarify, Action::SummarizeQuestion],
            );
            assert_eq!(enforce(&state, None, 0), Action::SummarizeQuestion);
        }

        #[test]
        fn illegal_forced_action_is_ignored() {
            let state = tagged("Repeating", Action::SummarizeQuestion, &[Action::AskFollowup]);
            assert_eq!(
                enforce(&state, Some(Action::AskFollowup), 0),
                Action::AskFollowup
            );
        }

        #[test]
        fn pending_followup_beats_forced_tag() {
            let mut state = tagged(
                "Off_topic",
                Action::RequestClarify,
                &[Action::AskFollowup, Action::RequestClarify],
            );
            state.pending_followup = Some(FollowupPrompt::new("f1", "Why?"));
            assert_eq!(enforce(&state, None, 0), Action::AskFollowup);
        }
    }

    mod pending {
        use super::*;

        #[test]
        fn pending_followup_forces_ask() {
            let mut state = with_legal(session(0), &[Action::AskFollowup]);
            state.pending_followup = Some(FollowupPrompt::new("f1", "Why?"));

            for proposed in [
                None,
                Some(Action::NextQuestion),
                Some(Action::End),
                Some(Action::AskFollowup),
            ] {
                assert_eq!(enforce(&state, proposed, 0), Action::AskFollowup);
            }
        }

        #[test]
        fn pending_followup_overrides_cap() {
            let mut state = with_legal(session(1), &[Action::AskFollowup]);
            state.register_followup(0);
            state.pending_followup = Some(FollowupPrompt::new("f1", "Why?"));
            assert_eq!(
                enforce(&state, Some(Action::AskFollowup), 0),
                Action::AskFollowup
            );
        }
    }

    mod illegal_proposals {
        use super::*;

        #[test]
        fn legal_proposal_passes_through() {
            let state = session(3);
            assert_eq!(
                enforce(&state, Some(Action::NextQuestion), 0),
                Action::NextQuestion
            );
        }

        #[test]
        fn illegal_proposal_prefers_clarify() {
            let state = with_legal(session(3), &[Action::AskFollowup, Action::RequestClarify]);
            assert_eq!(
                enforce(&state, Some(Action::NextQuestion), 0),
                Action::RequestClarify
            );
        }

        #[test]
        fn missing_proposal_follows_preference_order() {
            let state = with_legal(session(3), &[Action::NextQuestion, Action::SummarizeQuestion]);
            assert_eq!(enforce(&state, None, 0), Action::SummarizeQuestion);
        }

        #[test]
        fn only_followup_legal_is_used_last() {
            let state = with_legal(session(3), &[Action::AskFollowup]);
            assert_eq!(enforce(&state, Some(Action::End), 0), Action::AskFollowup);
        }

        #[test]
        fn empty_set_forces_next_question() {
            let state = with_legal(session(3), &[]);
            assert_eq!(enforce(&state, None, 0), Action::NextQuestion);
        }

        #[test]
        fn enforcement_does_not_mutate() {
            let state = session(1);
            let before = state.clone();
            enforce(&state, Some(Action::AskFollowup), 0);
            assert_eq!(state, before);
        }
    }
}
