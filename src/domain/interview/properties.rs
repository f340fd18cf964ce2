//! Randomised checks of the invariants that must hold on every turn.

use proptest::prelude::*;
use serde_json::json;

use super::action::Action;
use super::advancement::should_advance;
use super::audit::{AuditVerdict, FollowupPrompt};
use super::catalog::QuestionCatalog;
use super::composer::{ensure_single_question, MessageComposer};
use super::enforcer::enforce;
use super::gate::{
    apply_audit_result, apply_no_experience_heuristic, consume_pending_followup,
    reset_legal_actions_for_question,
};
use super::session::{SessionState, StyleHints};
use super::transition::advance_to_next_question;

#[derive(Debug, Clone)]
struct Round {
    allow: bool,
    fast_forward_tag: bool,
    followup: Option<String>,
    no_experience: bool,
    proposed: Option<Action>,
}

fn action() -> impl Strategy<Value = Option<Action>> {
    prop_oneof![
        Just(None),
        proptest::sample::select(Action::ALL.to_vec()).prop_map(Some),
    ]
}

fn round() -> impl Strategy<Value = Round> {
    (
        any::<bool>(),
        any::<bool>(),
        proptest::option::of("[A-Za-z ]{0,12}\\??"),
        any::<bool>(),
        action(),
    )
        .prop_map(|(allow, fast_forward_tag, followup, no_experience, proposed)| Round {
            allow,
            fast_forward_tag,
            followup,
            no_experience,
            proposed,
        })
}

fn verdict(allow: bool) -> AuditVerdict {
    if allow {
        AuditVerdict::AllowNextQuestion
    } else {
        AuditVerdict::from("REQUIRE_MORE")
    }
}

/// Runs one turn through the core functions the way the orchestrator does.
fn play(state: &mut SessionState, round: &Round) -> Action {
    let question = state.question_index();
    let is_final = state.is_final_question();
    let tags: Vec<String> = if round.fast_forward_tag {
        vec!["No_able_answer".to_string()]
    } else {
        Vec::new()
    };
    let followup = round
        .followup
        .as_ref()
        .map(|prompt| FollowupPrompt::new("f", prompt.clone()));

    apply_audit_result(
        state,
        &verdict(round.allow),
        None,
        followup.as_ref(),
        Some(tags.as_slice()),
    );
    if round.no_experience {
        state.store_audits(None, Some(json!({"no_experience": true})));
    }
    let covered = state.all_followups_covered(question);
    apply_no_experience_heuristic(state, question, is_final, |_| covered);

    let action = enforce(state, round.proposed, question);
    if action == Action::AskFollowup {
        state.register_followup(question);
    }
    let advance = !state.has_pending_followup()
        && should_advance(&verdict(round.allow), state, question, is_final, |q| {
            state.all_followups_covered(q)
        });
    if action == Action::AskFollowup {
        consume_pending_followup(state);
    }
    if advance {
        advance_to_next_question(state);
    }
    action
}

fn session(cap: u32) -> SessionState {
    SessionState::new(QuestionCatalog::new(["Q1", "Q2", "Q3"]).unwrap(), cap)
}

proptest! {
    #[test]
    fn legal_actions_never_empty_while_main(
        cap in 0u32..4,
        rounds in proptest::collection::vec(round(), 1..20),
    ) {
        let mut state = session(cap);
        for round in &rounds {
            play(&mut state, round);
            if state.phase().is_active() {
                prop_assert!(!state.legal_actions().is_empty());
            }
        }
    }

    #[test]
    fn pending_followup_forces_ask_and_its_prompt(
        prompt in "[A-Za-z][A-Za-z ?]{0,30}",
        proposed in action(),
        utterance in ".{0,30}",
        cap in 0u32..4,
    ) {
        let mut state = session(cap);
        let followup = FollowupPrompt::new("f", prompt.clone());
        apply_audit_result(&mut state, &verdict(false), None, Some(&followup), None);
        prop_assume!(state.has_pending_followup());

        let action = enforce(&state, proposed, 0);
        prop_assert_eq!(action, Action::AskFollowup);

        let composer = MessageComposer::default();
        let message = composer.compose(
            &state,
            action,
            &utterance,
            state.current_question(),
            state.next_question(),
            &StyleHints::default(),
            false,
        );
        prop_assert_eq!(message, composer.single_question(&prompt));
    }

    #[test]
    fn capped_question_never_enforces_ask_without_pending(
        cap in 0u32..4,
        proposed in action(),
        allow in any::<bool>(),
        tag in any::<bool>(),
    ) {
        let mut state = session(cap);
        for _ in 0..cap {
            state.register_followup(0);
        }
        let tags: Vec<String> = if tag { vec!["No_able_answer".into()] } else { Vec::new() };
        apply_audit_result(&mut state, &verdict(allow), None, None, Some(tags.as_slice()));

        prop_assert_ne!(enforce(&state, proposed, 0), Action::AskFollowup);
    }

    #[test]
    fn one_pin_is_asked_once_and_the_cap_holds(
        cap in 0u32..4,
        proposals in proptest::collection::vec(action(), 1..12),
    ) {
        let mut state = session(cap);
        let pin = Round {
            allow: false,
            fast_forward_tag: false,
            followup: Some("Which tool did you use?".to_string()),
            no_experience: false,
            proposed: Some(Action::NextQuestion),
        };
        prop_assert_eq!(play(&mut state, &pin), Action::AskFollowup);

        for proposed in proposals {
            let round = Round { followup: None, proposed, ..pin.clone() };
            play(&mut state, &round);
            prop_assert!(!state.has_pending_followup());
        }
        prop_assert!(state.followup_count(0) <= cap.max(1));
    }

    #[test]
    fn reset_is_idempotent(pending in any::<bool>(), allow in any::<bool>()) {
        let mut state = session(2);
        let followup = FollowupPrompt::new("f", "Why?");
        apply_audit_result(
            &mut state,
            &verdict(allow),
            None,
            if pending { Some(&followup) } else { None },
            None,
        );

        reset_legal_actions_for_question(&mut state);
        let once = state.legal_actions();
        reset_legal_actions_for_question(&mut state);
        prop_assert_eq!(state.legal_actions(), once);
    }

    #[test]
    fn final_question_depends_only_on_coverage(
        allow in any::<bool>(),
        skip in any::<bool>(),
        tag in any::<bool>(),
        covered in any::<bool>(),
    ) {
        let mut state = SessionState::new(QuestionCatalog::new(["Only"]).unwrap(), 3);
        state.progress_mut(0).skip = skip;
        if tag {
            state.last_tags = vec!["No_able_answer".into()];
        }
        prop_assert_eq!(
            should_advance(&verdict(allow), &state, 0, true, |_| covered),
            covered
        );
    }

    #[test]
    fn normalised_output_keeps_only_the_first_question(
        text in "[a-z][a-z ]{0,10}[a-z]\\?[a-z ?]{0,10}\\?[a-z ]{0,5}",
    ) {
        let first = text.find('?').unwrap();
        let normalised = ensure_single_question(&text).unwrap();
        prop_assert_eq!(normalised.matches('?').count(), 1);
        prop_assert_eq!(normalised, text[..=first].to_string());
    }
}
