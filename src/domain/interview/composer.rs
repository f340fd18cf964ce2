//! Renders the outbound message for an enforced action.
//!
//! Every message the composer produces contains at most one question, and a
//! message that asks anything ends with exactly one `?`.

use rand::seq::SliceRandom;
use std::fmt;

use super::action::Action;
use super::session::{SessionState, StyleHints};

const NEXT_QUESTION_LABEL: &str = "Next question:\n";
const SECTION_BREAK: &str = "\n\n";

pub const DEFAULT_WELCOME: &str = "Hello! Thank you for joining me today. I'm here to learn about \
    your experiences with AI and job interviews. I'll be asking you some questions about how \
    you've used AI tools in your interview preparation.";
pub const DEFAULT_CLOSING: &str = "Thanks so much for sharing your journey with me today. \
    This concludes our conversation - thank you for your participation!";
pub const DEFAULT_ACKNOWLEDGEMENT: &str = "Thanks for sharing that.";
pub const DEFAULT_GENERIC_PROMPT: &str = "Could you share a specific example from your experience?";

/// Fixed texts the composer uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposerTexts {
    pub welcome: String,
    pub closing: String,
    pub acknowledgement: String,
    pub generic_prompt: String,
    pub transition_phrases: Vec<String>,
}

impl Default for ComposerTexts {
    fn default() -> Self {
        Self {
            welcome: DEFAULT_WELCOME.to_string(),
            closing: DEFAULT_CLOSING.to_string(),
            acknowledgement: DEFAULT_ACKNOWLEDGEMENT.to_string(),
            generic_prompt: DEFAULT_GENERIC_PROMPT.to_string(),
            transition_phrases: vec![
                "Thanks for walking me through that.".to_string(),
                "That's really helpful context.".to_string(),
                "I appreciate you sharing that.".to_string(),
            ],
        }
    }
}

/// Chooses the transition phrase that leads a question change.
pub trait PhrasePicker: Send + Sync {
    fn pick<'a>(&self, phrases: &'a [String]) -> Option<&'a str>;
}

/// Picks uniformly at random.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPhrasePicker;

impl PhrasePicker for RandomPhrasePicker {
    fn pick<'a>(&self, phrases: &'a [String]) -> Option<&'a str> {
        let mut rng = rand::thread_rng();
        phrases.choose(&mut rng).map(String::as_str)
    }
}

/// Always picks the first phrase. Deterministic, for tests and replays.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstPhrasePicker;

impl PhrasePicker for FirstPhrasePicker {
    fn pick<'a>(&self, phrases: &'a [String]) -> Option<&'a str> {
        phrases.first().map(String::as_str)
    }
}

/// Turns an enforced action plus the generator's utterance into the message
/// the user sees.
pub struct MessageComposer {
    texts: ComposerTexts,
    picker: Box<dyn PhrasePicker>,
}

impl MessageComposer {
    /// Creates a composer that picks transition phrases at random.
    pub fn new(texts: ComposerTexts) -> Self {
        Self {
            texts,
            picker: Box::new(RandomPhrasePicker),
        }
    }

    /// Replaces the phrase picker.
    pub fn with_picker(mut self, picker: impl PhrasePicker + 'static) -> Self {
        self.picker = Box::new(picker);
        self
    }

    pub fn texts(&self) -> &ComposerTexts {
        &self.texts
    }

    /// Renders the message for `action`.
    ///
    /// Rules apply in order: the first-turn welcome, a pending follow-up, then
    /// the per-action rendering.
    #[allow(clippy::too_many_arguments)]
    pub fn compose(
        &self,
        state: &SessionState,
        action: Action,
        utterance: &str,
        current_question: Option<&str>,
        next_question: Option<&str>,
        hints: &StyleHints,
        is_first_turn: bool,
    ) -> String {
        if is_first_turn && action == Action::NextQuestion {
            let question = self.single_question(current_question.unwrap_or_default());
            return join(&[statement(&self.texts.welcome), question]);
        }

        if let Some(pending) = state.pending_followup() {
            return self.single_question(&pending.prompt);
        }

        match action {
            Action::NextQuestion => match next_question {
                Some(next) => {
                    let transition = if hints.prefer_transition {
                        self.picker.pick(&self.texts.transition_phrases)
                    } else {
                        None
                    };
                    match transition {
                        Some(phrase) => join(&[statement(phrase), self.next_block(next)]),
                        None => self.next_block(next),
                    }
                }
                None => self.single_question(utterance),
            },
            Action::SummarizeQuestion => {
                let from_utterance =
                    !utterance.trim().is_empty() && !hints.avoid_outcome_for_background_only;

                if let Some(next) = next_question.filter(|_| state.is_legal(Action::NextQuestion)) {
                    let recap = if from_utterance {
                        statement(utterance)
                    } else {
                        statement(&self.texts.acknowledgement)
                    };
                    join(&[recap, self.next_block(next)])
                } else if from_utterance {
                    self.single_question(utterance)
                } else {
                    join(&[
                        statement(&self.texts.acknowledgement),
                        self.single_question(""),
                    ])
                }
            }
            Action::AskFollowup | Action::RequestClarify => {
                match next_question.filter(|_| state.tags_fast_forward()) {
                    Some(next) => join(&[
                        statement(&self.texts.acknowledgement),
                        self.next_block(next),
                    ]),
                    None => self.single_question(utterance),
                }
            }
            Action::End => statement(&self.texts.closing),
        }
    }

    fn next_block(&self, next: &str) -> String {
        format!("{}{}", NEXT_QUESTION_LABEL, self.single_question(next))
    }

    /// Normalises `text` to one question, falling back to the generic prompt.
    pub fn single_question(&self, text: &str) -> String {
        ensure_single_question(text)
            .or_else(|| ensure_single_question(&self.texts.generic_prompt))
            .unwrap_or_else(|| DEFAULT_GENERIC_PROMPT.to_string())
    }
}

impl Default for MessageComposer {
    fn default() -> Self {
        Self::new(ComposerTexts::default())
    }
}

impl fmt::Debug for MessageComposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageComposer")
            .field("texts", &self.texts)
            .finish_non_exhaustive()
    }
}

/// Makes `text` end in exactly one question mark.
///
/// Truncates at the first `?`; without one, trailing punctuation is replaced
/// by `?`. Returns `None` when nothing is left to ask.
pub fn ensure_single_question(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if let Some(pos) = trimmed.find('?') {
        let head = trimmed[..pos].trim_end();
        if head.is_empty() {
            return None;
        }
        return Some(format!("{}?", head));
    }

    let stripped = trimmed.trim_end_matches(['.', '!', ',', ';', ':']).trim_end();
    if stripped.is_empty() {
        None
    } else {
        Some(format!("{}?", stripped))
    }
}

/// Turns every question mark into a period so the text reads as a statement.
pub fn statement(text: &str) -> String {
    text.trim().replace('?', ".")
}

fn join(sections: &[String]) -> String {
    sections
        .iter()
        .filter(|s| !s.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(SECTION_BREAK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::interview::action::ActionSet;
    use crate::domain::interview::audit::FollowupPrompt;
    use crate::domain::interview::catalog::QuestionCatalog;

    fn composer() -> MessageComposer {
        MessageComposer::default().with_picker(FirstPhrasePicker)
    }

    fn session() -> SessionState {
        SessionState::new(QuestionCatalog::new(["Q1", "Q2"]).unwrap(), 1)
    }

    fn question_marks(text: &str) -> usize {
        text.matches('?').count()
    }

    mod normalisation {
        use super::*;

        #[test]
        fn truncates_after_first_question() {
            assert_eq!(
                ensure_single_question("What happened? And why? Tell me."),
                Some("What happened?".to_string())
            );
        }

        #[test]
        fn appends_question_mark_when_missing() {
            assert_eq!(
                ensure_single_question("  Tell me more.  "),
                Some("Tell me more?".to_string())
            );
            assert_eq!(
                ensure_single_question("Go on!"),
                Some("Go on?".to_string())
            );
        }

        #[test]
        fn empty_input_has_nothing_to_ask() {
            assert_eq!(ensure_single_question("   "), None);
            assert_eq!(ensure_single_question("?"), None);
            assert_eq!(ensure_single_question("..."), None);
        }

        #[test]
        fn empty_utterance_uses_generic_prompt() {
            assert_eq!(composer().single_question(""), DEFAULT_GENERIC_PROMPT);
        }

        #[test]
        fn statement_removes_question_marks() {
            assert_eq!(statement(" Nice? Really? "), "Nice. Really.");
        }
    }

    mod first_turn {
        use super::*;

        #[test]
        fn welcome_precedes_first_question() {
            let message = composer().compose(
                &session(),
                Action::NextQuestion,
                "",
                Some("Q1"),
                Some("Q2"),
                &StyleHints::default(),
                true,
            );
            assert_eq!(message, format!("{}\n\nQ1?", DEFAULT_WELCOME));
            assert_eq!(question_marks(&message), 1);
        }

        #[test]
        fn later_turns_never_repeat_welcome() {
            let message = composer().compose(
                &session(),
                Action::NextQuestion,
                "",
                Some("Q1"),
                Some("Q2"),
                &StyleHints::default(),
                false,
            );
            assert_eq!(message, "Next question:\nQ2?");
        }
    }

    mod pending {
        use super::*;

        #[test]
        fn pending_prompt_wins_over_everything() {
            let mut state = session();
            state.pending_followup =
                Some(FollowupPrompt::new("f1", "Which tool did you use? Why that one?"));

            for action in [Action::AskFollowup, Action::SummarizeQuestion, Action::NextQuestion] {
                let message = composer().compose(
                    &state,
                    action,
                    "Something else entirely?",
                    Some("Q1"),
                    Some("Q2"),
                    &StyleHints::default(),
                    false,
                );
                assert_eq!(message, "Which tool did you use?");
            }
        }
    }

    mod next_question {
        use super::*;

        #[test]
        fn transition_phrase_leads_when_preferred() {
            let hints = StyleHints {
                prefer_transition: true,
                ..Default::default()
            };
            let message = composer().compose(
                &session(),
                Action::NextQuestion,
                "",
                Some("Q1"),
                Some("Q2"),
                &hints,
                false,
            );
            assert_eq!(
                message,
                "Thanks for walking me through that.\n\nNext question:\nQ2?"
            );
        }

        #[test]
        fn no_phrases_means_no_transition() {
            let texts = ComposerTexts {
                transition_phrases: Vec::new(),
                ..Default::default()
            };
            let hints = StyleHints {
                prefer_transition: true,
                ..Default::default()
            };
            let message = MessageComposer::new(texts).compose(
                &session(),
                Action::NextQuestion,
                "",
                Some("Q1"),
                Some("Q2"),
                &hints,
                false,
            );
            assert_eq!(message, "Next question:\nQ2?");
        }

        #[test]
        fn without_next_question_falls_back_to_utterance() {
            let message = composer().compose(
                &session(),
                Action::NextQuestion,
                "Anything else to add",
                Some("Q2"),
                None,
                &StyleHints::default(),
                false,
            );
            assert_eq!(message, "Anything else to add?");
        }
    }

    mod summarize {
        use super::*;

        #[test]
        fn recap_then_next_question_when_next_is_legal() {
            let mut state = session();
            state.legal_actions = ActionSet::fast_forward();
            let message = composer().compose(
                &state,
                Action::SummarizeQuestion,
                "So you practised with mock interviews? Great.",
                Some("Q1"),
                Some("Q2"),
                &StyleHints::default(),
                false,
            );
            assert_eq!(
                message,
                "So you practised with mock interviews. Great.\n\nNext question:\nQ2?"
            );
            assert_eq!(question_marks(&message), 1);
        }

        #[test]
        fn recap_becomes_clarifying_question_when_next_is_not_legal() {
            let mut state = session();
            state.legal_actions = ActionSet::of(&[Action::SummarizeQuestion]);
            let message = composer().compose(
                &state,
                Action::SummarizeQuestion,
                "So you practised with mock interviews. Is that right? Anything else?",
                Some("Q1"),
                Some("Q2"),
                &StyleHints::default(),
                false,
            );
            assert_eq!(
                message,
                "So you practised with mock interviews. Is that right?"
            );
        }

        #[test]
        fn background_questions_get_neutral_acknowledgement() {
            let mut state = session();
            state.legal_actions = ActionSet::fast_forward();
            let hints = StyleHints {
                avoid_outcome_for_background_only: true,
                ..Default::default()
            };
            let message = composer().compose(
                &state,
                Action::SummarizeQuestion,
                "You got the job, congratulations.",
                Some("Q1"),
                Some("Q2"),
                &hints,
                false,
            );
            assert_eq!(message, "Thanks for sharing that.\n\nNext question:\nQ2?");
        }

        #[test]
        fn empty_recap_without_next_asks_generic_prompt() {
            let mut state = session();
            state.legal_actions = ActionSet::of(&[Action::SummarizeQuestion]);
            let message = composer().compose(
                &state,
                Action::SummarizeQuestion,
                "",
                Some("Q1"),
                None,
                &StyleHints::default(),
                false,
            );
            assert_eq!(
                message,
                format!("{}\n\n{}", DEFAULT_ACKNOWLEDGEMENT, DEFAULT_GENERIC_PROMPT)
            );
        }
    }

    mod probing {
        use super::*;

        #[test]
        fn utterance_is_normalised() {
            let message = composer().compose(
                &session(),
                Action::AskFollowup,
                "How did that go? What did you learn?",
                Some("Q1"),
                Some("Q2"),
                &StyleHints::default(),
                false,
            );
            assert_eq!(message, "How did that go?");
        }

        #[test]
        fn fast_forward_tags_move_on_instead_of_digging() {
            let mut state = session();
            state.last_tags = vec!["No_able_answer".into()];
            let message = composer().compose(
                &state,
                Action::RequestClarify,
                "Could you clarify?",
                Some("Q1"),
                Some("Q2"),
                &StyleHints::default(),
                false,
            );
            assert_eq!(message, "Thanks for sharing that.\n\nNext question:\nQ2?");
        }

        #[test]
        fn empty_utterance_uses_generic_prompt() {
            let message = composer().compose(
                &session(),
                Action::RequestClarify,
                "  ",
                Some("Q1"),
                Some("Q2"),
                &StyleHints::default(),
                false,
            );
            assert_eq!(message, DEFAULT_GENERIC_PROMPT);
        }
    }

    #[test]
    fn end_renders_closing_without_question() {
        let message = composer().compose(
            &session(),
            Action::End,
            "Any last thoughts?",
            Some("Q2"),
            None,
            &StyleHints::default(),
            false,
        );
        assert_eq!(message, DEFAULT_CLOSING);
        assert_eq!(question_marks(&message), 0);
    }

    #[test]
    fn random_picker_chooses_a_configured_phrase() {
        let phrases = vec!["One.".to_string(), "Two.".to_string()];
        let picked = RandomPhrasePicker.pick(&phrases).unwrap();
        assert!(phrases.iter().any(|p| p == picked));
        assert_eq!(RandomPhrasePicker.pick(&[]), None);
    }
}
