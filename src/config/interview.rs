//! Interview configuration

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::domain::interview::{
    Action, ComposerTexts, InterviewSettings, QuestionCatalog, TagTable,
    DEFAULT_ACKNOWLEDGEMENT, DEFAULT_CLOSING, DEFAULT_GENERIC_PROMPT, DEFAULT_WELCOME,
    MAX_FOLLOWUP_CAP, NO_ABLE_ANSWER,
};

use crate::domain::foundation::ValidationError as DomainValidationError;

use super::error::ValidationError;

/// Actions a tag may force.
const TAG_FORCEABLE: [Action; 3] = [
    Action::NextQuestion,
    Action::SummarizeQuestion,
    Action::RequestClarify,
];

/// Question catalog, follow-up budgets and composer texts
#[derive(Debug, Clone, Deserialize)]
pub struct InterviewConfig {
    /// Follow-ups allowed per main question
    #[serde(default = "default_followup_cap")]
    pub followup_cap: u32,

    /// Follow-ups allowed per background question
    #[serde(default)]
    pub background_followup_cap: u32,

    /// Warm-up questions asked before the main block
    #[serde(default = "default_background_questions")]
    pub background_questions: Vec<String>,

    /// Main questions, in order
    #[serde(default = "default_questions")]
    pub questions: Vec<String>,

    #[serde(default = "default_welcome")]
    pub welcome_text: String,

    #[serde(default = "default_closing")]
    pub closing_text: String,

    #[serde(default = "default_acknowledgement")]
    pub acknowledgement_text: String,

    /// Asked when the generator produced nothing usable
    #[serde(default = "default_generic_prompt")]
    pub generic_prompt: String,

    /// Phrases that may lead a question change; empty disables transitions
    #[serde(default = "default_transition_phrases")]
    pub transition_phrases: Vec<String>,

    /// Judge tag to forced action (wire names such as `NEXT_QUESTION`).
    /// Tags match case-insensitively; configuration sources lowercase keys.
    #[serde(default = "default_tag_actions")]
    pub tag_actions: BTreeMap<String, String>,
}

fn default_followup_cap() -> u32 {
    3
}

fn default_background_questions() -> Vec<String> {
    [
        "Tell me about your educational background - what did you study in college or university?",
        "I'd love to hear about your current work and how you got into it through job interviews.",
        "What first got you interested in using GenAI tools like ChatGPT or Gemini for job interviews?",
    ]
    .map(String::from)
    .to_vec()
}

fn default_questions() -> Vec<String> {
    [
        "Can you walk me through a specific time when you used GenAI to help prepare for a job interview?",
        "What kinds of tasks did you find yourself relying on GenAI for most when preparing for interviews?",
        "Have you ever considered or actually used GenAI during a live interview? What happened?",
        "Tell me about a time when you felt AI gave you a real competitive edge in an interview process.",
        "Did you ever have a close call where your AI use almost got you in trouble? What was that like?",
        "Looking back, was there ever a moment when you thought you might have crossed a line using AI for job applications?",
        "Have you ever used AI in your job applications in a way that you prefer not to share openly with family, friends, or colleagues?",
    ]
    .map(String::from)
    .to_vec()
}

fn default_welcome() -> String {
    DEFAULT_WELCOME.to_string()
}

fn default_closing() -> String {
    DEFAULT_CLOSING.to_string()
}

fn default_acknowledgement() -> String {
    DEFAULT_ACKNOWLEDGEMENT.to_string()
}

fn default_generic_prompt() -> String {
    DEFAULT_GENERIC_PROMPT.to_string()
}

fn default_transition_phrases() -> Vec<String> {
    ComposerTexts::default().transition_phrases
}

fn default_tag_actions() -> BTreeMap<String, String> {
    BTreeMap::from([(
        NO_ABLE_ANSWER.to_string(),
        Action::NextQuestion.as_str().to_string(),
    )])
}

impl InterviewConfig {
    /// Validate interview configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.questions.is_empty() {
            return Err(ValidationError::NoQuestions);
        }
        if self
            .background_questions
            .iter()
            .chain(&self.questions)
            .any(|q| q.trim().is_empty())
        {
            return Err(ValidationError::BlankQuestion);
        }

        for (field, cap) in [
            ("followup_cap", self.followup_cap),
            ("background_followup_cap", self.background_followup_cap),
        ] {
            if cap > MAX_FOLLOWUP_CAP {
                return Err(ValidationError::FollowupCapTooLarge {
                    field,
                    max: MAX_FOLLOWUP_CAP,
                });
            }
        }

        for (field, text) in [
            ("welcome_text", &self.welcome_text),
            ("closing_text", &self.closing_text),
            ("acknowledgement_text", &self.acknowledgement_text),
            ("generic_prompt", &self.generic_prompt),
        ] {
            if text.trim().is_empty() {
                return Err(ValidationError::BlankText(field));
            }
        }

        self.tag_table().map(|_| ())
    }

    /// Builds the tag table, rejecting actions a tag may not force.
    pub fn tag_table(&self) -> Result<TagTable, ValidationError> {
        self.tag_actions
            .iter()
            .map(|(tag, name)| {
                name.parse::<Action>()
                    .ok()
                    .filter(|action| TAG_FORCEABLE.contains(action))
                    .map(|action| (tag.clone(), action))
                    .ok_or_else(|| ValidationError::UnsupportedTagAction {
                        tag: tag.clone(),
                        action: name.clone(),
                    })
            })
            .collect()
    }

    /// Background block followed by the main questions.
    pub fn catalog(&self) -> Result<QuestionCatalog, ValidationError> {
        QuestionCatalog::with_background(&self.background_questions, &self.questions).map_err(
            |err| match err {
                DomainValidationError::EmptyField { .. } => ValidationError::NoQuestions,
                _ => ValidationError::BlankQuestion,
            },
        )
    }

    /// Orchestrator settings derived from this configuration.
    pub fn settings(&self) -> Result<InterviewSettings, ValidationError> {
        Ok(InterviewSettings {
            followup_cap: self.followup_cap,
            background_followup_cap: self.background_followup_cap,
            tag_table: self.tag_table()?,
            texts: ComposerTexts {
                welcome: self.welcome_text.clone(),
                closing: self.closing_text.clone(),
                acknowledgement: self.acknowledgement_text.clone(),
                generic_prompt: self.generic_prompt.clone(),
                transition_phrases: self.transition_phrases.clone(),
            },
        })
    }
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            followup_cap: default_followup_cap(),
            background_followup_cap: 0,
            background_questions: default_background_questions(),
            questions: default_questions(),
            welcome_text: default_welcome(),
            closing_text: default_closing(),
            acknowledgement_text: default_acknowledgement(),
            generic_prompt: default_generic_prompt(),
            transition_phrases: default_transition_phrases(),
            tag_actions: default_tag_actions(),
        }
    }
}
