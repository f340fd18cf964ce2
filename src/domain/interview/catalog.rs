//! The fixed, ordered list of questions an interview walks through.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Whether a question is warm-up background or a main interview question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Short factual warm-up; has its own (usually zero) follow-up budget.
    Background,
    /// Substantive question probed with follow-ups.
    #[default]
    Main,
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub kind: QuestionKind,
}

impl Question {
    /// Creates a main question.
    pub fn main(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: QuestionKind::Main,
        }
    }

    /// Creates a background question.
    pub fn background(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: QuestionKind::Background,
        }
    }
}

/// Immutable ordered question sequence, fixed at session start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionCatalog {
    questions: Vec<Question>,
}

impl QuestionCatalog {
    /// Builds a catalog of main questions from plain texts.
    pub fn new<I, S>(texts: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_questions(texts.into_iter().map(Question::main).collect())
    }

    /// Builds a catalog with a background block followed by main questions.
    pub fn with_background<B, M, S, T>(background: B, main: M) -> Result<Self, ValidationError>
    where
        B: IntoIterator<Item = S>,
        M: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        let questions = background
            .into_iter()
            .map(Question::background)
            .chain(main.into_iter().map(Question::main))
            .collect();
        Self::from_questions(questions)
    }

    /// Builds a catalog from prepared entries.
    pub fn from_questions(questions: Vec<Question>) -> Result<Self, ValidationError> {
        if questions.is_empty() {
            return Err(ValidationError::empty_field("questions"));
        }
        if let Some(pos) = questions.iter().position(|q| q.text.trim().is_empty()) {
            return Err(ValidationError::invalid_format(
                "questions",
                format!("question {} is blank", pos),
            ));
        }
        Ok(Self { questions })
    }

    /// Number of questions.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false for a constructed catalog.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Question at `index`, if in bounds.
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Question text at `index`, if in bounds.
    pub fn text(&self, index: usize) -> Option<&str> {
        self.get(index).map(|q| q.text.as_str())
    }

    /// Text of the question after `index`, if any.
    pub fn next_text(&self, index: usize) -> Option<&str> {
        index.checked_add(1).and_then(|i| self.text(i))
    }

    /// Returns true if `index` names the last question.
    pub fn is_final(&self, index: usize) -> bool {
        index.checked_add(1) == Some(self.questions.len())
    }

    /// Kind of the question at `index`; out of range reads as `Main`.
    pub fn kind(&self, index: usize) -> QuestionKind {
        self.get(index).map(|q| q.kind).unwrap_or_default()
    }

    /// Iterates all questions in order.
    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}
