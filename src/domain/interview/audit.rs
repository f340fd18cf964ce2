//! Audit judge output as consumed by the orchestrator.
//!
//! The judge itself is an external collaborator. Everything here is parsed
//! tolerantly: a missing or malformed field reads as "not supplied" and never
//! fails the turn.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Wire value of the one verdict the orchestrator acts on.
pub const ALLOW_NEXT_QUESTION: &str = "ALLOW_NEXT_QUESTION";

/// The judge's completion assessment for the current question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AuditVerdict {
    /// The answer covers the question; moving on is allowed.
    AllowNextQuestion,
    /// Anything else, kept verbatim for logging.
    NotYet(String),
}

impl AuditVerdict {
    /// Returns true for `ALLOW_NEXT_QUESTION`.
    pub fn allows_next(&self) -> bool {
        matches!(self, Self::AllowNextQuestion)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::AllowNextQuestion => ALLOW_NEXT_QUESTION,
            Self::NotYet(raw) => raw,
        }
    }
}

impl Default for AuditVerdict {
    fn default() -> Self {
        Self::NotYet(String::new())
    }
}

impl From<String> for AuditVerdict {
    fn from(raw: String) -> Self {
        if raw.trim().eq_ignore_ascii_case(ALLOW_NEXT_QUESTION) {
            Self::AllowNextQuestion
        } else {
            Self::NotYet(raw)
        }
    }
}

impl From<&str> for AuditVerdict {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<AuditVerdict> for String {
    fn from(verdict: AuditVerdict) -> Self {
        match verdict {
            AuditVerdict::AllowNextQuestion => ALLOW_NEXT_QUESTION.to_string(),
            AuditVerdict::NotYet(raw) => raw,
        }
    }
}

impl fmt::Display for AuditVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single follow-up pinned by the judge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowupPrompt {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub prompt: String,
}

impl FollowupPrompt {
    pub fn new(id: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
        }
    }

    /// Returns true if there is something to ask.
    pub fn has_prompt(&self) -> bool {
        !self.prompt.trim().is_empty()
    }

    fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let prompt = obj.get("prompt")?.as_str()?.to_string();
        let id = match obj.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };
        Some(Self { id, prompt })
    }
}

/// How well a follow-up topic has been addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowupStatus {
    Covered,
    Partial,
    Uncovered,
}

impl FollowupStatus {
    pub fn is_covered(&self) -> bool {
        matches!(self, Self::Covered)
    }

    /// Reads a status from a string, a boolean, or an object with a `status` field.
    ///
    /// Unrecognised shapes read as `Uncovered`.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Bool(true) => Self::Covered,
            Value::String(s) => Self::from_label(s),
            Value::Object(obj) => obj
                .get("status")
                .map(Self::from_value)
                .unwrap_or(Self::Uncovered),
            _ => Self::Uncovered,
        }
    }

    fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().replace([' ', '-'], "_").as_str() {
            "covered" | "complete" | "completed" | "done" | "addressed" => Self::Covered,
            "partial" | "partially_covered" | "in_progress" => Self::Partial,
            _ => Self::Uncovered,
        }
    }
}

/// Per-topic coverage reported by the judge.
pub type CoverageMap = BTreeMap<String, FollowupStatus>;

/// Parses a coverage map; anything other than a JSON object yields `None`.
pub fn parse_coverage_map(value: &Value) -> Option<CoverageMap> {
    let obj = value.as_object()?;
    Some(
        obj.iter()
            .map(|(topic, status)| (topic.clone(), FollowupStatus::from_value(status)))
            .collect(),
    )
}

/// Everything one audit round hands the orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditResult {
    #[serde(default)]
    pub verdict: AuditVerdict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage_map: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_followup: Option<FollowupPrompt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Opaque completion-audit payload, stored for observability.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_audit: Option<Value>,
    /// Opaque question-presence payload, stored for observability.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence_audit: Option<Value>,
    /// Opaque per-answer scores, kept as the question's latest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<Value>,
}

impl AuditResult {
    /// Creates a result carrying only a verdict.
    pub fn with_verdict(verdict: impl Into<AuditVerdict>) -> Self {
        Self {
            verdict: verdict.into(),
            ..Default::default()
        }
    }

    pub fn with_coverage(mut self, coverage_map: Value) -> Self {
        self.coverage_map = Some(coverage_map);
        self
    }

    pub fn with_next_followup(mut self, id: impl Into<String>, prompt: impl Into<String>) -> Self {
        self.next_followup = Some(FollowupPrompt::new(id, prompt));
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_completion_audit(mut self, payload: Value) -> Self {
        self.completion_audit = Some(payload);
        self
    }

    pub fn with_presence_audit(mut self, payload: Value) -> Self {
        self.presence_audit = Some(payload);
        self
    }

    pub fn with_scores(mut self, scores: Value) -> Self {
        self.scores = Some(scores);
        self
    }

    /// Field-by-field extraction from loosely shaped judge JSON.
    ///
    /// Unlike `serde_json::from_value`, a bad field is dropped instead of
    /// failing the whole result. Non-string tags are skipped.
    pub fn from_json(value: &Value) -> Self {
        let verdict = value
            .get("verdict")
            .and_then(Value::as_str)
            .map(AuditVerdict::from)
            .unwrap_or_default();

        let coverage_map = value
            .get("coverage_map")
            .filter(|v| v.is_object())
            .cloned();

        let next_followup = value.get("next_followup").and_then(FollowupPrompt::from_value);

        let tags = value.get("tags").and_then(Value::as_array).map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        });

        Self {
            verdict,
            coverage_map,
            next_followup,
            tags,
            completion_audit: value.get("completion_audit").filter(|v| !v.is_null()).cloned(),
            presence_audit: value.get("presence_audit").filter(|v| !v.is_null()).cloned(),
            scores: value.get("scores").filter(|v| !v.is_null()).cloned(),
        }
    }
}

const NO_EXPERIENCE_FLAGS: [&str; 4] = [
    "no_experience",
    "noExperience",
    "lacks_experience",
    "user_has_no_experience",
];

const NO_EXPERIENCE_PHRASES: [&str; 10] = [
    "no experience",
    "no relevant experience",
    "don't have experience",
    "do not have experience",
    "don't have those experiences",
    "haven't used ai",
    "haven't used genai",
    "never used ai",
    "never used genai",
    "lack relevant experience",
];

/// Returns true if an opaque audit payload says the user has nothing to share.
///
/// Recognises explicit flags (`no_experience: true`, `has_experience: false`)
/// and the judge's free-text `reason`.
pub fn signals_no_experience(payload: &Value) -> bool {
    let Some(obj) = payload.as_object() else {
        return false;
    };

    if NO_EXPERIENCE_FLAGS
        .iter()
        .any(|flag| obj.get(*flag).and_then(Value::as_bool) == Some(true))
    {
        return true;
    }

    if ["has_experience", "hasExperience"]
        .iter()
        .any(|flag| obj.get(*flag).and_then(Value::as_bool) == Some(false))
    {
        return true;
    }

    obj.get("reason")
        .and_then(Value::as_str)
        .map(|reason| {
            let lower = reason.to_lowercase();
            NO_EXPERIENCE_PHRASES.iter().any(|p| lower.contains(p))
        })
        .unwrap_or(false)
}

const REASONING_MARKERS: [&str; 14] = [
    "reason:",
    "confidence",
    "brief explanation",
    "minimal information",
    "detailed response",
    "topic sufficiently explored",
    "follow-up conversation",
    "conversation ready",
    "adequately addressed",
    "thoroughly addressed",
    "audit decision",
    "evaluation criteria",
    "decision guidelines",
    "need more follow-up questions",
];

/// Returns true if a suggested follow-up reads like the judge's own reasoning
/// rather than something to ask the user.
pub fn looks_like_audit_reasoning(prompt: &str) -> bool {
    let lower = prompt.to_lowercase();
    REASONING_MARKERS.iter().any(|marker| lower.contains(marker))
}
