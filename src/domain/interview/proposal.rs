//! Parsing of the text generator's proposed turn.
//!
//! Generators are asked for JSON like
//! `{"action": "ASK_FOLLOWUP", "utterance": "...", "question_id": "q2", "notes": []}`
//! but often wrap it in markdown fences or prose. Parsing is lenient and
//! never fails: the enforcer copes with a missing action.

use serde_json::Value;

use super::action::Action;

/// What the generator proposed for this turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProposedTurn {
    /// Proposed action; `None` when absent or unknown.
    pub action: Option<Action>,
    pub utterance: String,
    pub question_id: Option<String>,
    pub notes: Vec<String>,
}

impl ProposedTurn {
    /// Creates a proposal directly, bypassing parsing.
    pub fn new(action: Option<Action>, utterance: impl Into<String>) -> Self {
        Self {
            action,
            utterance: utterance.into(),
            ..Default::default()
        }
    }

    /// Parses raw generator output.
    ///
    /// Text with no usable JSON object becomes a proposal with no action whose
    /// utterance is the trimmed text.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let candidate = extract_json_object(trimmed);

        match candidate.and_then(|json| serde_json::from_str::<Value>(&json).ok()) {
            Some(Value::Object(obj)) => {
                let action = obj
                    .get("action")
                    .and_then(Value::as_str)
                    .and_then(|s| s.parse::<Action>().ok());

                let utterance = obj
                    .get("utterance")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();

                let question_id = match obj.get("question_id") {
                    Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
                    Some(Value::Number(n)) => Some(n.to_string()),
                    _ => None,
                };

                let notes = obj
                    .get("notes")
                    .and_then(Value::as_array)
                    .map(|items| {
                        items
                            .iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default();

                Self {
                    action,
                    utterance,
                    question_id,
                    notes,
                }
            }
            _ => {
                tracing::debug!("Generator output is not a JSON object; using it as utterance");
                Self::new(None, trimmed)
            }
        }
    }
}

/// Finds the JSON object inside a response, looking in code fences first.
fn extract_json_object(s: &str) -> Option<String> {
    if let Some(fenced) = extract_from_code_block(s) {
        if let Some(start) = fenced.find('{') {
            return extract_balanced_object(&fenced, start);
        }
    }
    let start = s.find('{')?;
    extract_balanced_object(s, start)
}

fn extract_from_code_block(s: &str) -> Option<String> {
    let patterns = ["```json\n", "```json\r\n", "```JSON\n", "```\n", "```\r\n"];

    for pattern in patterns {
        if let Some(start) = s.find(pattern) {
            let body_start = start + pattern.len();
            let body = &s[body_start..];
            let end = body.find("```").unwrap_or(body.len());
            return Some(body[..end].trim().to_string());
        }
    }
    None
}

fn extract_balanced_object(s: &str, start: usize) -> Option<String> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (offset, c) in s[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    let end = start + offset + c.len_utf8();
                    return Some(s[start..end].to_string());
                }
            }
            _ => {}
        }
    }
    None
}
