//! Tag to action lookup table.
//!
//! The judge attaches categorical tags to an answer ("No_able_answer" and so
//! on). Tags listed here force an action; any other tag is ignored. Tags
//! are compared case-insensitively, since configuration sources lowercase
//! map keys.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::action::Action;

/// Tag the judge uses when the user gave no usable answer.
pub const NO_ABLE_ANSWER: &str = "No_able_answer";

/// Externally configurable mapping from tag to forced action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, Action>",
    into = "BTreeMap<String, Action>"
)]
pub struct TagTable {
    entries: BTreeMap<String, Action>,
}

fn normalize(tag: &str) -> String {
    tag.trim().to_lowercase()
}

impl TagTable {
    /// A table with no entries; every tag is ignored.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Adds or replaces an entry.
    pub fn with_entry(mut self, tag: impl AsRef<str>, action: Action) -> Self {
        self.entries.insert(normalize(tag.as_ref()), action);
        self
    }

    /// Action forced by one tag, if the tag is known.
    pub fn action_for(&self, tag: &str) -> Option<Action> {
        self.entries.get(&normalize(tag)).copied()
    }

    /// Returns true if any of `tags` maps to `action`.
    pub fn any_maps_to(&self, tags: &[String], action: Action) -> bool {
        tags.iter().any(|tag| self.action_for(tag) == Some(action))
    }

    /// Returns true if any of `tags` forces moving on to the next question.
    pub fn fast_forwards(&self, tags: &[String]) -> bool {
        self.any_maps_to(tags, Action::NextQuestion)
    }

    /// First in-question action (`SUMMARIZE_QUESTION` or `REQUEST_CLARIFY`)
    /// forced by `tags`.
    ///
    /// `NEXT_QUESTION` mappings take the fast-forward path instead; mappings
    /// to any other action are ignored.
    pub fn forced_action(&self, tags: &[String]) -> Option<Action> {
        tags.iter()
            .filter_map(|tag| self.action_for(tag))
            .find(|action| matches!(action, Action::SummarizeQuestion | Action::RequestClarify))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TagTable {
    fn default() -> Self {
        Self::empty().with_entry(NO_ABLE_ANSWER, Action::NextQuestion)
    }
}

impl FromIterator<(String, Action)> for TagTable {
    fn from_iter<I: IntoIterator<Item = (String, Action)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(tag, action)| (normalize(&tag), action))
                .collect(),
        }
    }
}

impl From<BTreeMap<String, Action>> for TagTable {
    fn from(entries: BTreeMap<String, Action>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<TagTable> for BTreeMap<String, Action> {
    fn from(table: TagTable) -> Self {
        table.entries
    }
}
