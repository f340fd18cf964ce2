//! Interview actions and the legal-action set.
//!
//! Exactly one [`Action`] is chosen per turn. The orchestrator restricts the
//! choice through an [`ActionSet`], a bitset over the closed action enum.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What the agent does on its next outbound turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Probe deeper into the current question.
    AskFollowup,
    /// Ask the user to clarify what they just said.
    RequestClarify,
    /// Recap the answer, optionally moving on.
    SummarizeQuestion,
    /// Move on to the next catalog question.
    NextQuestion,
    /// Close the interview.
    End,
}

impl Action {
    /// All actions in declaration order.
    pub const ALL: [Action; 5] = [
        Action::AskFollowup,
        Action::RequestClarify,
        Action::SummarizeQuestion,
        Action::NextQuestion,
        Action::End,
    ];

    /// Wire name, as exchanged with the text generator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AskFollowup => "ASK_FOLLOWUP",
            Self::RequestClarify => "REQUEST_CLARIFY",
            Self::SummarizeQuestion => "SUMMARIZE_QUESTION",
            Self::NextQuestion => "NEXT_QUESTION",
            Self::End => "END",
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown action: {0}")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == normalized)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

/// Set of actions, stored as a bitset.
///
/// Iteration always follows [`Action::ALL`] order, which keeps the list handed
/// to the generator stable from turn to turn.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "Vec<Action>", from = "Vec<Action>")]
pub struct ActionSet(u8);

impl ActionSet {
    /// The set with no actions.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Actions legal when a fresh question becomes current.
    pub fn baseline() -> Self {
        Self::of(&[
            Action::AskFollowup,
            Action::RequestClarify,
            Action::SummarizeQuestion,
            Action::NextQuestion,
        ])
    }

    /// Actions legal once the current question may be left.
    pub fn fast_forward() -> Self {
        Self::of(&[Action::NextQuestion, Action::SummarizeQuestion])
    }

    /// Actions legal while the audit says the answer is not complete yet.
    pub fn probing() -> Self {
        Self::of(&[Action::AskFollowup, Action::RequestClarify])
    }

    /// The only action legal while a follow-up is pinned.
    pub fn pinned_followup() -> Self {
        Self::of(&[Action::AskFollowup])
    }

    /// Builds a set from a slice of actions.
    pub fn of(actions: &[Action]) -> Self {
        actions.iter().copied().collect()
    }

    /// Returns true if the action is in the set.
    pub fn contains(&self, action: Action) -> bool {
        self.0 & action.bit() != 0
    }

    /// Adds an action to the set.
    pub fn insert(&mut self, action: Action) {
        self.0 |= action.bit();
    }

    /// Returns true if no action is legal.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Number of actions in the set.
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates the set in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Action> + '_ {
        Action::ALL.into_iter().filter(move |a| self.contains(*a))
    }

    /// Collects the set into an ordered list.
    pub fn to_vec(&self) -> Vec<Action> {
        self.iter().collect()
    }
}

impl FromIterator<Action> for ActionSet {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        let mut set = ActionSet::empty();
        for action in iter {
            set.insert(action);
        }
        set
    }
}

impl From<Vec<Action>> for ActionSet {
    fn from(actions: Vec<Action>) -> Self {
        actions.into_iter().collect()
    }
}

impl From<ActionSet> for Vec<Action> {
    fn from(set: ActionSet) -> Self {
        set.to_vec()
    }
}

impl fmt::Debug for ActionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
