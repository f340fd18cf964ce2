//! Scripted utterance generator.
//!
//! Replays queued raw outputs. When the script runs dry it proposes the first
//! legal action with an empty utterance, which lets the composer fall back to
//! its fixed texts.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::interview::Action;
use crate::ports::{CollaboratorError, GenerationRequest, UtteranceGenerator};

/// Generator that returns pre-configured output.
#[derive(Debug, Clone, Default)]
pub struct ScriptedGenerator {
    script: Arc<Mutex<VecDeque<Result<String, CollaboratorError>>>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<GenerationRequest>>>,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues raw output, returned verbatim.
    pub fn with_output(self, raw: impl Into<String>) -> Self {
        locked(&self.script).push_back(Ok(raw.into()));
        self
    }

    /// Queues a well-formed JSON proposal.
    pub fn with_proposal(self, action: Action, utterance: &str) -> Self {
        let raw = serde_json::json!({
            "action": action.as_str(),
            "utterance": utterance,
        })
        .to_string();
        self.with_output(raw)
    }

    /// Queues a failure.
    pub fn with_error(self, error: CollaboratorError) -> Self {
        locked(&self.script).push_back(Err(error));
        self
    }

    /// Sets simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        locked(&self.calls).len()
    }

    pub fn calls(&self) -> Vec<GenerationRequest> {
        locked(&self.calls).clone()
    }
}

#[async_trait]
impl UtteranceGenerator for ScriptedGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, CollaboratorError> {
        locked(&self.calls).push(request.clone());

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let next = locked(&self.script).pop_front();
        match next {
            Some(output) => output,
            None => {
                let action = request
                    .legal_actions
                    .first()
                    .copied()
                    .unwrap_or(Action::NextQuestion);
                Ok(serde_json::json!({ "action": action.as_str(), "utterance": "" }).to_string())
            }
        }
    }
}
