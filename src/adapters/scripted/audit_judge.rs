//! Scripted audit judge.
//!
//! Replays queued audit results in order, so interview flows can be tested
//! and demoed without a real judge.
//!
//! # Example
//!
//! ```ignore
//! let judge = ScriptedAuditJudge::new()
//!     .with_result(AuditResult::with_verdict("REQUIRE_MORE"))
//!     .with_error(CollaboratorError::Timeout { timeout_secs: 30 });
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::interview::AuditResult;
use crate::ports::{AuditJudge, AuditRequest, CollaboratorError};

/// Audit judge that returns pre-configured results.
#[derive(Debug, Clone, Default)]
pub struct ScriptedAuditJudge {
    /// Results consumed in order.
    script: Arc<Mutex<VecDeque<Result<AuditResult, CollaboratorError>>>>,
    delay: Duration,
    /// Requests received, for verification.
    calls: Arc<Mutex<Vec<AuditRequest>>>,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ScriptedAuditJudge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful result.
    pub fn with_result(self, result: AuditResult) -> Self {
        locked(&self.script).push_back(Ok(result));
        self
    }

    /// Queues a result parsed from loosely shaped judge JSON.
    pub fn with_json(self, value: serde_json::Value) -> Self {
        self.with_result(AuditResult::from_json(&value))
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

    pub fn calls(&self) -> Vec<AuditRequest> {
        locked(&self.calls).clone()
    }

    /// Results not yet consumed.
    pub fn remaining(&self) -> usize {
        locked(&self.script).len()
    }
}

#[async_trait]
impl AuditJudge for ScriptedAuditJudge {
    async fn audit(&self, request: &AuditRequest) -> Result<AuditResult, CollaboratorError> {
        locked(&self.calls).push(request.clone());

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        // An exhausted script keeps the interview on its current question.
        locked(&self.script)
            .pop_front()
            .unwrap_or_else(|| Ok(AuditResult::default()))
    }
}
