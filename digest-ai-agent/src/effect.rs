//! The effect collaborator behind a recognized tool call.
//!
//! The orchestrator hands a validated [`ToolInvocation`] to an [`AlertSink`]
//! and relays the confirmation string back. The real dispatcher (chat ops,
//! pager, webhook) lives outside this crate; [`LogAlertSink`] is the bundled
//! implementation that emits through `tracing`.

use crate::recognize::ToolInvocation;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// Error from dispatching an alert.
#[derive(Debug, Error)]
pub enum EffectError {
    /// A required argument was absent from the invocation.
    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),

    /// The downstream dispatcher failed.
    #[error("alert dispatch failed: {0}")]
    Dispatch(String),
}

/// Receives recognized alert invocations.
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Perform the alert action and return a confirmation string.
    ///
    /// Invoked at most once per orchestrator run.
    async fn dispatch(&self, invocation: &ToolInvocation) -> Result<String, EffectError>;
}

#[async_trait]
impl<T: AlertSink + ?Sized> AlertSink for std::sync::Arc<T> {
    async fn dispatch(&self, invocation: &ToolInvocation) -> Result<String, EffectError> {
        (**self).dispatch(invocation).await
    }
}

/// Sink that emits alerts to the process log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAlertSink;

impl LogAlertSink {
    /// Create a new log sink.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AlertSink for LogAlertSink {
    async fn dispatch(&self, invocation: &ToolInvocation) -> Result<String, EffectError> {
        let message = invocation
            .arguments
            .get("message")
            .and_then(Value::as_str)
            .ok_or(EffectError::MissingArgument("message"))?;

        let level = invocation
            .arguments
            .get("level")
            .and_then(Value::as_str)
            .unwrap_or("info");

        warn!(level, message, "ops alert dispatched");
        Ok(format!("alert dispatched at level {level}"))
    }
}
