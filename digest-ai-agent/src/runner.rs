//! The bounded re-ask loop for tool-call mode.
//!
//! Attempts are strictly sequential: each request/recognize cycle completes
//! before the next begins, and the first recognition fires the effect sink
//! exactly once and ends the run. Transport and extraction failures are
//! absorbed into the attempt log and retried; running out of attempts is a
//! normal terminal state, not an error.

use crate::effect::{AlertSink, EffectError};
use crate::prompts::{ops_alert_tool, ALERT_SYSTEM_PROMPT, OPS_ALERT_TOOL};
use crate::recognize::{Recognition, ToolCallRecognizer, ToolInvocation};
use chrono::{DateTime, Utc};
use digest_ai_models::{ChatModel, ChatParameters, ChatRequest, ChatSettings, ToolChoice};
use std::time::Duration;
use tracing::{debug, warn};

/// Default attempt budget.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// How one attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The backend call itself failed.
    Transport(String),
    /// The response carried broken JSON on some surface.
    ExtractFailed(String),
    /// The model answered without invoking the tool.
    NoToolCall,
    /// A matching invocation was recognized.
    Recognized,
}

/// Bookkeeping for one attempt. Owned exclusively by the runner; used to
/// decide continue/stop and for final diagnostics, then discarded with the
/// outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRecord {
    /// 1-indexed attempt number.
    pub attempt: u32,
    /// How it ended.
    pub outcome: AttemptOutcome,
    /// When it ended.
    pub at: DateTime<Utc>,
}

/// Terminal state of a run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// An invocation was recognized and the effect fired.
    Completed {
        /// The recognized invocation.
        invocation: ToolInvocation,
        /// Confirmation string from the effect sink.
        confirmation: String,
        /// Attempts used, including the successful one.
        attempts: u32,
    },
    /// The attempt budget ran out without a recognition.
    Exhausted {
        /// Attempts used.
        attempts: u32,
        /// The most recent response text, for operator diagnosis. `None`
        /// when no response was ever received.
        last_content: Option<String>,
        /// The per-attempt log.
        records: Vec<AttemptRecord>,
    },
}

impl RunOutcome {
    /// Whether the run completed with a recognized invocation.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed { .. })
    }
}

/// Drives the bounded tool-call loop against a model and an alert sink.
pub struct ToolCallRunner<M, S> {
    model: M,
    sink: S,
    recognizer: ToolCallRecognizer,
    settings: ChatSettings,
    params: ChatParameters,
    max_attempts: u32,
}

impl<M: ChatModel, S: AlertSink> ToolCallRunner<M, S> {
    /// Create a runner for the standard ops-alert tool.
    ///
    /// Defaults follow the deployment this service fronts: temperature 0.0,
    /// a 32-token cap (the invocation JSON is tiny), a two-minute timeout,
    /// and a name-constrained tool choice.
    pub fn new(model: M, sink: S) -> Self {
        Self {
            model,
            sink,
            recognizer: ToolCallRecognizer::new(OPS_ALERT_TOOL),
            settings: ChatSettings::new()
                .temperature(0.0)
                .max_tokens(32)
                .timeout(Duration::from_secs(120)),
            params: ChatParameters::new()
                .with_tool(ops_alert_tool())
                .tool_choice(ToolChoice::Specific(OPS_ALERT_TOOL.to_string())),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Override the recognizer (and with it the expected tool).
    #[must_use]
    pub fn with_recognizer(mut self, recognizer: ToolCallRecognizer) -> Self {
        self.recognizer = recognizer;
        self
    }

    /// Override generation settings.
    #[must_use]
    pub fn with_settings(mut self, settings: ChatSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Override request parameters.
    #[must_use]
    pub fn with_params(mut self, params: ChatParameters) -> Self {
        self.params = params;
        self
    }

    /// Set the attempt budget. Clamped to at least one attempt.
    #[must_use]
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Run the loop for one incident description.
    ///
    /// # Errors
    ///
    /// Only the effect sink can error here; everything upstream of it is
    /// absorbed into the attempt log.
    pub async fn run(&self, incident: &str) -> Result<RunOutcome, EffectError> {
        let request = ChatRequest::new(ALERT_SYSTEM_PROMPT, incident);
        let mut records: Vec<AttemptRecord> = Vec::new();
        let mut last_content: Option<String> = None;

        for attempt in 1..=self.max_attempts {
            debug!(attempt, max_attempts = self.max_attempts, "issuing attempt");

            let response = match self
                .model
                .request(&request, &self.settings, &self.params)
                .await
            {
                Ok(response) => response,
                Err(error) => {
                    warn!(attempt, error = %error, "attempt failed in transport");
                    records.push(AttemptRecord {
                        attempt,
                        outcome: AttemptOutcome::Transport(error.to_string()),
                        at: Utc::now(),
                    });
                    continue;
                }
            };

            if let Some(content) = response.content_text() {
                last_content = Some(content.to_string());
            }

            match self.recognizer.recognize(&response) {
                Ok(Recognition::Call(invocation)) => {
                    records.push(AttemptRecord {
                        attempt,
                        outcome: AttemptOutcome::Recognized,
                        at: Utc::now(),
                    });
                    let confirmation = self.sink.dispatch(&invocation).await?;
                    debug!(attempt, confirmation = %confirmation, "run completed");
                    return Ok(RunOutcome::Completed {
                        invocation,
                        confirmation,
                        attempts: attempt,
                    });
                }
                Ok(Recognition::None) => {
                    debug!(attempt, "no tool call in response, retrying");
                    records.push(AttemptRecord {
                        attempt,
                        outcome: AttemptOutcome::NoToolCall,
                        at: Utc::now(),
                    });
                }
                Err(error) => {
                    warn!(attempt, error = %error, "attempt failed in extraction");
                    records.push(AttemptRecord {
                        attempt,
                        outcome: AttemptOutcome::ExtractFailed(error.to_string()),
                        at: Utc::now(),
                    });
                }
            }
        }

        warn!(
            attempts = self.max_attempts,
            got_any_response = last_content.is_some(),
            "attempt budget exhausted without a recognized tool call"
        );
        Ok(RunOutcome::Exhausted {
            attempts: self.max_attempts,
            last_content,
            records,
        })
    }
}
