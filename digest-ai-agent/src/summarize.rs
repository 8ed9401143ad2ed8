//! Structured-summary mode: one request, one extraction, no retries.
//!
//! Unlike the tool-call loop, a wrong-shaped answer here is surfaced to the
//! caller as a validation error rather than retried; with a single attempt
//! there is nothing to absorb it into.

use crate::prompts::SUMMARY_SYSTEM_PROMPT;
use digest_ai_extract::{mapping_from_text, ArticleSummary, ExtractError, SummarySchema, ValidationError};
use digest_ai_models::{ChatModel, ChatParameters, ChatRequest, ChatSettings, ModelError};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Error from a summarize run, keeping the failure classes apart.
#[derive(Debug, Error)]
pub enum SummarizeError {
    /// The backend call failed.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The answer carried no parseable JSON payload.
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// The payload parsed but does not match the summary shape.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Single-shot article summarizer.
pub struct Summarizer<M> {
    model: M,
    settings: ChatSettings,
}

impl<M: ChatModel> Summarizer<M> {
    /// Create a summarizer with the deployment defaults: temperature 0.1
    /// for stable output, a one-minute timeout.
    pub fn new(model: M) -> Self {
        Self {
            model,
            settings: ChatSettings::new()
                .temperature(0.1)
                .timeout(Duration::from_secs(60)),
        }
    }

    /// Override generation settings.
    #[must_use]
    pub fn with_settings(mut self, settings: ChatSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Summarize one article into the validated summary shape.
    ///
    /// # Errors
    ///
    /// [`SummarizeError::Model`] when the backend is unreachable or errors,
    /// [`SummarizeError::Extract`] when its answer holds no well-formed JSON,
    /// [`SummarizeError::Validation`] when the JSON has the wrong shape.
    pub async fn summarize(&self, article: &str) -> Result<ArticleSummary, SummarizeError> {
        let request = ChatRequest::new(
            SUMMARY_SYSTEM_PROMPT,
            format!("Analyze the following article:\n{article}"),
        );

        let response = self
            .model
            .request(&request, &self.settings, &ChatParameters::new())
            .await?;

        let content = response.content_text().unwrap_or_default();
        let mapping = mapping_from_text(content)?;
        let summary = SummarySchema::validate(&mapping)?;

        debug!(
            tags = summary.tags.len(),
            sentiment = ?summary.sentiment,
            "article summarized"
        );
        Ok(summary)
    }
}
