//! The article-summary target shape and its validator.
//!
//! Validation is deliberately explicit rather than a blind deserialize:
//! errors must name the offending field, extra fields are ignored, and
//! nothing is coerced.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;
use crate::parse::ParsedMapping;

/// Sentiment classification of an article.
///
/// Canonical wire values are English; the aliases accept the spellings used
/// by deployments whose prompts run in the original locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    /// Favorable tone.
    #[serde(rename = "positive", alias = "正面")]
    Positive,
    /// Neutral or mixed tone.
    #[serde(rename = "neutral", alias = "中立")]
    Neutral,
    /// Unfavorable tone.
    #[serde(rename = "negative", alias = "负面")]
    Negative,
}

impl Sentiment {
    /// Parse a raw string into a sentiment, accepting canonical values and
    /// locale aliases.
    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_value(Value::String(raw.to_string())).ok()
    }
}

/// A validated article summary. Immutable once constructed: the only way to
/// obtain one is through [`SummarySchema::validate`] or deserialization of
/// already-validated data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSummary {
    /// Condensed summary of the article.
    pub summary: String,
    /// Key topic tags.
    pub tags: Vec<String>,
    /// Overall sentiment.
    pub sentiment: Sentiment,
}

/// Validator for the summary target shape.
///
/// # Example
///
/// ```rust
/// use digest_ai_extract::{parse::mapping_from_text, summary::SummarySchema};
///
/// let mapping = mapping_from_text(
///     r#"{"summary": "Rust 1.75 ships.", "tags": ["rust"], "sentiment": "positive"}"#,
/// )
/// .unwrap();
/// let result = SummarySchema::validate(&mapping).unwrap();
/// assert_eq!(result.tags, vec!["rust"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SummarySchema;

impl SummarySchema {
    /// Validate a parsed mapping against the summary shape.
    ///
    /// Checks each required field for presence and type, and the sentiment
    /// value for enumeration membership. Fields beyond the target shape are
    /// ignored.
    ///
    /// # Errors
    ///
    /// [`ValidationError`] naming the first offending field.
    pub fn validate(mapping: &ParsedMapping) -> Result<ArticleSummary, ValidationError> {
        let summary = require_string(mapping, "summary")?.to_string();
        let tags = require_string_array(mapping, "tags")?;

        let raw_sentiment = require_string(mapping, "sentiment")?;
        let sentiment =
            Sentiment::parse(raw_sentiment).ok_or_else(|| ValidationError::UnknownVariant {
                field: "sentiment",
                value: raw_sentiment.to_string(),
            })?;

        Ok(ArticleSummary {
            summary,
            tags,
            sentiment,
        })
    }
}

fn require_string<'a>(
    mapping: &'a ParsedMapping,
    field: &'static str,
) -> Result<&'a str, ValidationError> {
    mapping
        .get(field)
        .ok_or(ValidationError::MissingField(field))?
        .as_str()
        .ok_or(ValidationError::InvalidType {
            field,
            expected: "string",
        })
}

fn require_string_array(
    mapping: &ParsedMapping,
    field: &'static str,
) -> Result<Vec<String>, ValidationError> {
    let items = mapping
        .get(field)
        .ok_or(ValidationError::MissingField(field))?
        .as_array()
        .ok_or(ValidationError::InvalidType {
            field,
            expected: "array of strings",
        })?;

    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or(ValidationError::InvalidType {
                    field,
                    expected: "array of strings",
                })
        })
        .collect()
}
