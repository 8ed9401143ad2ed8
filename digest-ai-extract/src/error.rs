//! Error types for payload extraction and summary validation.

use thiserror::Error;

/// Maximum number of characters of a failed candidate kept for diagnostics.
pub const SNIPPET_MAX_CHARS: usize = 500;

/// Error while recovering a JSON payload from model text.
///
/// These are failures of a single extraction attempt. Callers running a retry
/// loop absorb them and re-ask the model; single-shot callers surface them.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The model returned no text at all (empty or whitespace-only).
    #[error("model returned empty output")]
    EmptyInput,

    /// A candidate was isolated but is not syntactically valid JSON.
    #[error("failed to parse candidate as JSON: {source} (candidate prefix: {snippet:?})")]
    JsonParse {
        /// The underlying serde_json error.
        #[source]
        source: serde_json::Error,
        /// Bounded-length prefix of the candidate, for diagnostics.
        snippet: String,
    },

    /// The candidate parsed, but the top-level value is not a JSON object.
    #[error("candidate parsed to a non-object JSON value ({kind})")]
    NotAnObject {
        /// What the top-level value actually was.
        kind: &'static str,
    },
}

impl ExtractError {
    /// Create a parse error, truncating the candidate to the diagnostic bound.
    pub fn json_parse(source: serde_json::Error, candidate: &str) -> Self {
        Self::JsonParse {
            source,
            snippet: truncate_chars(candidate, SNIPPET_MAX_CHARS),
        }
    }

    /// Create a not-an-object error from the offending value.
    pub fn not_an_object(value: &serde_json::Value) -> Self {
        Self::NotAnObject {
            kind: json_kind(value),
        }
    }
}

/// Error while validating a parsed mapping against the summary shape.
///
/// Distinct from [`ExtractError`]: the payload was well-formed JSON, but its
/// fields do not match the target shape. In single-shot summary mode this is
/// surfaced to the caller rather than retried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is absent.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A field is present but has the wrong JSON type.
    #[error("invalid type for field '{field}': expected {expected}")]
    InvalidType {
        /// The offending field name.
        field: &'static str,
        /// The expected type, human-readable.
        expected: &'static str,
    },

    /// An enumerated field holds a value outside its enumeration.
    #[error("invalid value for field '{field}': {value:?} is not a recognized variant")]
    UnknownVariant {
        /// The offending field name.
        field: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// Name a JSON value's type for error messages.
fn json_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Truncate on a char boundary so multi-byte text never splits.
fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
