//! # digest-ai-extract
//!
//! Recovery of structured JSON payloads from free-form model output.
//!
//! Language models wrap the JSON they were asked for in prose, markdown
//! fences, or both, and occasionally emit broken JSON outright. This crate
//! provides the three stages that turn that text into a typed result:
//!
//! - **[`strip::candidate_from_text`]**: isolate the substring most likely to
//!   hold a JSON object (fence interiors, outer-brace narrowing).
//! - **[`parse::parse_candidate`]**: strict parse into a mapping, with parse
//!   failures reported distinctly from absence of candidate text.
//! - **[`summary::SummarySchema`]**: validate a mapping against the article
//!   summary shape, producing an immutable [`summary::ArticleSummary`].
//!
//! The stages fail independently so callers can tell "no JSON found" from
//! "JSON found but wrong shape": a retry loop re-asks on the former while a
//! single-shot caller surfaces the latter.
//!
//! ## Example
//!
//! ```rust
//! use digest_ai_extract::prelude::*;
//!
//! let raw = "Here is your analysis:\n```json\n{\"summary\": \"Ships today.\", \
//!            \"tags\": [\"release\"], \"sentiment\": \"positive\"}\n```";
//! let mapping = mapping_from_text(raw).unwrap();
//! let result = SummarySchema::validate(&mapping).unwrap();
//! assert_eq!(result.sentiment, Sentiment::Positive);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod parse;
pub mod strip;
pub mod summary;

// Re-exports
pub use error::{ExtractError, ValidationError, SNIPPET_MAX_CHARS};
pub use parse::{mapping_from_text, parse_candidate, ParsedMapping};
pub use strip::candidate_from_text;
pub use summary::{ArticleSummary, Sentiment, SummarySchema};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        candidate_from_text, mapping_from_text, parse_candidate, ArticleSummary, ExtractError,
        ParsedMapping, Sentiment, SummarySchema, ValidationError,
    };
}
