//! Strict parsing of an isolated candidate into a JSON mapping.
//!
//! This is the only place syntactic JSON errors surface. Callers must not
//! conflate a [`ExtractError::JsonParse`] from here with the validator's
//! shape errors: the former means the model emitted broken JSON, the latter
//! means it emitted the wrong JSON.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ExtractError;
use crate::strip::candidate_from_text;

/// A parsed but not yet validated JSON mapping.
pub type ParsedMapping = Map<String, Value>;

/// Parse a candidate substring into a [`ParsedMapping`].
///
/// # Errors
///
/// [`ExtractError::JsonParse`] on syntactically invalid input (carrying a
/// bounded prefix of the candidate), [`ExtractError::NotAnObject`] when the
/// input is valid JSON but not an object.
pub fn parse_candidate(candidate: &str) -> Result<ParsedMapping, ExtractError> {
    let value: Value = serde_json::from_str(candidate)
        .map_err(|source| ExtractError::json_parse(source, candidate))?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(ExtractError::not_an_object(&other)),
    }
}

/// Strip raw model text and parse the result in one step.
///
/// # Example
///
/// ```rust
/// use digest_ai_extract::parse::mapping_from_text;
///
/// let text = "```json\n{\"name\": \"alert\"}\n```";
/// let mapping = mapping_from_text(text).unwrap();
/// assert_eq!(mapping["name"], "alert");
/// ```
pub fn mapping_from_text(text: &str) -> Result<ParsedMapping, ExtractError> {
    let candidate = candidate_from_text(text)?;
    let mapping = parse_candidate(&candidate)?;
    debug!(fields = mapping.len(), "parsed candidate mapping");
    Ok(mapping)
}
