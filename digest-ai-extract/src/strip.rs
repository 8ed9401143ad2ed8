//! Fence and boundary stripping.
//!
//! Model answers wrap their JSON in markdown fences, lead-in prose, or both.
//! This module isolates the substring most likely to hold the payload; it
//! never judges whether that substring is valid JSON; that is the parser's
//! job, so "no braces found" comes back unchanged rather than as an error.

use crate::error::ExtractError;

/// Isolate the candidate JSON substring from raw model text.
///
/// Steps, in order:
///
/// 1. Fail with [`ExtractError::EmptyInput`] if the trimmed text is empty.
/// 2. If a triple-backtick fenced block (optionally tagged `json`) is
///    present, replace the working text with the block's trimmed interior.
/// 3. Narrow to the inclusive span between the first `{` and the last `}`
///    when both exist in that order; otherwise return the working text
///    unchanged.
///
/// # Example
///
/// ```rust
/// use digest_ai_extract::strip::candidate_from_text;
///
/// let text = "Sure! Here you go:\n```json\n{\"summary\": \"…\"}\n```\nDone.";
/// assert_eq!(candidate_from_text(text).unwrap(), "{\"summary\": \"…\"}");
/// ```
pub fn candidate_from_text(text: &str) -> Result<String, ExtractError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ExtractError::EmptyInput);
    }

    let working = fenced_interior(trimmed).unwrap_or(trimmed);

    Ok(narrow_to_braces(working).to_string())
}

/// Interior of the first triple-backtick fence, if one is properly closed.
///
/// Accepts ```` ```json ````, ```` ``` ````, and a tag on the same line as
/// the opener. Returns the trimmed interior.
fn fenced_interior(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_open = &text[open + 3..];

    // Skip an optional `json` tag directly after the opener.
    let body = after_open
        .strip_prefix("json")
        .filter(|rest| rest.starts_with(['\n', '\r', ' ']) || rest.starts_with("```"))
        .unwrap_or(after_open);

    let close = body.find("```")?;
    Some(body[..close].trim())
}

/// Narrow to the first-`{`..=last-`}` span, or return the input unchanged.
fn narrow_to_braces(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if end > start => &text[start..=end],
        _ => text,
    }
}
