//! Tool-call recognition.
//!
//! A model response offers two surfaces that may carry an invocation: the
//! backend's native tool-call descriptors, and the free text the model wrote.
//! Recognition walks an ordered list of [`ExtractionStrategy`] objects, one
//! per surface, so a new backend dialect is a new strategy rather than
//! another branch in the orchestrator.

use digest_ai_extract::{mapping_from_text, ExtractError, ParsedMapping};
use digest_ai_models::ChatResponse;
use serde_json::Value;
use tracing::debug;

/// A recognized tool invocation.
///
/// `name` is non-empty and `arguments` is a JSON mapping; both are
/// guaranteed by construction in the strategies below.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocation {
    /// The invoked tool's name.
    pub name: String,
    /// The argument mapping.
    pub arguments: ParsedMapping,
}

/// Outcome of recognition against one response.
///
/// `None` is a negative result, not an error: the model answered without
/// invoking the tool. Malformed JSON on a surface is an [`ExtractError`]
/// instead, and callers log the two differently.
#[derive(Debug, Clone, PartialEq)]
pub enum Recognition {
    /// A matching invocation was found.
    Call(ToolInvocation),
    /// No matching structured intent on any surface.
    None,
}

impl Recognition {
    /// Whether a call was recognized.
    #[must_use]
    pub fn is_call(&self) -> bool {
        matches!(self, Recognition::Call(_))
    }
}

/// One way of pulling an invocation out of a response surface.
pub trait ExtractionStrategy: Send + Sync {
    /// Strategy name, for logs.
    fn name(&self) -> &'static str;

    /// Attempt extraction. `Ok(Recognition::None)` means "nothing on this
    /// surface, try the next one"; `Err` means this surface carried broken
    /// data and the attempt must fail rather than fall through.
    fn extract(
        &self,
        response: &ChatResponse,
        expected_tool: &str,
    ) -> Result<Recognition, ExtractError>;
}

/// Extracts from the backend's native tool-call descriptor list.
///
/// The first descriptor whose name matches wins. A matching descriptor with
/// unparseable or non-mapping arguments is a hard failure: the backend
/// claimed a call happened, so silently retrying against the text surface
/// would mask the malformation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeDescriptorStrategy;

impl ExtractionStrategy for NativeDescriptorStrategy {
    fn name(&self) -> &'static str {
        "native-descriptor"
    }

    fn extract(
        &self,
        response: &ChatResponse,
        expected_tool: &str,
    ) -> Result<Recognition, ExtractError> {
        let Some(call) = response
            .tool_calls
            .iter()
            .find(|call| call.name == expected_tool)
        else {
            return Ok(Recognition::None);
        };

        let value: Value = serde_json::from_str(&call.arguments)
            .map_err(|source| ExtractError::json_parse(source, &call.arguments))?;

        match value {
            Value::Object(arguments) => Ok(Recognition::Call(ToolInvocation {
                name: call.name.clone(),
                arguments,
            })),
            other => Err(ExtractError::not_an_object(&other)),
        }
    }
}

/// Recovers an invocation from the response's free text.
///
/// The stripped-and-parsed mapping is read as `{name, arguments}`, with
/// `parameters` accepted as a legacy alias for the arguments key. A mapping
/// that does not fit that shape is a negative result: the model answered
/// conversationally, which is normal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRecoveryStrategy;

impl ExtractionStrategy for TextRecoveryStrategy {
    fn name(&self) -> &'static str {
        "text-recovery"
    }

    fn extract(
        &self,
        response: &ChatResponse,
        expected_tool: &str,
    ) -> Result<Recognition, ExtractError> {
        let content = response.content_text().ok_or(ExtractError::EmptyInput)?;
        let mapping = mapping_from_text(content)?;

        let name = match mapping.get("name").and_then(Value::as_str) {
            Some(name) if !name.is_empty() && name == expected_tool => name.to_string(),
            _ => return Ok(Recognition::None),
        };

        let arguments = match mapping
            .get("arguments")
            .or_else(|| mapping.get("parameters"))
        {
            Some(Value::Object(args)) => args.clone(),
            _ => return Ok(Recognition::None),
        };

        Ok(Recognition::Call(ToolInvocation { name, arguments }))
    }
}

/// Drives the ordered strategy list against a response.
pub struct ToolCallRecognizer {
    expected_tool: String,
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl ToolCallRecognizer {
    /// Recognizer with the standard surfaces: native descriptors first,
    /// text recovery second.
    pub fn new(expected_tool: impl Into<String>) -> Self {
        Self {
            expected_tool: expected_tool.into(),
            strategies: vec![
                Box::new(NativeDescriptorStrategy),
                Box::new(TextRecoveryStrategy),
            ],
        }
    }

    /// Recognizer with a custom strategy list, tried in order.
    pub fn with_strategies(
        expected_tool: impl Into<String>,
        strategies: Vec<Box<dyn ExtractionStrategy>>,
    ) -> Self {
        Self {
            expected_tool: expected_tool.into(),
            strategies,
        }
    }

    /// The tool name this recognizer accepts.
    #[must_use]
    pub fn expected_tool(&self) -> &str {
        &self.expected_tool
    }

    /// Run the strategies in order, short-circuiting on the first call or
    /// the first hard failure.
    pub fn recognize(&self, response: &ChatResponse) -> Result<Recognition, ExtractError> {
        for strategy in &self.strategies {
            match strategy.extract(response, &self.expected_tool)? {
                Recognition::Call(invocation) => {
                    debug!(
                        strategy = strategy.name(),
                        tool = %invocation.name,
                        "tool call recognized"
                    );
                    return Ok(Recognition::Call(invocation));
                }
                Recognition::None => {
                    debug!(strategy = strategy.name(), "no match on surface");
                }
            }
        }
        Ok(Recognition::None)
    }
}

impl std::fmt::Debug for ToolCallRecognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolCallRecognizer")
            .field("expected_tool", &self.expected_tool)
            .field("strategies", &self.strategies.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use digest_ai_models::NativeToolCall;
    use pretty_assertions::assert_eq;

    fn args_mapping(json: &str) -> ParsedMapping {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_native_descriptor_is_recognized() {
        let resp = ChatResponse::tool_call(NativeToolCall::new(
            "send_ops_alert",
            r#"{"message":"disk full","level":"warning"}"#,
        ));
        let recognizer = ToolCallRecognizer::new("send_ops_alert");

        let recognition = recognizer.recognize(&resp).unwrap();
        assert_eq!(
            recognition,
            Recognition::Call(ToolInvocation {
                name: "send_ops_alert".to_string(),
                arguments: args_mapping(r#"{"message":"disk full","level":"warning"}"#),
            })
        );
    }

    #[test]
    fn test_native_wins_over_text_when_both_present() {
        let mut resp = ChatResponse::text(
            r#"{"name":"send_ops_alert","arguments":{"message":"from text"}}"#,
        );
        resp = resp.with_tool_call(NativeToolCall::new(
            "send_ops_alert",
            r#"{"message":"from descriptor"}"#,
        ));
        let recognizer = ToolCallRecognizer::new("send_ops_alert");

        match recognizer.recognize(&resp).unwrap() {
            Recognition::Call(invocation) => {
                assert_eq!(invocation.arguments["message"], "from descriptor");
            }
            Recognition::None => panic!("expected a call"),
        }
    }

    #[test]
    fn test_malformed_native_arguments_fail_hard() {
        // Valid JSON sits in the text, but the matching native descriptor is
        // broken: that must surface as a parse error, not fall through.
        let mut resp = ChatResponse::text(
            r#"{"name":"send_ops_alert","arguments":{"message":"from text"}}"#,
        );
        resp = resp.with_tool_call(NativeToolCall::new("send_ops_alert", r#"{"message": "#));
        let recognizer = ToolCallRecognizer::new("send_ops_alert");

        let err = recognizer.recognize(&resp).unwrap_err();
        assert!(matches!(err, ExtractError::JsonParse { .. }));
    }

    #[test]
    fn test_native_non_mapping_arguments_fail_hard() {
        let resp =
            ChatResponse::tool_call(NativeToolCall::new("send_ops_alert", r#""just a string""#));
        let recognizer = ToolCallRecognizer::new("send_ops_alert");

        let err = recognizer.recognize(&resp).unwrap_err();
        assert!(matches!(err, ExtractError::NotAnObject { kind: "string" }));
    }

    #[test]
    fn test_differently_named_descriptor_falls_through_to_text() {
        let mut resp = ChatResponse::text(
            r#"{"name":"send_ops_alert","arguments":{"message":"recovered"}}"#,
        );
        resp = resp.with_tool_call(NativeToolCall::new("some_other_tool", r#"{}"#));
        let recognizer = ToolCallRecognizer::new("send_ops_alert");

        match recognizer.recognize(&resp).unwrap() {
            Recognition::Call(invocation) => {
                assert_eq!(invocation.arguments["message"], "recovered");
            }
            Recognition::None => panic!("expected text recovery to match"),
        }
    }

    #[test]
    fn test_tool_call_markup_is_recovered_from_text() {
        let resp = ChatResponse::text(
            "<tool_call>{\"name\":\"alert\",\"arguments\":{\"message\":\"cpu high\",\"level\":\"error\"}}</tool_call>",
        );
        let recognizer = ToolCallRecognizer::new("alert");

        match recognizer.recognize(&resp).unwrap() {
            Recognition::Call(invocation) => {
                assert_eq!(invocation.name, "alert");
                assert_eq!(invocation.arguments["message"], "cpu high");
                assert_eq!(invocation.arguments["level"], "error");
            }
            Recognition::None => panic!("expected a call"),
        }
    }

    #[test]
    fn test_legacy_parameters_key_is_accepted() {
        let resp =
            ChatResponse::text(r#"{"name":"alert","parameters":{"message":"old dialect"}}"#);
        let recognizer = ToolCallRecognizer::new("alert");

        match recognizer.recognize(&resp).unwrap() {
            Recognition::Call(invocation) => {
                assert_eq!(invocation.arguments["message"], "old dialect");
            }
            Recognition::None => panic!("expected a call"),
        }
    }

    #[test]
    fn test_wrong_name_in_text_is_negative() {
        let resp = ChatResponse::text(r#"{"name":"other_tool","arguments":{}}"#);
        let recognizer = ToolCallRecognizer::new("alert");
        assert_eq!(recognizer.recognize(&resp).unwrap(), Recognition::None);
    }

    #[test]
    fn test_missing_name_is_negative() {
        let resp = ChatResponse::text(r#"{"arguments":{"message":"hi"}}"#);
        let recognizer = ToolCallRecognizer::new("alert");
        assert_eq!(recognizer.recognize(&resp).unwrap(), Recognition::None);
    }

    #[test]
    fn test_empty_name_is_negative() {
        let resp = ChatResponse::text(r#"{"name":"","arguments":{}}"#);
        let recognizer = ToolCallRecognizer::new("");
        // Even with an empty expected tool, an empty name never recognizes.
        assert_eq!(recognizer.recognize(&resp).unwrap(), Recognition::None);
    }

    #[test]
    fn test_scalar_arguments_in_text_are_negative() {
        let resp = ChatResponse::text(r#"{"name":"alert","arguments":"not a mapping"}"#);
        let recognizer = ToolCallRecognizer::new("alert");
        assert_eq!(recognizer.recognize(&resp).unwrap(), Recognition::None);
    }

    #[test]
    fn test_list_arguments_in_text_are_negative() {
        let resp = ChatResponse::text(r#"{"name":"alert","arguments":[1, 2]}"#);
        let recognizer = ToolCallRecognizer::new("alert");
        assert_eq!(recognizer.recognize(&resp).unwrap(), Recognition::None);
    }

    #[test]
    fn test_conversational_answer_is_a_parse_error() {
        let resp = ChatResponse::text("Everything looks fine, no alert needed!");
        let recognizer = ToolCallRecognizer::new("alert");
        let err = recognizer.recognize(&resp).unwrap_err();
        assert!(matches!(err, ExtractError::JsonParse { .. }));
    }

    #[test]
    fn test_empty_content_is_empty_input() {
        let resp = ChatResponse::text("   ");
        let recognizer = ToolCallRecognizer::new("alert");
        let err = recognizer.recognize(&resp).unwrap_err();
        assert!(matches!(err, ExtractError::EmptyInput));
    }
}
