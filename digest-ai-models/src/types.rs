//! Wire types for the OpenAI-compatible chat completions API.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// ============================================================================
// Request Types
// ============================================================================

/// Chat completion request body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    /// Model to use.
    pub model: String,
    /// Messages in the conversation.
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Maximum tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u64>,
    /// Tool definitions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ChatTool>>,
    /// Tool choice strategy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoiceValue>,
}

impl ChatCompletionRequest {
    /// Create a new request.
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: None,
            max_tokens: None,
            tools: None,
            tool_choice: None,
        }
    }
}

/// Chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message author.
    pub role: String,
    /// Message content.
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Tool definition in a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTool {
    /// Tool type (always "function").
    #[serde(rename = "type")]
    pub tool_type: String,
    /// Function definition.
    pub function: FunctionDefinition,
}

impl ChatTool {
    /// Create a function tool.
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: JsonValue,
    ) -> Self {
        Self {
            tool_type: "function".to_string(),
            function: FunctionDefinition {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }
}

/// Function definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// Function name.
    pub name: String,
    /// Function description.
    pub description: String,
    /// Parameter schema.
    pub parameters: JsonValue,
}

/// Tool choice value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolChoiceValue {
    /// String choice (`auto`, `none`, `required`).
    Mode(String),
    /// A specific function.
    Function {
        /// Choice type (always "function").
        #[serde(rename = "type")]
        choice_type: String,
        /// The function to call.
        function: FunctionChoice,
    },
}

impl ToolChoiceValue {
    /// `auto` choice.
    pub fn auto() -> Self {
        Self::Mode("auto".to_string())
    }

    /// `none` choice.
    pub fn none() -> Self {
        Self::Mode("none".to_string())
    }

    /// `required` choice.
    pub fn required() -> Self {
        Self::Mode("required".to_string())
    }

    /// Choice of a specific function by name.
    pub fn function(name: impl Into<String>) -> Self {
        Self::Function {
            choice_type: "function".to_string(),
            function: FunctionChoice { name: name.into() },
        }
    }
}

/// Function choice by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionChoice {
    /// Function name.
    pub name: String,
}

// ============================================================================
// Response Types
// ============================================================================

/// Chat completion response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    /// Response id.
    #[serde(default)]
    pub id: Option<String>,
    /// Model that generated the response.
    #[serde(default)]
    pub model: Option<String>,
    /// Completion choices.
    pub choices: Vec<ChatChoice>,
    /// Token usage.
    #[serde(default)]
    pub usage: Option<UsagePayload>,
}

/// One completion choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    /// The generated message.
    pub message: ResponseMessage,
    /// Why generation stopped.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// The assistant message in a response.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    /// Free-text content.
    #[serde(default)]
    pub content: Option<String>,
    /// Tool calls parsed by the backend.
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCallPayload>>,
    /// Refusal message, when the model declined.
    #[serde(default)]
    pub refusal: Option<String>,
}

/// A tool call in a response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallPayload {
    /// Tool call id.
    #[serde(default)]
    pub id: Option<String>,
    /// Tool type.
    #[serde(rename = "type", default)]
    pub tool_type: Option<String>,
    /// Function call details.
    pub function: FunctionCallPayload,
}

/// Function call details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCallPayload {
    /// Function name.
    pub name: String,
    /// Arguments as a JSON string.
    pub arguments: String,
}

/// Token usage payload.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct UsagePayload {
    /// Tokens in the prompt.
    #[serde(default)]
    pub prompt_tokens: u64,
    /// Tokens generated.
    #[serde(default)]
    pub completion_tokens: u64,
    /// Total.
    #[serde(default)]
    pub total_tokens: u64,
}

/// API error envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorEnvelope {
    /// The error payload.
    pub error: ApiErrorPayload,
}

/// API error payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorPayload {
    /// Error message.
    pub message: String,
    /// Error code.
    #[serde(default)]
    pub code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_skips_absent_options() {
        let req = ChatCompletionRequest::new("qwen2.5-1.5b", vec![ChatMessage::user("hi")]);
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("temperature").is_none());
        assert!(json.get("tools").is_none());
        assert_eq!(json["model"], "qwen2.5-1.5b");
    }

    #[test]
    fn test_tool_choice_serialization() {
        let json = serde_json::to_value(ToolChoiceValue::auto()).unwrap();
        assert_eq!(json, serde_json::json!("auto"));

        let json = serde_json::to_value(ToolChoiceValue::function("send_ops_alert")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "function", "function": {"name": "send_ops_alert"}})
        );
    }

    #[test]
    fn test_response_with_tool_calls_deserializes() {
        let body = serde_json::json!({
            "id": "cmpl-1",
            "model": "qwen2.5-1.5b",
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [{
                        "id": "call-1",
                        "type": "function",
                        "function": {"name": "send_ops_alert", "arguments": "{\"level\":\"error\"}"}
                    }]
                },
                "finish_reason": "tool_calls"
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        });

        let resp: ChatCompletionResponse = serde_json::from_value(body).unwrap();
        let calls = resp.choices[0].message.tool_calls.as_ref().unwrap();
        assert_eq!(calls[0].function.name, "send_ops_alert");
        assert_eq!(resp.usage.unwrap().total_tokens, 15);
    }

    #[test]
    fn test_minimal_response_deserializes() {
        let body = serde_json::json!({
            "choices": [{"message": {"content": "plain answer"}}]
        });
        let resp: ChatCompletionResponse = serde_json::from_value(body).unwrap();
        assert_eq!(
            resp.choices[0].message.content.as_deref(),
            Some("plain answer")
        );
    }

    #[test]
    fn test_error_envelope_deserializes() {
        let body = serde_json::json!({
            "error": {"message": "model not loaded", "code": "model_not_found"}
        });
        let envelope: ApiErrorEnvelope = serde_json::from_value(body).unwrap();
        assert_eq!(envelope.error.code.as_deref(), Some("model_not_found"));
    }
}
