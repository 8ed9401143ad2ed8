//! The chat model abstraction.
//!
//! A [`ChatModel`] issues one chat-completion request and returns a
//! [`ChatResponse`] exposing the two surfaces downstream recognition cares
//! about: the native tool-call descriptor list and the free-text content.

use crate::error::ModelError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::time::Duration;

/// One chat exchange: a system instruction plus a user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    /// System instruction.
    pub system: String,
    /// User message.
    pub user: String,
}

impl ChatRequest {
    /// Create a new request.
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }
}

/// Generation settings for a request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatSettings {
    /// Sampling temperature.
    pub temperature: Option<f64>,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u64>,
    /// Request timeout.
    pub timeout: Option<Duration>,
}

impl ChatSettings {
    /// Create new empty settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set temperature.
    #[must_use]
    pub fn temperature(mut self, temp: f64) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// Set max tokens.
    #[must_use]
    pub fn max_tokens(mut self, tokens: u64) -> Self {
        self.max_tokens = Some(tokens);
        self
    }

    /// Set timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set timeout in seconds.
    #[must_use]
    pub fn timeout_secs(self, secs: u64) -> Self {
        self.timeout(Duration::from_secs(secs))
    }
}

/// A tool the model may invoke.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name.
    pub name: String,
    /// What the tool does, for the model's benefit.
    pub description: String,
    /// JSON Schema of the arguments object.
    pub parameters: JsonValue,
}

impl ToolDefinition {
    /// Create a new tool definition with an empty parameter schema.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: serde_json::json!({ "type": "object", "properties": {} }),
        }
    }

    /// Set the parameter schema.
    #[must_use]
    pub fn with_parameters(mut self, parameters: JsonValue) -> Self {
        self.parameters = parameters;
        self
    }
}

/// How the backend should choose among advertised tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolChoice {
    /// Model decides.
    Auto,
    /// Model must call some tool.
    Required,
    /// Model must not call tools.
    None,
    /// Model must call the named tool.
    Specific(String),
}

/// Per-request parameters beyond generation settings.
#[derive(Debug, Clone, Default)]
pub struct ChatParameters {
    /// Tools advertised to the model.
    pub tools: Vec<ToolDefinition>,
    /// Tool choice directive.
    pub tool_choice: Option<ToolChoice>,
}

impl ChatParameters {
    /// Create empty parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool.
    #[must_use]
    pub fn with_tool(mut self, tool: ToolDefinition) -> Self {
        self.tools.push(tool);
        self
    }

    /// Set the tool choice.
    #[must_use]
    pub fn tool_choice(mut self, choice: ToolChoice) -> Self {
        self.tool_choice = Some(choice);
        self
    }
}

/// A native tool-call descriptor on a response.
///
/// `arguments` is the backend's serialized payload, kept verbatim: whether it
/// parses, and what to do when it does not, is the recognizer's decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeToolCall {
    /// Backend-assigned call id, when present.
    pub id: Option<String>,
    /// Function name.
    pub name: String,
    /// Serialized arguments payload.
    pub arguments: String,
}

impl NativeToolCall {
    /// Create a new descriptor.
    pub fn new(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    /// Set the call id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Why the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinishReason {
    /// Natural stop.
    Stop,
    /// Token limit hit.
    Length,
    /// Stopped to call a tool.
    ToolCall,
    /// Content filter intervened.
    ContentFilter,
}

/// Token usage for one request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens in the prompt.
    pub prompt_tokens: u64,
    /// Tokens generated.
    pub completion_tokens: u64,
    /// Total.
    pub total_tokens: u64,
}

/// One model response.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    /// Free-text content, when the model produced any.
    pub content: Option<String>,
    /// Native tool-call descriptors, when the backend parsed any.
    pub tool_calls: Vec<NativeToolCall>,
    /// Model that produced the response.
    pub model_name: Option<String>,
    /// Why generation stopped.
    pub finish_reason: Option<FinishReason>,
    /// Token usage.
    pub usage: Option<Usage>,
    /// When the response was received.
    pub timestamp: DateTime<Utc>,
}

impl ChatResponse {
    /// Create a text-only response.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
            model_name: None,
            finish_reason: Some(FinishReason::Stop),
            usage: None,
            timestamp: Utc::now(),
        }
    }

    /// Create a response carrying a single native tool call.
    pub fn tool_call(call: NativeToolCall) -> Self {
        Self {
            content: None,
            tool_calls: vec![call],
            model_name: None,
            finish_reason: Some(FinishReason::ToolCall),
            usage: None,
            timestamp: Utc::now(),
        }
    }

    /// Append a native tool call.
    #[must_use]
    pub fn with_tool_call(mut self, call: NativeToolCall) -> Self {
        self.tool_calls.push(call);
        self
    }

    /// The content, trimmed, when non-empty.
    #[must_use]
    pub fn content_text(&self) -> Option<&str> {
        self.content
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// A chat-completion backend.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Model identifier sent to the backend.
    fn name(&self) -> &str;

    /// Provider tag (e.g. `"openai-compat"`, `"mock"`).
    fn system(&self) -> &str;

    /// Issue one request and await one response.
    async fn request(
        &self,
        request: &ChatRequest,
        settings: &ChatSettings,
        params: &ChatParameters,
    ) -> Result<ChatResponse, ModelError>;
}

#[async_trait]
impl<T: ChatModel + ?Sized> ChatModel for std::sync::Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn system(&self) -> &str {
        (**self).system()
    }

    async fn request(
        &self,
        request: &ChatRequest,
        settings: &ChatSettings,
        params: &ChatParameters,
    ) -> Result<ChatResponse, ModelError> {
        (**self).request(request, settings, params).await
    }
}
