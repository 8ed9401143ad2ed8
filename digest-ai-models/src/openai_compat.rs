//! OpenAI-compatible chat completions client.
//!
//! Targets any backend speaking the chat-completions dialect; in this
//! service that is a local vLLM instance, which accepts requests without an
//! API key, so authentication is optional.

use crate::error::ModelError;
use crate::model::{
    ChatModel, ChatParameters, ChatRequest, ChatResponse, ChatSettings, FinishReason,
    NativeToolCall, ToolChoice, ToolDefinition, Usage,
};
use crate::types::*;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Chat model speaking the OpenAI-compatible HTTP dialect.
#[derive(Debug, Clone)]
pub struct OpenAiCompatModel {
    model_name: String,
    client: Client,
    base_url: String,
    api_key: Option<String>,
    default_timeout: Duration,
}

impl OpenAiCompatModel {
    /// Create a new client for the given base URL (e.g.
    /// `http://localhost:8000/v1`).
    pub fn new(model_name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            default_timeout: Duration::from_secs(120),
        }
    }

    /// Set an API key. Backends like vLLM accept requests without one.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set a custom HTTP client.
    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Set the default timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// The configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn convert_tools(tools: &[ToolDefinition]) -> Vec<ChatTool> {
        tools
            .iter()
            .map(|t| ChatTool::function(&t.name, &t.description, t.parameters.clone()))
            .collect()
    }

    fn convert_tool_choice(choice: &ToolChoice) -> ToolChoiceValue {
        match choice {
            ToolChoice::Auto => ToolChoiceValue::auto(),
            ToolChoice::Required => ToolChoiceValue::required(),
            ToolChoice::None => ToolChoiceValue::none(),
            ToolChoice::Specific(name) => ToolChoiceValue::function(name),
        }
    }

    /// Build the request body.
    fn build_request(
        &self,
        request: &ChatRequest,
        settings: &ChatSettings,
        params: &ChatParameters,
    ) -> ChatCompletionRequest {
        let messages = vec![
            ChatMessage::system(&request.system),
            ChatMessage::user(&request.user),
        ];

        let mut body = ChatCompletionRequest::new(&self.model_name, messages);
        body.temperature = settings.temperature;
        body.max_tokens = settings.max_tokens;

        if !params.tools.is_empty() {
            body.tools = Some(Self::convert_tools(&params.tools));
        }
        body.tool_choice = params.tool_choice.as_ref().map(Self::convert_tool_choice);

        body
    }

    /// Decode the backend response into our format.
    fn parse_response(&self, resp: ChatCompletionResponse) -> Result<ChatResponse, ModelError> {
        let choice = resp
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::invalid_response("no choices in response"))?;

        if let Some(refusal) = choice.message.refusal {
            return Err(ModelError::api(refusal));
        }

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| NativeToolCall {
                id: tc.id,
                name: tc.function.name,
                arguments: tc.function.arguments,
            })
            .collect();

        let finish_reason = choice.finish_reason.as_deref().map(|r| match r {
            "length" => FinishReason::Length,
            "content_filter" => FinishReason::ContentFilter,
            "tool_calls" => FinishReason::ToolCall,
            _ => FinishReason::Stop,
        });

        let usage = resp.usage.map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(ChatResponse {
            content: choice.message.content,
            tool_calls,
            model_name: resp.model,
            finish_reason,
            usage,
            timestamp: chrono::Utc::now(),
        })
    }

    fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
        headers
            .get("retry-after")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<u64>().ok())
            .map(Duration::from_secs)
    }

    /// Map an error-status response onto [`ModelError`].
    fn handle_error_response(&self, status: u16, body: &str, headers: &HeaderMap) -> ModelError {
        if status == 429 {
            return ModelError::rate_limited(Self::parse_retry_after(headers));
        }

        if let Ok(envelope) = serde_json::from_str::<ApiErrorEnvelope>(body) {
            if status == 401 {
                return ModelError::auth(envelope.error.message);
            }
            if status == 404 {
                return ModelError::NotFound(envelope.error.message);
            }
            return ModelError::Api {
                message: envelope.error.message,
                code: envelope.error.code,
            };
        }

        ModelError::http(status, body)
    }
}

#[async_trait]
impl ChatModel for OpenAiCompatModel {
    fn name(&self) -> &str {
        &self.model_name
    }

    fn system(&self) -> &str {
        "openai-compat"
    }

    async fn request(
        &self,
        request: &ChatRequest,
        settings: &ChatSettings,
        params: &ChatParameters,
    ) -> Result<ChatResponse, ModelError> {
        let body = self.build_request(request, settings, params);
        let timeout = settings.timeout.unwrap_or(self.default_timeout);

        debug!(
            model = %self.model_name,
            tools = params.tools.len(),
            timeout_secs = timeout.as_secs(),
            "issuing chat completion request"
        );

        let mut http_request = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Content-Type", "application/json")
            .timeout(timeout);

        if let Some(ref key) = self.api_key {
            http_request = http_request.header("Authorization", format!("Bearer {key}"));
        }

        let response = http_request.json(&body).send().await?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let headers = response.headers().clone();
            let body = response.text().await.unwrap_or_default();
            return Err(self.handle_error_response(status, &body, &headers));
        }

        let resp: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ModelError::invalid_response(e.to_string()))?;

        self.parse_response(resp)
    }
}
