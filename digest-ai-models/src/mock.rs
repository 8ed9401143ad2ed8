//! Mock chat model for testing.
//!
//! Queue responses and transport failures in the order a test expects the
//! retry loop to consume them, and inspect the recorded requests afterwards.
//!
//! # Example
//!
//! ```rust
//! use digest_ai_models::MockChatModel;
//!
//! let model = MockChatModel::new("test")
//!     .with_text_response("I would rather chat, sorry!")
//!     .with_text_response("{\"name\":\"alert\",\"arguments\":{}}");
//! ```

use crate::error::ModelError;
use crate::model::{
    ChatModel, ChatParameters, ChatRequest, ChatResponse, ChatSettings, NativeToolCall,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// One scripted outcome for the mock.
#[derive(Debug)]
enum Scripted {
    Response(ChatResponse),
    Failure(ModelError),
}

/// A mock model returning scripted outcomes in order.
///
/// When the script runs out it returns a plain text response, so tests that
/// do not care about content keep working.
#[derive(Debug, Clone)]
pub struct MockChatModel {
    name: String,
    script: Arc<Mutex<VecDeque<Scripted>>>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl MockChatModel {
    /// Create a new mock model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a full response.
    #[must_use]
    pub fn with_response(self, response: ChatResponse) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted::Response(response));
        self
    }

    /// Queue a text response.
    #[must_use]
    pub fn with_text_response(self, text: impl Into<String>) -> Self {
        self.with_response(ChatResponse::text(text))
    }

    /// Queue a response carrying one native tool-call descriptor.
    #[must_use]
    pub fn with_native_tool_call(
        self,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        self.with_response(ChatResponse::tool_call(NativeToolCall::new(
            name, arguments,
        )))
    }

    /// Queue a transport failure.
    #[must_use]
    pub fn with_failure(self, error: ModelError) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted::Failure(error));
        self
    }

    /// Requests received so far.
    pub fn recorded_requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn system(&self) -> &str {
        "mock"
    }

    async fn request(
        &self,
        request: &ChatRequest,
        _settings: &ChatSettings,
        _params: &ChatParameters,
    ) -> Result<ChatResponse, ModelError> {
        self.requests.lock().unwrap().push(request.clone());

        match self.script.lock().unwrap().pop_front() {
            Some(Scripted::Response(response)) => Ok(response),
            Some(Scripted::Failure(error)) => Err(error),
            None => Ok(ChatResponse::text("mock response")),
        }
    }
}
