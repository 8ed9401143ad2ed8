//! # digest-ai-models
//!
//! Chat model trait and backend client for digest-ai.
//!
//! The [`ChatModel`] trait is the seam between the extraction pipeline and
//! the inference backend: one request in, one [`ChatResponse`] out. The
//! response exposes the two surfaces recognition works with: the native
//! tool-call descriptor list and the free-text content, and nothing else.
//!
//! - **[`OpenAiCompatModel`]**: HTTP client for any chat-completions
//!   backend (vLLM in this deployment), with optional bearer auth and
//!   per-request timeouts.
//! - **[`MockChatModel`]**: scripted responses and transport failures for
//!   testing retry behavior.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod mock;
pub mod model;
pub mod openai_compat;
pub mod types;

// Re-exports
pub use error::{ModelError, ModelResult};
pub use mock::MockChatModel;
pub use model::{
    ChatModel, ChatParameters, ChatRequest, ChatResponse, ChatSettings, FinishReason,
    NativeToolCall, ToolChoice, ToolDefinition, Usage,
};
pub use openai_compat::OpenAiCompatModel;

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        ChatModel, ChatParameters, ChatRequest, ChatResponse, ChatSettings, MockChatModel,
        ModelError, NativeToolCall, OpenAiCompatModel, ToolChoice, ToolDefinition,
    };
}
