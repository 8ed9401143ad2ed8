//! # digest-ai-agent
//!
//! Recognition and orchestration on top of the extraction pipeline.
//!
//! - **[`recognize`]**: decide whether a model response carries a tool
//!   invocation, checking the native descriptor surface before falling back
//!   to text recovery, as an ordered strategy list.
//! - **[`runner`]**: the bounded, strictly sequential re-ask loop that
//!   retries until recognition succeeds or the attempt budget runs out, then
//!   fires the alert effect at most once.
//! - **[`summarize`]**: the single-shot structured-summary pipeline.
//! - **[`effect`]**: the seam to the real-world alert dispatcher.
//! - **[`prompts`]**: prompt text and the advertised tool definition.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod effect;
pub mod prompts;
pub mod recognize;
pub mod runner;
pub mod summarize;

// Re-exports
pub use effect::{AlertSink, EffectError, LogAlertSink};
pub use prompts::{ops_alert_tool, ALERT_SYSTEM_PROMPT, OPS_ALERT_TOOL, SUMMARY_SYSTEM_PROMPT};
pub use recognize::{
    ExtractionStrategy, NativeDescriptorStrategy, Recognition, TextRecoveryStrategy,
    ToolCallRecognizer, ToolInvocation,
};
pub use runner::{
    AttemptOutcome, AttemptRecord, RunOutcome, ToolCallRunner, DEFAULT_MAX_ATTEMPTS,
};
pub use summarize::{SummarizeError, Summarizer};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        AlertSink, EffectError, LogAlertSink, Recognition, RunOutcome, SummarizeError, Summarizer,
        ToolCallRecognizer, ToolCallRunner, ToolInvocation,
    };
}
