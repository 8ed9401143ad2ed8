//! Prompt text and the alert tool definition.
//!
//! The backend is steered by prompt alone in summary mode (local CPU builds
//! of vLLM crash under the structured-output backend, so `response_format`
//! is not used); extraction downstream tolerates whatever wrapping the
//! model adds anyway.

use digest_ai_models::ToolDefinition;

/// Tool name the incident loop expects the model to invoke.
pub const OPS_ALERT_TOOL: &str = "send_ops_alert";

/// System instruction for structured-summary mode.
pub const SUMMARY_SYSTEM_PROMPT: &str = "\
You are a senior technical editor. Analyze the article the user provides.
Respond strictly as a JSON object with exactly these three fields:
1. \"summary\": a concise summary of the article.
2. \"tags\": an array of 3 to 5 key topic tags.
3. \"sentiment\": one of \"positive\", \"neutral\", or \"negative\".
Output only the JSON object, with no surrounding explanation.";

/// System instruction for tool-call mode.
///
/// Spells the expected wire format out literally; small models follow an
/// example far more reliably than a description.
pub const ALERT_SYSTEM_PROMPT: &str = "\
You must call the tool send_ops_alert. Do not answer in natural language.
Respond exactly in this format and output nothing else:
<tool_call>{\"name\":\"send_ops_alert\",\"arguments\":{\"message\":\"<alert text>\",\"level\":\"error\"}}</tool_call>
The level must be one of: info, warning, error.";

/// Definition of the ops-alert tool advertised to the backend.
pub fn ops_alert_tool() -> ToolDefinition {
    ToolDefinition::new(OPS_ALERT_TOOL, "Send an alert to the operations channel").with_parameters(
        serde_json::json!({
            "type": "object",
            "properties": {
                "message": {
                    "type": "string",
                    "description": "Alert text"
                },
                "level": {
                    "type": "string",
                    "enum": ["info", "warning", "error"]
                }
            },
            "required": ["message"]
        }),
    )
}
