//! HTTP routes.
//!
//! Thin plumbing over the agent crate: request validation, status mapping,
//! nothing else. The two failure families stay distinguishable to clients:
//! "the backend is unreachable" maps to 502, "the backend answered but not
//! usefully" to 500 with a code naming what went wrong.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use digest_ai_agent::{
    AlertSink, AttemptOutcome, RunOutcome, SummarizeError, Summarizer, ToolCallRunner,
};
use digest_ai_extract::ArticleSummary;
use digest_ai_models::ChatModel;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable description.
    pub error: String,
    /// Machine-readable code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorResponse {
    /// Create an error response with a code.
    pub fn with_code(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: Some(code.into()),
        }
    }
}

type ErrorReply = (StatusCode, Json<ErrorResponse>);

fn reply(status: StatusCode, error: impl Into<String>, code: &str) -> ErrorReply {
    (status, Json(ErrorResponse::with_code(error, code)))
}

/// Article analysis request.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// The article text to analyze.
    pub content: String,
}

/// Incident report request.
#[derive(Debug, Deserialize)]
pub struct IncidentRequest {
    /// Free-text incident description.
    pub description: String,
}

/// Incident report response.
#[derive(Debug, Serialize, Deserialize)]
pub struct IncidentResponse {
    /// Confirmation from the alert sink.
    pub confirmation: String,
    /// Attempts the loop used.
    pub attempts: u32,
}

/// Shared state for the HTTP handlers.
pub struct AppState<M: ChatModel, S: AlertSink> {
    /// The single-shot summarizer.
    pub summarizer: Summarizer<M>,
    /// The tool-call loop.
    pub alert_runner: ToolCallRunner<M, S>,
    /// Minimum accepted article length, in characters.
    pub min_article_chars: usize,
}

/// Build the router.
pub fn router<M, S>(state: Arc<AppState<M, S>>) -> Router
where
    M: ChatModel + 'static,
    S: AlertSink + 'static,
{
    Router::new()
        .route("/api/v1/analyze-article", post(analyze_article::<M, S>))
        .route("/api/v1/report-incident", post(report_incident::<M, S>))
        .route("/health", get(health_check))
        .with_state(state)
}

/// POST /api/v1/analyze-article
async fn analyze_article<M: ChatModel, S: AlertSink>(
    State(state): State<Arc<AppState<M, S>>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<ArticleSummary>, ErrorReply> {
    if req.content.chars().count() < state.min_article_chars {
        return Err(reply(
            StatusCode::BAD_REQUEST,
            format!(
                "article too short to analyze (minimum {} characters)",
                state.min_article_chars
            ),
            "article_too_short",
        ));
    }

    match state.summarizer.summarize(&req.content).await {
        Ok(summary) => {
            info!(tags = summary.tags.len(), "article analyzed");
            Ok(Json(summary))
        }
        Err(SummarizeError::Model(err)) => {
            error!(error = %err, "inference backend failed");
            Err(reply(
                StatusCode::BAD_GATEWAY,
                format!("inference backend failed: {err}"),
                "backend_unreachable",
            ))
        }
        Err(err @ (SummarizeError::Extract(_) | SummarizeError::Validation(_))) => {
            error!(error = %err, "model answer was not a usable summary");
            Err(reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("model answer was not a usable summary: {err}"),
                "bad_model_output",
            ))
        }
    }
}

/// POST /api/v1/report-incident
async fn report_incident<M: ChatModel, S: AlertSink>(
    State(state): State<Arc<AppState<M, S>>>,
    Json(req): Json<IncidentRequest>,
) -> Result<Json<IncidentResponse>, ErrorReply> {
    if req.description.trim().is_empty() {
        return Err(reply(
            StatusCode::BAD_REQUEST,
            "incident description is empty",
            "empty_description",
        ));
    }

    let outcome = state.alert_runner.run(&req.description).await.map_err(|err| {
        error!(error = %err, "alert sink failed");
        reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("alert dispatch failed: {err}"),
            "alert_dispatch_failed",
        )
    })?;

    match outcome {
        RunOutcome::Completed {
            confirmation,
            attempts,
            ..
        } => {
            info!(attempts, "incident alert dispatched");
            Ok(Json(IncidentResponse {
                confirmation,
                attempts,
            }))
        }
        RunOutcome::Exhausted {
            attempts,
            last_content,
            records,
        } => {
            let backend_never_answered = records
                .iter()
                .all(|r| matches!(r.outcome, AttemptOutcome::Transport(_)));

            error!(
                attempts,
                last_content = last_content.as_deref().unwrap_or("<none>"),
                "tool call never recognized"
            );

            if backend_never_answered {
                Err(reply(
                    StatusCode::BAD_GATEWAY,
                    format!("inference backend unreachable across {attempts} attempts"),
                    "backend_unreachable",
                ))
            } else {
                Err(reply(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!(
                        "no tool call recognized after {attempts} attempts; last response: {}",
                        last_content.as_deref().unwrap_or("<none>")
                    ),
                    "attempts_exhausted",
                ))
            }
        }
    }
}

/// GET /health
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "digest-ai"
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use digest_ai_agent::LogAlertSink;
    use digest_ai_models::{MockChatModel, ModelError};
    use tower::ServiceExt;

    const VALID_SUMMARY: &str =
        r#"{"summary": "Kernel 6.9 lands.", "tags": ["linux"], "sentiment": "neutral"}"#;

    fn app(model: MockChatModel) -> Router {
        let state = AppState {
            summarizer: Summarizer::new(model.clone()),
            alert_runner: ToolCallRunner::new(model, LogAlertSink::new()).max_attempts(3),
            min_article_chars: 50,
        };
        router(Arc::new(state))
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(body: Body) -> serde_json::Value {
        let bytes = to_bytes(body, usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn long_article() -> String {
        "Kernel 6.9 lands with scheduler updates. ".repeat(4)
    }

    #[tokio::test]
    async fn test_short_article_is_rejected() {
        let app = app(MockChatModel::new("test"));
        let response = app
            .oneshot(post_json(
                "/api/v1/analyze-article",
                serde_json::json!({"content": "too short"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response.into_body()).await;
        assert_eq!(body["code"], "article_too_short");
    }

    #[tokio::test]
    async fn test_analyze_returns_summary() {
        let app = app(MockChatModel::new("test").with_text_response(VALID_SUMMARY));
        let response = app
            .oneshot(post_json(
                "/api/v1/analyze-article",
                serde_json::json!({"content": long_article()}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response.into_body()).await;
        assert_eq!(body["sentiment"], "neutral");
        assert_eq!(body["tags"][0], "linux");
    }

    #[tokio::test]
    async fn test_backend_failure_maps_to_bad_gateway() {
        let app = app(
            MockChatModel::new("test").with_failure(ModelError::Connection("refused".into())),
        );
        let response = app
            .oneshot(post_json(
                "/api/v1/analyze-article",
                serde_json::json!({"content": long_article()}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response.into_body()).await;
        assert_eq!(body["code"], "backend_unreachable");
    }

    #[tokio::test]
    async fn test_conversational_answer_maps_to_bad_model_output() {
        let app = app(MockChatModel::new("test").with_text_response("I'd rather not do JSON."));
        let response = app
            .oneshot(post_json(
                "/api/v1/analyze-article",
                serde_json::json!({"content": long_article()}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response.into_body()).await;
        assert_eq!(body["code"], "bad_model_output");
    }

    #[tokio::test]
    async fn test_wrong_shape_maps_to_bad_model_output() {
        let app = app(
            MockChatModel::new("test")
                .with_text_response(r#"{"summary": "ok", "tags": ["a"], "sentiment": "elated"}"#),
        );
        let response = app
            .oneshot(post_json(
                "/api/v1/analyze-article",
                serde_json::json!({"content": long_article()}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response.into_body()).await;
        assert_eq!(body["code"], "bad_model_output");
    }

    #[tokio::test]
    async fn test_incident_dispatches_alert() {
        let app = app(MockChatModel::new("test").with_text_response(
            r#"{"name":"send_ops_alert","arguments":{"message":"cpu high","level":"error"}}"#,
        ));
        let response = app
            .oneshot(post_json(
                "/api/v1/report-incident",
                serde_json::json!({"description": "CPU spiked to 95%, page someone"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response.into_body()).await;
        assert_eq!(body["attempts"], 1);
        assert!(body["confirmation"].as_str().unwrap().contains("error"));
    }

    #[tokio::test]
    async fn test_incident_exhaustion_maps_to_server_error() {
        let app = app(
            MockChatModel::new("test")
                .with_text_response("nah")
                .with_text_response("still nah")
                .with_text_response("no tool calls from me"),
        );
        let response = app
            .oneshot(post_json(
                "/api/v1/report-incident",
                serde_json::json!({"description": "CPU spiked to 95%"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response.into_body()).await;
        assert_eq!(body["code"], "attempts_exhausted");
        // Last raw response surfaces for diagnosis.
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("no tool calls from me"));
    }

    #[tokio::test]
    async fn test_incident_unreachable_backend_maps_to_bad_gateway() {
        let app = app(
            MockChatModel::new("test")
                .with_failure(ModelError::Connection("refused".into()))
                .with_failure(ModelError::Connection("refused".into()))
                .with_failure(ModelError::Connection("refused".into())),
        );
        let response = app
            .oneshot(post_json(
                "/api/v1/report-incident",
                serde_json::json!({"description": "CPU spiked to 95%"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response.into_body()).await;
        assert_eq!(body["code"], "backend_unreachable");
    }

    #[tokio::test]
    async fn test_empty_incident_description_is_rejected() {
        let app = app(MockChatModel::new("test"));
        let response = app
            .oneshot(post_json(
                "/api/v1/report-incident",
                serde_json::json!({"description": "   "}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health() {
        let app = app(MockChatModel::new("test"));
        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response.into_body()).await;
        assert_eq!(body["status"], "healthy");
    }
}
