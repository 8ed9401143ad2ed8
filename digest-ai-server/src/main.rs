//! Process bootstrap for the digest-ai service.

mod config;
mod routes;

use crate::config::Config;
use crate::routes::{router, AppState};
use digest_ai_agent::{LogAlertSink, Summarizer, ToolCallRunner};
use digest_ai_models::OpenAiCompatModel;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    info!(
        backend = %config.backend_url,
        model = %config.model_name,
        bind = %config.bind_addr,
        "starting digest-ai"
    );

    let mut model = OpenAiCompatModel::new(&config.model_name, &config.backend_url);
    if let Some(ref key) = config.api_key {
        model = model.with_api_key(key);
    }

    let state = AppState {
        summarizer: Summarizer::new(model.clone()),
        alert_runner: ToolCallRunner::new(model, LogAlertSink::new())
            .max_attempts(config.tool_attempts),
        min_article_chars: config.min_article_chars,
    };

    let listener = TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, router(Arc::new(state))).await?;

    Ok(())
}
