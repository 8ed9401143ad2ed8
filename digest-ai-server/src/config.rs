//! Static service configuration, read once from the environment.

use std::net::SocketAddr;
use thiserror::Error;

/// Configuration error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable held a value that does not parse.
    #[error("invalid value for {var}: {value:?}")]
    Invalid {
        /// The variable name.
        var: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds.
    pub bind_addr: SocketAddr,
    /// Base URL of the OpenAI-compatible backend, e.g.
    /// `http://localhost:8000/v1`.
    pub backend_url: String,
    /// Model identifier sent to the backend.
    pub model_name: String,
    /// Optional API key; the local vLLM deployment needs none.
    pub api_key: Option<String>,
    /// Attempt budget for the tool-call loop.
    pub tool_attempts: u32,
    /// Minimum article length accepted by the analyze endpoint.
    pub min_article_chars: usize,
}

impl Config {
    /// Read configuration from process environment variables, falling back
    /// to deployment defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = parse_var(&lookup, "DIGEST_BIND_ADDR", "0.0.0.0:8080")?;
        let tool_attempts = parse_var(&lookup, "DIGEST_TOOL_ATTEMPTS", "3")?;
        let min_article_chars = parse_var(&lookup, "DIGEST_MIN_ARTICLE_CHARS", "50")?;

        Ok(Self {
            bind_addr,
            backend_url: lookup("DIGEST_BACKEND_URL")
                .unwrap_or_else(|| "http://localhost:8000/v1".to_string()),
            model_name: lookup("DIGEST_MODEL").unwrap_or_else(|| "qwen2.5-1.5b".to_string()),
            api_key: lookup("DIGEST_API_KEY").filter(|k| !k.is_empty()),
            tool_attempts,
            min_article_chars,
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: &str,
) -> Result<T, ConfigError> {
    let raw = lookup(var).unwrap_or_else(|| default.to_string());
    raw.parse().map_err(|_| ConfigError::Invalid {
        var,
        value: raw.clone(),
    })
}
