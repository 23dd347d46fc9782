//! Agent provider abstractions.
//!
//! The evaluated agent is a black box mapping a query string to an output
//! string. This module defines the provider seam and ships an HTTP
//! implementation for Anthropic-compatible messages APIs behind the
//! `http-agent` feature.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[cfg(feature = "http-agent")]
mod http;

#[cfg(feature = "http-agent")]
pub use http::HttpAgentProvider;

/// Errors from agent providers.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Rate limit exceeded, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Response parse error: {0}")]
    Parse(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

impl AgentError {
    /// Transient failures are worth an automatic retry.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AgentError::Http(_) | AgentError::RateLimited { .. } | AgentError::Timeout(_)
        )
    }
}

/// A black-box recommendation agent: query in, free-text output out.
#[async_trait]
pub trait AgentProvider: Send + Sync {
    /// Run one query to completion and return the agent's full output.
    ///
    /// The runner never feeds partial output to the evaluator; providers
    /// must resolve streaming internally.
    async fn run(&self, query: &str) -> Result<String, AgentError>;

    /// Provider name for logs and reports.
    fn name(&self) -> &str;
}
