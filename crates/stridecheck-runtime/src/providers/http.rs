//! HTTP agent provider for Anthropic-compatible messages APIs.
//!
//! ## Security
//!
//! The API key is held in a [`SecretString`]: it cannot appear in `Debug`
//! output and is zeroed on drop. It is exposed only at the point of use.

use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::{AgentError, AgentProvider};

/// Environment variable holding the agent API key.
pub const API_KEY_ENV: &str = "STRIDECHECK_API_KEY";

/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV: &str = "STRIDECHECK_BASE_URL";

const DEFAULT_BASE_URL: &str = "https://api.minimaxi.com/anthropic";
const DEFAULT_MODEL: &str = "MiniMax-M2.1";
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Agent provider backed by an Anthropic-compatible `/v1/messages` endpoint.
pub struct HttpAgentProvider {
    api_key: SecretString,
    base_url: String,
    model: String,
    max_tokens: u32,
    client: reqwest::Client,
}

impl std::fmt::Debug for HttpAgentProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAgentProvider")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl HttpAgentProvider {
    /// Create a provider with an explicit API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self, AgentError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| AgentError::Http(e.to_string()))?;

        Ok(Self {
            api_key: SecretString::from(api_key.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            client,
        })
    }

    /// Create a provider from the environment.
    ///
    /// Reads the key from `STRIDECHECK_API_KEY` (never logged) and an
    /// optional base-URL override from `STRIDECHECK_BASE_URL`.
    pub fn from_env() -> Result<Self, AgentError> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| {
            AgentError::NotConfigured(format!(
                "agent API key not set: configure '{}' environment variable",
                API_KEY_ENV
            ))
        })?;

        let mut provider = Self::new(api_key)?;
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            provider.base_url = base_url;
        }
        Ok(provider)
    }

    /// Override the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Override the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    async fn invoke_once(&self, query: &str) -> Result<String, AgentError> {
        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user".to_string(),
                content: query.to_string(),
            }],
        };

        // Expose the credential only here, at the point of use.
        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AgentError::Http(e.to_string()))?;

        let status = response.status();

        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(AgentError::RateLimited { retry_after });
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AgentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Parse(e.to_string()))?;

        // The API may interleave thinking blocks; only text blocks carry the
        // answer shown to the user.
        let output = body
            .content
            .into_iter()
            .filter(|block| block.block_type == "text")
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("");

        if output.is_empty() {
            return Err(AgentError::Parse("no text block in response".to_string()));
        }

        Ok(output)
    }
}

#[async_trait::async_trait]
impl AgentProvider for HttpAgentProvider {
    async fn run(&self, query: &str) -> Result<String, AgentError> {
        (|| self.invoke_once(query))
            .retry(ExponentialBuilder::default().with_max_times(2))
            .when(AgentError::is_transient)
            .notify(|err, delay| {
                tracing::warn!(error = %err, ?delay, "agent invocation failed, retrying");
            })
            .await
    }

    fn name(&self) -> &str {
        "http-agent"
    }
}

/// Anthropic-compatible messages request.
#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

/// Anthropic-compatible messages response.
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_key() {
        let provider = HttpAgentProvider::new("sk-very-secret").unwrap();
        let debug = format!("{:?}", provider);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("sk-very-secret"));
    }

    #[test]
    fn test_response_parsing_skips_thinking_blocks() {
        let json = r#"{
            "content": [
                {"type": "thinking", "text": "internal reasoning"},
                {"type": "text", "text": "Try the Brand Z Trail 4."}
            ]
        }"#;
        let body: MessagesResponse = serde_json::from_str(json).unwrap();
        let output: String = body
            .content
            .into_iter()
            .filter(|b| b.block_type == "text")
            .filter_map(|b| b.text)
            .collect();
        assert_eq!(output, "Try the Brand Z Trail 4.");
    }
}
