//! DeepSeek-compatible chat-completion client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, header};

use crate::error::{LlmError, Result};
use crate::types::{ChatRequest, ChatResponse};

/// Default API base URL.
const DEFAULT_BASE_URL: &str = "https://api.deepseek.com/v1";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "deepseek-chat";

/// Request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the chat-completion client.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Base URL for the API.
    pub base_url: String,
    /// Model to request completions from.
    pub model: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ChatConfig {
    /// Set a custom base URL (for compatible providers or test servers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// The outbound chat-completion seam.
///
/// The bearer credential is supplied per call, so one client serves
/// whatever key is currently configured.
#[async_trait]
pub trait ChatCompleter: Send + Sync {
    async fn complete(&self, api_key: &str, request: ChatRequest) -> Result<ChatResponse>;
}

/// HTTP chat-completion client.
pub struct ChatClient {
    client: Client,
    config: ChatConfig,
}

impl ChatClient {
    pub fn new(config: ChatConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Config(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    /// The model this client requests by default.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    async fn handle_response(response: Response) -> Result<ChatResponse> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_for_status(status, &body));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| LlmError::Serialization(e.to_string()))
    }
}

/// Map an unsuccessful response to a human-readable error.
fn error_for_status(status: StatusCode, body: &str) -> LlmError {
    match status.as_u16() {
        401 => LlmError::Auth("Invalid API key, please check that it is correct".to_string()),
        429 => LlmError::RateLimit("Too many requests, please try again later".to_string()),
        500..=599 => LlmError::Server("Server error, please try again later".to_string()),
        _ => {
            let detail = extract_error_message(body).unwrap_or_default();
            if detail.is_empty() {
                LlmError::Api(format!("API call failed: {status}"))
            } else {
                LlmError::Api(format!("API call failed: {status} {detail}"))
            }
        }
    }
}

/// Pull the provider's error message out of an OpenAI-style error body.
fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(String::from)
}

#[async_trait]
impl ChatCompleter for ChatClient {
    async fn complete(&self, api_key: &str, request: ChatRequest) -> Result<ChatResponse> {
        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Sending chat-completion request"
        );

        let response = self
            .client
            .post(self.completions_url())
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {api_key}"))
            .json(&request)
            .send()
            .await?;

        Self::handle_response(response).await
    }
}
