/// Chat-completion HTTP client implementation.
///
/// This module provides `CompletionClient` for making async requests to an
/// OpenAI-compatible `/chat/completions` endpoint, along with error types and
/// a builder for configuration.
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Base URL used when neither the builder nor `GROQ_BASE_URL` provides one.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Request timeout used when the builder is not given one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Errors that can occur when calling the completion provider.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Network-related errors (connection failures, DNS resolution, etc.)
    ///
    /// The cause is part of the message, not the error chain.
    #[error("Network error: {0}")]
    Network(reqwest::Error),

    /// Request or response timeout errors
    #[error("Request timed out")]
    Timeout(#[source] reqwest::Error),

    /// Non-success HTTP status, with the provider's message when it sent one
    #[error("HTTP error: status {status}: {message}")]
    Http { status: u16, message: String },

    /// The provider's success body could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(serde_json::Error),

    /// The provider answered without any message content
    #[error("No response from LLM")]
    NoResponse,

    /// Invalid URL configuration error
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// No API key was configured
    #[error("Missing API key: set GROQ_API_KEY")]
    MissingApiKey,
}

impl CompletionError {
    fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error)
        } else {
            Self::Network(error)
        }
    }
}

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
}

/// One message of a chat-completion conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    messages: &'a [ChatMessage],
    model: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Option<Vec<Choice>>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ProviderErrorBody {
    error: ProviderErrorDetail,
}

#[derive(Deserialize)]
struct ProviderErrorDetail {
    message: String,
}

/// Builder for constructing `CompletionClient` instances.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use tagsmith::llm::CompletionClientBuilder;
///
/// let client = CompletionClientBuilder::new()
///     .base_url("https://api.groq.com/openai/v1")
///     .api_key("gsk_test")
///     .timeout(Duration::from_secs(10))
///     .build()
///     .expect("Failed to create client");
/// ```
#[derive(Debug, Default)]
pub struct CompletionClientBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    timeout: Option<Duration>,
}

impl CompletionClientBuilder {
    /// Creates a new `CompletionClientBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the provider base URL (the part before `/chat/completions`).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the bearer API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the overall request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the `CompletionClient` with the configured settings.
    ///
    /// # Environment Variables
    ///
    /// If `base_url()` was not called, `GROQ_BASE_URL` is used, then
    /// [`DEFAULT_BASE_URL`]. If `api_key()` was not called, `GROQ_API_KEY` is
    /// used.
    ///
    /// # Errors
    ///
    /// Returns `CompletionError::InvalidUrl` for an unparseable base URL and
    /// `CompletionError::MissingApiKey` when no non-empty key is available.
    pub fn build(self) -> Result<CompletionClient, CompletionError> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => std::env::var("GROQ_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        };

        reqwest::Url::parse(&base_url)
            .map_err(|e| CompletionError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let api_key = self
            .api_key
            .or_else(|| std::env::var("GROQ_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or(CompletionError::MissingApiKey)?;

        let timeout = self
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(CompletionError::Network)?;

        Ok(CompletionClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            timeout,
        })
    }
}

/// Async HTTP client for an OpenAI-compatible chat completion API.
///
/// Holds a pooled `reqwest::Client`; construct once and share behind an `Arc`.
pub struct CompletionClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

/// Trait for chat completion operations.
///
/// This trait enables mocking in unit tests and keeps the tag pipeline
/// independent of any particular provider.
#[async_trait]
pub trait CompletionClientTrait: Send + Sync {
    /// Sends one chat completion request and returns the text of the first
    /// choice.
    ///
    /// # Errors
    ///
    /// Returns `CompletionError::NoResponse` when the provider answers without
    /// content, and a transport variant for every other failure.
    async fn chat(&self, model: &str, messages: &[ChatMessage]) -> Result<String, CompletionError>;
}

impl CompletionClient {
    /// Returns the base URL configured for this client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the request timeout configured for this client.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionClientTrait for CompletionClient {
    async fn chat(&self, model: &str, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        let request_body = ChatCompletionRequest { messages, model };

        tracing::debug!(model, messages = messages.len(), "Sending chat completion request");

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(CompletionError::from_transport)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(CompletionError::from_transport)?;

        if !status.is_success() {
            return Err(CompletionError::Http {
                status: status.as_u16(),
                message: provider_error_message(&body, status),
            });
        }

        let parsed: ChatCompletionResponse =
            serde_json::from_str(&body).map_err(CompletionError::Serialization)?;

        first_choice_content(parsed)
    }
}

/// Extracts the content of the first choice, treating an empty string the
/// same as a missing one.
fn first_choice_content(response: ChatCompletionResponse) -> Result<String, CompletionError> {
    response
        .choices
        .and_then(|choices| choices.into_iter().next())
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|content| !content.is_empty())
        .ok_or(CompletionError::NoResponse)
}

/// Picks a human-readable message out of an error response body.
///
/// OpenAI-compatible providers send `{"error": {"message": ...}}`; anything
/// else falls back to the raw body, then to the status reason.
fn provider_error_message(body: &str, status: reqwest::StatusCode) -> String {
    if let Ok(parsed) = serde_json::from_str::<ProviderErrorBody>(body) {
        return parsed.error.message;
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    status
        .canonical_reason()
        .unwrap_or("unknown error")
        .to_string()
}
