/// Chat-completion HTTP client module.
///
/// This module provides an async client for OpenAI-compatible chat completion
/// APIs (Groq by default), including error handling and timeout configuration.
mod client;

pub use client::{
    ChatMessage, ChatRole, CompletionClient, CompletionClientBuilder, CompletionClientTrait,
    CompletionError, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS,
};
