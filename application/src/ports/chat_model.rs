//! Chat model port
//!
//! Defines the interface for talking to a language-model backend, both as a
//! single request/response and as an incremental stream of text fragments.

use async_trait::async_trait;
use code_helper_domain::Message;
use futures::{Stream, StreamExt};
use std::pin::Pin;
use thiserror::Error;

/// Errors that can occur while dispatching to the model backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed ({status}): {message}")]
    RequestFailed { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Missing API key (set {0})")]
    MissingApiKey(String),
}

/// Incremental model output. Finite and one-shot; dropping it cancels the
/// underlying request.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<String, GatewayError>> + Send>>;

/// Gateway to a chat-completion model
///
/// Implementations (adapters) live in the infrastructure layer. Neither
/// method retries; failures are handed straight back to the caller.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Model identifier, for logging
    fn model_name(&self) -> &str;

    /// Send the conversation and wait for the complete reply
    async fn chat(&self, messages: &[Message]) -> Result<String, GatewayError>;

    /// Send the conversation and receive the reply as it is generated
    fn chat_stream(&self, messages: Vec<Message>) -> ChunkStream;
}

/// Drain a [`ChunkStream`] into a single string, stopping at the first error.
pub async fn collect_chunks(mut stream: ChunkStream) -> Result<String, GatewayError> {
    let mut full_text = String::new();
    while let Some(chunk) = stream.next().await {
        full_text.push_str(&chunk?);
    }
    Ok(full_text)
}
