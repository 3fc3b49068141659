//! Chat session use case
//!
//! Streams a model reply for one conversation while keeping that
//! conversation's bounded history up to date.
//!
//! ```text
//! chat_stream(id, msg)
//!   ├─ memory.get_or_create(id)          (per-conversation window)
//!   ├─ lock window                       (serializes one conversation)
//!   ├─ [system prompt] + history + msg   → model.chat_stream()
//!   ├─ yield fragments as they arrive
//!   └─ on completion: append user + assistant messages
//! ```
//!
//! The input guardrail is not consulted here; see
//! [`GuardedChatUseCase`](super::guarded_chat::GuardedChatUseCase).

use crate::config::ChatConfig;
use crate::ports::chat_memory::ChatMemoryProvider;
use crate::ports::chat_model::{ChatModel, GatewayError};
use crate::ports::system_prompt::{PromptSourceError, SystemPromptSource};
use code_helper_domain::util::preview;
use code_helper_domain::{ConversationId, Message, SystemPrompt};
use futures::{Stream, StreamExt};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors surfaced to the caller of a chat request
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Message rejected: {reason}")]
    Rejected { reason: String },

    #[error("User message cannot be empty")]
    EmptyMessage,

    #[error("Gateway error: {0}")]
    GatewayError(#[from] GatewayError),

    #[error("No response received for {0:?}")]
    Timeout(Duration),
}

impl ChatError {
    /// Check if this error is a guardrail rejection
    pub fn is_rejection(&self) -> bool {
        matches!(self, ChatError::Rejected { .. })
    }

    pub fn rejection_reason(&self) -> Option<&str> {
        match self {
            ChatError::Rejected { reason } => Some(reason),
            _ => None,
        }
    }
}

/// Errors that prevent the chat service from starting
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("System prompt unavailable: {0}")]
    SystemPrompt(#[from] PromptSourceError),
}

/// A one-shot stream of reply fragments.
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<String, ChatError>> + Send>>;

/// Drain a [`ChatStream`] into the full reply.
pub async fn collect_reply(mut stream: ChatStream) -> Result<String, ChatError> {
    let mut reply = String::new();
    while let Some(fragment) = stream.next().await {
        reply.push_str(&fragment?);
    }
    Ok(reply)
}

/// Conversation-aware streaming chat over a [`ChatModel`].
#[derive(Clone)]
pub struct ChatSessionService {
    model: Arc<dyn ChatModel>,
    memory: Arc<dyn ChatMemoryProvider>,
    system_prompt: SystemPrompt,
    config: ChatConfig,
}

impl ChatSessionService {
    /// Build the service, reading the system prompt once.
    ///
    /// A prompt that cannot be read is fatal; there is no degraded mode.
    pub fn new(
        model: Arc<dyn ChatModel>,
        memory: Arc<dyn ChatMemoryProvider>,
        prompt_source: &dyn SystemPromptSource,
        config: ChatConfig,
    ) -> Result<Self, StartupError> {
        let system_prompt = prompt_source.load()?;
        if system_prompt.is_blank() {
            warn!("System prompt from {} is empty", prompt_source.describe());
        }
        info!(
            "Chat service ready: model={}, prompt={} ({} chars)",
            model.model_name(),
            prompt_source.describe(),
            system_prompt.as_str().chars().count()
        );

        Ok(Self {
            model,
            memory,
            system_prompt,
            config,
        })
    }

    pub fn system_prompt(&self) -> &SystemPrompt {
        &self.system_prompt
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    /// Stream the model's reply to `user_message` within `conversation_id`.
    ///
    /// The returned stream does nothing until polled. History is committed
    /// only after the backend finishes; dropping the stream early, a backend
    /// error, or an idle timeout all leave the history untouched.
    pub fn chat_stream(
        &self,
        conversation_id: ConversationId,
        user_message: impl Into<String>,
    ) -> Result<ChatStream, ChatError> {
        let user_message = user_message.into();
        if user_message.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let window = self.memory.get_or_create(conversation_id);
        let model = Arc::clone(&self.model);
        let system_prompt = self.system_prompt.clone();
        let idle_timeout = self.config.stream_idle_timeout;

        info!(
            "Chat request [conversation {}]: {}",
            conversation_id,
            preview(&user_message, 80)
        );

        let stream = async_stream::stream! {
            let mut window = window.lock_owned().await;

            let mut request = Vec::with_capacity(window.len() + 2);
            request.push(Message::system(system_prompt.as_str()));
            request.extend(window.messages().cloned());
            request.push(Message::user(user_message.as_str()));
            debug!(
                "Dispatching {} messages for conversation {}",
                request.len(),
                conversation_id
            );

            let mut chunks = model.chat_stream(request);
            let mut reply = String::new();

            loop {
                let next = match idle_timeout {
                    Some(limit) => match tokio::time::timeout(limit, chunks.next()).await {
                        Ok(next) => next,
                        Err(_) => {
                            warn!(
                                "Conversation {}: no fragment within {:?}, giving up",
                                conversation_id, limit
                            );
                            yield Err(ChatError::Timeout(limit));
                            return;
                        }
                    },
                    None => chunks.next().await,
                };

                match next {
                    Some(Ok(fragment)) => {
                        if fragment.is_empty() {
                            continue;
                        }
                        reply.push_str(&fragment);
                        yield Ok(fragment);
                    }
                    Some(Err(e)) => {
                        warn!("Conversation {}: backend failed: {}", conversation_id, e);
                        yield Err(ChatError::GatewayError(e));
                        return;
                    }
                    None => break,
                }
            }

            let evicted = window.push(Message::user(user_message))
                + window.push(Message::assistant(reply));
            debug!(
                "Conversation {} history: {} messages ({} evicted)",
                conversation_id,
                window.len(),
                evicted
            );
        };

        Ok(Box::pin(stream))
    }

    /// Non-streaming variant; equals the concatenation of the streamed fragments.
    pub async fn chat(
        &self,
        conversation_id: ConversationId,
        user_message: impl Into<String>,
    ) -> Result<String, ChatError> {
        collect_reply(self.chat_stream(conversation_id, user_message)?).await
    }

    /// Snapshot of a conversation's history (oldest first).
    ///
    /// Waits for any in-flight request on the same conversation.
    pub async fn history(&self, conversation_id: ConversationId) -> Vec<Message> {
        match self.memory.get(conversation_id) {
            Some(window) => window.lock().await.to_vec(),
            None => Vec::new(),
        }
    }

    /// Forget a conversation entirely. Returns `true` if it existed.
    pub fn clear(&self, conversation_id: ConversationId) -> bool {
        let removed = self.memory.remove(conversation_id);
        if removed {
            info!("Cleared conversation {}", conversation_id);
        }
        removed
    }
}
