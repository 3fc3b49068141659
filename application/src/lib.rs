//! Application layer for ai-code-helper
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ChatConfig, GuardrailConfig};
pub use ports::{
    chat_memory::{ChatMemoryProvider, SharedWindow},
    chat_model::{ChatModel, ChunkStream, GatewayError, collect_chunks},
    input_guardrail::{InputGuardrail, NoGuardrail},
    system_prompt::{InlineSystemPrompt, PromptSourceError, SystemPromptSource},
};
pub use use_cases::chat_session::{
    ChatError, ChatSessionService, ChatStream, StartupError, collect_reply,
};
pub use use_cases::guarded_chat::GuardedChatUseCase;
