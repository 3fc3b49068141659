//! Domain layer for ai-code-helper
//!
//! This crate contains the entities and value objects of a guarded,
//! memory-backed chat. It has no dependencies on infrastructure or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! - **Conversation**: identified by a [`ConversationId`]; each one owns an
//!   independent [`MessageWindow`] capped at a fixed number of messages.
//! - **Guardrail**: every inbound message gets a [`Verdict`] before it may be
//!   forwarded to the model.
//! - **System prompt**: one immutable [`SystemPrompt`] shared by every
//!   conversation.

pub mod core;
pub mod guardrail;
pub mod prompt;
pub mod session;
pub mod util;

// Re-export commonly used types
pub use crate::core::{conversation::ConversationId, error::DomainError};
pub use guardrail::{SENSITIVE_CONTENT_REASON, Verdict};
pub use prompt::SystemPrompt;
pub use session::{
    entities::{Message, Role},
    window::{DEFAULT_MAX_MESSAGES, MessageWindow},
};
