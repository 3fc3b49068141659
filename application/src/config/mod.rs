//! Application-level configuration.
//!
//! Explicit configuration structs handed to components at construction:
//!
//! - [`ChatConfig`]: memory window size, conversation capacity, stream idle timeout
//! - [`GuardrailConfig`]: guardrail on/off and case sensitivity

pub mod chat_config;
pub mod guardrail_config;

pub use chat_config::{ChatConfig, DEFAULT_MAX_CONVERSATIONS, DEFAULT_STREAM_IDLE_TIMEOUT};
pub use guardrail_config::GuardrailConfig;
