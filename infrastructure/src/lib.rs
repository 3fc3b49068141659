//! Infrastructure layer for ai-code-helper
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the HTTP model client, the in-memory
//! conversation store, the sensitive-word guardrail, the system
//! prompt sources, and configuration file loading.

pub mod config;
pub mod guardrail;
pub mod memory;
pub mod prompt;
pub mod providers;

// Re-export commonly used types
pub use config::{
    ConfigIssue, ConfigIssueCode, ConfigLoader, FileAiConfig, FileChatConfig, FileConfig,
    FileGuardrailConfig, FileModelConfig, Severity,
};
pub use guardrail::{
    ConfiguredTerms, DictionaryError, SensitiveWordGuardrail, SensitiveWordMatcher, TermSource,
};
pub use memory::InMemoryChatMemory;
pub use prompt::{BundledPromptSource, FilePromptSource, prompt_source};
pub use providers::OpenAiCompatibleChatModel;
