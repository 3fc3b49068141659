//! System prompt source port

use code_helper_domain::SystemPrompt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading the system prompt
#[derive(Error, Debug)]
pub enum PromptSourceError {
    #[error("Failed to read system prompt file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("System prompt file {} is not valid UTF-8", .0.display())]
    InvalidUtf8(PathBuf),
}

/// Where the system prompt comes from
pub trait SystemPromptSource: Send + Sync {
    /// Human-readable location, for logs
    fn describe(&self) -> String;

    fn load(&self) -> Result<SystemPrompt, PromptSourceError>;
}

/// A prompt held in memory
#[derive(Debug, Clone)]
pub struct InlineSystemPrompt(SystemPrompt);

impl InlineSystemPrompt {
    pub fn new(text: impl Into<SystemPrompt>) -> Self {
        Self(text.into())
    }
}

impl SystemPromptSource for InlineSystemPrompt {
    fn describe(&self) -> String {
        "inline".to_string()
    }

    fn load(&self) -> Result<SystemPrompt, PromptSourceError> {
        Ok(self.0.clone())
    }
}
