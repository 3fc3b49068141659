//! System prompt compiled into the binary

use code_helper_application::{PromptSourceError, SystemPromptSource};
use code_helper_domain::SystemPrompt;

/// Default programming-tutor prompt, used when no prompt file is configured
pub const BUNDLED_SYSTEM_PROMPT: &str = include_str!("../../resources/system-prompt.txt");

#[derive(Debug, Clone, Copy, Default)]
pub struct BundledPromptSource;

impl SystemPromptSource for BundledPromptSource {
    fn describe(&self) -> String {
        "bundled system prompt".to_string()
    }

    fn load(&self) -> Result<SystemPrompt, PromptSourceError> {
        Ok(SystemPrompt::new(BUNDLED_SYSTEM_PROMPT))
    }
}
