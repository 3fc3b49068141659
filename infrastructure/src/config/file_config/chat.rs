//! Chat configuration from TOML (`[ai.chat]` section)

use code_helper_application::ChatConfig;
use code_helper_application::config::{DEFAULT_MAX_CONVERSATIONS, DEFAULT_STREAM_IDLE_TIMEOUT};
use code_helper_domain::DEFAULT_MAX_MESSAGES;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FileChatConfig {
    /// UTF-8 file holding the system prompt; the bundled prompt when unset
    pub system_prompt_path: Option<PathBuf>,
    /// Messages retained per conversation (default: 10)
    pub max_messages: usize,
    /// Conversations retained before LRU eviction (default: 1024)
    pub max_conversations: usize,
    /// Seconds to wait for the next streamed fragment; 0 waits forever
    pub stream_idle_timeout_secs: u64,
}

impl Default for FileChatConfig {
    fn default() -> Self {
        Self {
            system_prompt_path: None,
            max_messages: DEFAULT_MAX_MESSAGES,
            max_conversations: DEFAULT_MAX_CONVERSATIONS,
            stream_idle_timeout_secs: DEFAULT_STREAM_IDLE_TIMEOUT.as_secs(),
        }
    }
}

impl FileChatConfig {
    pub fn to_chat_config(&self) -> ChatConfig {
        ChatConfig::default()
            .with_max_messages(self.max_messages)
            .with_max_conversations(self.max_conversations)
            .with_idle_timeout_seconds(Some(self.stream_idle_timeout_secs))
    }
}
