//! Chat session parameters.

use code_helper_domain::DEFAULT_MAX_MESSAGES;
use std::time::Duration;

/// Default number of conversations kept in memory before the least recently
/// used one is dropped.
pub const DEFAULT_MAX_CONVERSATIONS: usize = 1024;

/// Default wait for the next streamed fragment.
pub const DEFAULT_STREAM_IDLE_TIMEOUT: Duration = Duration::from_secs(120);

/// Controls conversation memory and streaming behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Messages retained per conversation (user and assistant turns).
    pub max_messages: usize,
    /// Conversations retained before LRU eviction.
    pub max_conversations: usize,
    /// Longest gap tolerated between two streamed fragments. `None` waits
    /// forever.
    pub stream_idle_timeout: Option<Duration>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_messages: DEFAULT_MAX_MESSAGES,
            max_conversations: DEFAULT_MAX_CONVERSATIONS,
            stream_idle_timeout: Some(DEFAULT_STREAM_IDLE_TIMEOUT),
        }
    }
}

impl ChatConfig {
    pub fn with_max_messages(mut self, max_messages: usize) -> Self {
        self.max_messages = max_messages;
        self
    }

    pub fn with_max_conversations(mut self, max_conversations: usize) -> Self {
        self.max_conversations = max_conversations;
        self
    }

    /// Set the idle timeout from seconds; `None` or `0` disables it.
    pub fn with_idle_timeout_seconds(mut self, seconds: Option<u64>) -> Self {
        self.stream_idle_timeout = seconds.filter(|s| *s > 0).map(Duration::from_secs);
        self
    }
}
