//! Chat memory port
//!
//! Per-conversation storage of bounded message windows.

use code_helper_domain::{ConversationId, MessageWindow};
use std::sync::Arc;
use tokio::sync::Mutex;

/// A conversation's window behind its own async lock.
///
/// Holding the lock is what serializes requests within one conversation;
/// windows of different conversations never share a lock.
pub type SharedWindow = Arc<Mutex<MessageWindow>>;

/// Store of conversation memories keyed by [`ConversationId`]
pub trait ChatMemoryProvider: Send + Sync {
    /// Return the window for `id`, creating an empty one on first use.
    ///
    /// Repeated calls with the same id return the same window for as long as
    /// the conversation is retained.
    fn get_or_create(&self, id: ConversationId) -> SharedWindow;

    /// Return the window for `id` without creating it
    fn get(&self, id: ConversationId) -> Option<SharedWindow>;

    /// Forget a conversation. Returns `true` if it existed.
    fn remove(&self, id: ConversationId) -> bool;

    /// Number of conversations currently retained
    fn conversation_count(&self) -> usize;
}
