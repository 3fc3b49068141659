//! Process-local conversation store
//!
//! Each conversation gets its own [`SharedWindow`]. The store itself is
//! bounded: once more than `max_conversations` are retained, the least
//! recently used conversation whose window is not in use is dropped.

use code_helper_application::{ChatConfig, ChatMemoryProvider, SharedWindow};
use code_helper_domain::{ConversationId, DomainError, MessageWindow};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

struct Entry {
    window: SharedWindow,
    last_used: u64,
}

#[derive(Default)]
struct State {
    entries: HashMap<ConversationId, Entry>,
    clock: u64,
}

impl State {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Drop least recently used conversations until within `limit`.
    ///
    /// Windows referenced outside the store (a request holds the lock or is
    /// about to) are skipped, so the store may briefly exceed `limit`.
    fn evict_over(&mut self, limit: usize, keep: ConversationId) {
        while self.entries.len() > limit {
            let victim = self
                .entries
                .iter()
                .filter(|(id, entry)| **id != keep && Arc::strong_count(&entry.window) == 1)
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(id, _)| *id);

            match victim {
                Some(id) => {
                    self.entries.remove(&id);
                    debug!(conversation_id = %id, "Evicted idle conversation");
                }
                None => break,
            }
        }
    }
}

/// In-memory [`ChatMemoryProvider`]
pub struct InMemoryChatMemory {
    template: MessageWindow,
    max_conversations: usize,
    state: Mutex<State>,
}

impl InMemoryChatMemory {
    pub fn new(max_messages: usize, max_conversations: usize) -> Result<Self, DomainError> {
        if max_conversations == 0 {
            return Err(DomainError::ZeroCapacity);
        }
        Ok(Self {
            template: MessageWindow::new(max_messages)?,
            max_conversations,
            state: Mutex::new(State::default()),
        })
    }

    pub fn from_config(config: &ChatConfig) -> Result<Self, DomainError> {
        Self::new(config.max_messages, config.max_conversations)
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // The state is a plain map; a panic elsewhere cannot leave it torn.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ChatMemoryProvider for InMemoryChatMemory {
    fn get_or_create(&self, id: ConversationId) -> SharedWindow {
        let mut state = self.state();
        let now = state.tick();

        if let Some(entry) = state.entries.get_mut(&id) {
            entry.last_used = now;
            return Arc::clone(&entry.window);
        }

        let window: SharedWindow = Arc::new(tokio::sync::Mutex::new(self.template.clone()));
        state.entries.insert(
            id,
            Entry {
                window: Arc::clone(&window),
                last_used: now,
            },
        );
        debug!(conversation_id = %id, "Created conversation memory");

        let limit = self.max_conversations;
        state.evict_over(limit, id);
        window
    }

    fn get(&self, id: ConversationId) -> Option<SharedWindow> {
        let mut state = self.state();
        let now = state.tick();
        state.entries.get_mut(&id).map(|entry| {
            entry.last_used = now;
            Arc::clone(&entry.window)
        })
    }

    fn remove(&self, id: ConversationId) -> bool {
        self.state().entries.remove(&id).is_some()
    }

    fn conversation_count(&self) -> usize {
        self.state().entries.len()
    }
}
