//! Bounded message window (the per-conversation memory)

use super::entities::Message;
use crate::core::error::DomainError;
use std::collections::VecDeque;

/// Default number of messages retained per conversation.
pub const DEFAULT_MAX_MESSAGES: usize = 10;

/// Fixed-capacity, ordered history of one conversation.
///
/// Appending past the capacity evicts from the front, so the window always
/// holds the most recent messages in their original order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageWindow {
    messages: VecDeque<Message>,
    max_messages: usize,
}

impl MessageWindow {
    pub fn new(max_messages: usize) -> Result<Self, DomainError> {
        if max_messages == 0 {
            return Err(DomainError::ZeroCapacity);
        }
        Ok(Self {
            messages: VecDeque::with_capacity(max_messages),
            max_messages,
        })
    }

    pub fn max_messages(&self) -> usize {
        self.max_messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Append a message, returning how many old messages were evicted.
    pub fn push(&mut self, message: Message) -> usize {
        self.messages.push_back(message);
        let mut evicted = 0;
        while self.messages.len() > self.max_messages {
            self.messages.pop_front();
            evicted += 1;
        }
        evicted
    }

    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn to_vec(&self) -> Vec<Message> {
        self.messages.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

impl Default for MessageWindow {
    fn default() -> Self {
        Self {
            messages: VecDeque::with_capacity(DEFAULT_MAX_MESSAGES),
            max_messages: DEFAULT_MAX_MESSAGES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(window: &MessageWindow) -> Vec<String> {
        window.messages().map(|m| m.content().to_string()).collect()
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(MessageWindow::new(0), Err(DomainError::ZeroCapacity));
    }

    #[test]
    fn test_push_under_capacity_keeps_everything() {
        let mut window = MessageWindow::new(3).unwrap();
        assert_eq!(window.push(Message::user("a")), 0);
        assert_eq!(window.push(Message::assistant("b")), 0);
        assert_eq!(contents(&window), vec!["a", "b"]);
    }

    #[test]
    fn test_eviction_keeps_most_recent_in_order() {
        let mut window = MessageWindow::default();
        for i in 0..25 {
            window.push(Message::user(format!("m{i}")));
            assert!(window.len() <= DEFAULT_MAX_MESSAGES);
        }
        let expected: Vec<String> = (15..25).map(|i| format!("m{i}")).collect();
        assert_eq!(contents(&window), expected);
    }

    #[test]
    fn test_push_reports_evictions() {
        let mut window = MessageWindow::new(1).unwrap();
        assert_eq!(window.push(Message::user("first")), 0);
        assert_eq!(window.push(Message::assistant("second")), 1);
        assert_eq!(contents(&window), vec!["second"]);
    }

    #[test]
    fn test_clear() {
        let mut window = MessageWindow::new(2).unwrap();
        window.push(Message::user("a"));
        window.clear();
        assert!(window.is_empty());
        assert_eq!(window.max_messages(), 2);
    }
}
