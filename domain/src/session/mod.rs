//! Conversation session domain.
//!
//! - [`entities::Message`]: a single role-tagged message
//! - [`window::MessageWindow`]: the bounded history of one conversation

pub mod entities;
pub mod window;
