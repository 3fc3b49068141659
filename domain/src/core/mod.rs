//! Core domain concepts shared across all subdomains.
//!
//! - [`conversation::ConversationId`]: key that scopes a conversation's memory
//! - [`error::DomainError`]: domain-level errors

pub mod conversation;
pub mod error;
