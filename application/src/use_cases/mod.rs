//! Use cases (application services)

pub mod chat_session;
pub mod guarded_chat;

#[cfg(test)]
pub(crate) mod test_support;
