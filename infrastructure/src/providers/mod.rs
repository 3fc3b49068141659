//! Model backend adapters

pub mod openai_compatible;
pub mod sse;

pub use openai_compatible::OpenAiCompatibleChatModel;
