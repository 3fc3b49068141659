//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod chat_memory;
pub mod chat_model;
pub mod input_guardrail;
pub mod system_prompt;
