//! Input guardrail port
//!
//! A pre-dispatch gate on inbound user text.

use code_helper_domain::Verdict;

/// Validates a user message before it may reach the model
pub trait InputGuardrail: Send + Sync {
    fn validate(&self, user_message: &str) -> Verdict;
}

/// Guardrail that accepts everything
pub struct NoGuardrail;

impl InputGuardrail for NoGuardrail {
    fn validate(&self, _user_message: &str) -> Verdict {
        Verdict::Accept
    }
}
