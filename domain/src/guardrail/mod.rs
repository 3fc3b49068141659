//! Input guardrail verdicts.
//!
//! A [`Verdict`] is produced for every inbound user message before it is
//! allowed anywhere near the model. Verdicts are never persisted.

use serde::{Deserialize, Serialize};

/// Reason attached to a rejection caused by a dictionary match.
pub const SENSITIVE_CONTENT_REASON: &str = "sensitive content detected";

/// Outcome of validating one user message (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Accept,
    Reject { reason: String },
}

impl Verdict {
    pub fn reject(reason: impl Into<String>) -> Self {
        Verdict::Reject {
            reason: reason.into(),
        }
    }

    /// Rejection carrying [`SENSITIVE_CONTENT_REASON`].
    pub fn sensitive_content() -> Self {
        Self::reject(SENSITIVE_CONTENT_REASON)
    }

    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Verdict::Accept => None,
            Verdict::Reject { reason } => Some(reason),
        }
    }
}
