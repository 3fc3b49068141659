//! System prompt value object

use std::fmt;
use std::sync::Arc;

/// Fixed instruction text prepended to every model invocation.
///
/// Cheap to clone; every conversation shares the same allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemPrompt(Arc<str>);

impl SystemPrompt {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for SystemPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SystemPrompt {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for SystemPrompt {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}
