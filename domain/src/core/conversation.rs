//! Conversation identifier value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier that scopes one conversation's memory (Value Object)
///
/// The same identifier always resolves to the same history; two different
/// identifiers never share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(i64);

impl ConversationId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self(1)
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ConversationId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl FromStr for ConversationId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| DomainError::InvalidConversationId(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_conversation_id() {
        assert_eq!("42".parse::<ConversationId>(), Ok(ConversationId::new(42)));
        assert_eq!(" -7 ".parse::<ConversationId>(), Ok(ConversationId::new(-7)));
    }

    #[test]
    fn test_parse_invalid_conversation_id() {
        let err = "forty-two".parse::<ConversationId>().unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidConversationId("forty-two".to_string())
        );
    }

    #[test]
    fn test_display_round_trips_value() {
        let id = ConversationId::from(1001);
        assert_eq!(id.to_string(), "1001");
        assert_eq!(id.value(), 1001);
    }

    #[test]
    fn test_serializes_as_plain_integer() {
        let json = serde_json::to_string(&ConversationId::new(5)).unwrap();
        assert_eq!(json, "5");
    }
}
