//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Keys are kebab-case and live under the `[ai]` table.

mod chat;
mod guardrail;
mod model;

pub use chat::FileChatConfig;
pub use guardrail::FileGuardrailConfig;
pub use model::FileModelConfig;

use super::validation::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub ai: FileAiConfig,
}

/// The `[ai]` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAiConfig {
    /// Input guardrail settings
    pub guardrail: FileGuardrailConfig,
    /// Conversation memory and streaming settings
    pub chat: FileChatConfig,
    /// Model backend settings
    pub model: FileModelConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Issues with [`Severity::Error`](super::Severity::Error) must stop startup.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        let chat = &self.ai.chat;
        let model = &self.ai.model;

        for (field, value) in [
            ("ai.chat.max-messages", chat.max_messages),
            ("ai.chat.max-conversations", chat.max_conversations),
        ] {
            if value == 0 {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::ZeroCapacity {
                        field: field.to_string(),
                    },
                    format!("{} must be at least 1", field),
                ));
            }
        }

        for (field, value) in [
            ("ai.model.base-url", &model.base_url),
            ("ai.model.model-name", &model.model_name),
        ] {
            if value.trim().is_empty() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyValue {
                        field: field.to_string(),
                    },
                    format!("{} must not be empty", field),
                ));
            }
        }

        let base_url = model.base_url.trim();
        if !base_url.is_empty()
            && !(base_url.starts_with("http://") || base_url.starts_with("https://"))
        {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidUrl {
                    value: model.base_url.clone(),
                },
                format!(
                    "ai.model.base-url: '{}' is not an http(s) URL",
                    model.base_url
                ),
            ));
        }

        if let Some(temperature) = model.temperature
            && !(0.0..=2.0).contains(&temperature)
        {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: "ai.model.temperature".to_string(),
                },
                format!(
                    "ai.model.temperature: {} is outside 0.0..=2.0 and may be refused by the backend",
                    temperature
                ),
            ));
        }

        if self.ai.guardrail.enabled && self.ai.guardrail.has_no_terms() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::EmptyDictionary,
                "ai.guardrail is enabled but has no dictionary (use-builtin = false, no words, no dictionary-path)",
            ));
        }

        issues
    }
}
