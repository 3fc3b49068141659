//! Guardrail configuration from TOML (`[ai.guardrail]` section)

use code_helper_application::GuardrailConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Sensitive-word guardrail settings.
///
/// ```toml
/// [ai.guardrail]
/// enabled = true
/// case-sensitive = false
/// words = ["internal-codename"]
/// dictionary-path = "/etc/ai-code-helper/sensitive-words.txt"
/// allow-words = ["ddos for hire"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FileGuardrailConfig {
    /// Reject messages that contain a dictionary term (default: false)
    pub enabled: bool,
    /// Match terms with exact letter case (default: false)
    pub case_sensitive: bool,
    /// Include the dictionary shipped with the binary (default: true)
    pub use_builtin: bool,
    /// Extra terms
    pub words: Vec<String>,
    /// Extra dictionary file, one term per line, `#` starts a comment
    pub dictionary_path: Option<PathBuf>,
    /// Terms removed from the dictionary
    pub allow_words: Vec<String>,
}

impl Default for FileGuardrailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            case_sensitive: false,
            use_builtin: true,
            words: Vec::new(),
            dictionary_path: None,
            allow_words: Vec::new(),
        }
    }
}

impl FileGuardrailConfig {
    pub fn to_guardrail_config(&self) -> GuardrailConfig {
        GuardrailConfig {
            enabled: self.enabled,
            case_sensitive: self.case_sensitive,
        }
    }

    /// True when no dictionary source is configured at all
    pub fn has_no_terms(&self) -> bool {
        !self.use_builtin && self.words.is_empty() && self.dictionary_path.is_none()
    }
}
