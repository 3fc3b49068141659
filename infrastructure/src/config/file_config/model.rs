//! Model backend configuration from TOML (`[ai.model]` section)

use serde::{Deserialize, Serialize};

/// OpenAI-compatible chat-completion backend.
///
/// Defaults target DashScope's compatible mode with `qwen-max`; any service
/// exposing `POST {base-url}/chat/completions` works.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FileModelConfig {
    /// API root, without the `/chat/completions` suffix
    pub base_url: String,
    /// Model identifier sent with every request
    pub model_name: String,
    /// Environment variable holding the API key (default: "DASHSCOPE_API_KEY")
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead)
    pub api_key: Option<String>,
    /// Sampling temperature; backend default when unset
    pub temperature: Option<f32>,
    /// Reply length limit; backend default when unset
    pub max_tokens: Option<u32>,
    /// TCP connect timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for FileModelConfig {
    fn default() -> Self {
        Self {
            base_url: "https://dashscope.aliyuncs.com/compatible-mode/v1".to_string(),
            model_name: "qwen-max".to_string(),
            api_key_env: "DASHSCOPE_API_KEY".to_string(),
            api_key: None,
            temperature: None,
            max_tokens: None,
            connect_timeout_secs: 10,
        }
    }
}

impl FileModelConfig {
    /// The configured key, falling back to the `api-key-env` variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|k| !k.trim().is_empty())
    }
}
