//! Configuration file loading for ai-code-helper
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `AI_<SECTION>__<KEY>` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./ai-code-helper.toml` or `./.ai-code-helper.toml`
//! 4. Global: `$XDG_CONFIG_HOME/ai-code-helper/config.toml`
//! 5. Default values

mod file_config;
mod loader;
mod validation;

pub use file_config::{
    FileAiConfig, FileChatConfig, FileConfig, FileGuardrailConfig, FileModelConfig,
};
pub use loader::ConfigLoader;
pub use validation::{ConfigIssue, ConfigIssueCode, Severity};
