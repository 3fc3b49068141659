//! System prompt adapters

mod bundled;
mod file_prompt;

pub use bundled::{BUNDLED_SYSTEM_PROMPT, BundledPromptSource};
pub use file_prompt::FilePromptSource;

use code_helper_application::SystemPromptSource;
use std::path::Path;

/// Read `path` when one is configured, otherwise use the bundled prompt.
pub fn prompt_source(path: Option<&Path>) -> Box<dyn SystemPromptSource> {
    match path {
        Some(path) => Box::new(FilePromptSource::new(path)),
        None => Box::new(BundledPromptSource),
    }
}
