//! Presentation layer for ai-code-helper
//!
//! This crate contains CLI definitions, console output formatting,
//! progress reporting, and the interactive chat interface.

pub mod chat;
pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::{ChatRepl, TurnOutcome, run_turn};
pub use cli::commands::Cli;
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{ProgressReporter, SilentProgress, TurnProgress};
