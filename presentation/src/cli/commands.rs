//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for ai-code-helper
#[derive(Parser, Debug)]
#[command(name = "ai-code-helper")]
#[command(author, version, about = "Streaming programming tutor with an input guardrail")]
#[command(long_about = r#"
AI Code Helper answers programming questions, streaming the reply as it is
generated. Each conversation id keeps its own short history (the last ten
messages by default), so follow-up questions keep their context.

Messages are checked against a sensitive-word dictionary before they reach
the model when the guardrail is enabled (ai.guardrail.enabled = true).

Configuration files are loaded from (in priority order):
1. AI_<SECTION>__<KEY> environment variables
2. --config <path>               Explicit config file
3. ./ai-code-helper.toml         Project-level config
4. ~/.config/ai-code-helper/config.toml   Global config

Example:
  ai-code-helper "What does the ? operator do in Rust?"
  ai-code-helper -c 42 "And how does it convert errors?"
  ai-code-helper --chat
"#)]
pub struct Cli {
    /// The message to send (not required in chat mode)
    pub message: Option<String>,

    /// Conversation id; messages with the same id share history
    #[arg(short = 'c', long = "conversation", value_name = "ID", default_value_t = 1)]
    pub conversation: i64,

    /// Start interactive chat mode
    #[arg(long)]
    pub chat: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_one_shot_defaults() {
        let cli = Cli::parse_from(["ai-code-helper", "What is a lifetime?"]);
        assert_eq!(cli.message.as_deref(), Some("What is a lifetime?"));
        assert_eq!(cli.conversation, 1);
        assert!(!cli.chat);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_conversation_and_flags() {
        let cli = Cli::parse_from(["ai-code-helper", "-c", "42", "--chat", "-vv", "--no-config"]);
        assert_eq!(cli.conversation, 42);
        assert!(cli.chat);
        assert_eq!(cli.verbose, 2);
        assert!(cli.no_config);
        assert!(cli.message.is_none());
    }
}
