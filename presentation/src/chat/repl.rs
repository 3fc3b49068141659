//! REPL (Read-Eval-Print Loop) for interactive chat

use super::turn::{TurnOutcome, run_turn};
use crate::ConsoleFormatter;
use crate::progress::reporter::{ProgressReporter, SilentProgress, TurnProgress};
use code_helper_application::GuardedChatUseCase;
use code_helper_domain::ConversationId;
use reedline::{
    DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal,
};
use std::path::PathBuf;
use tracing::warn;

const HISTORY_CAPACITY: usize = 1000;

/// Parsed slash command
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Quit,
    Help,
    History,
    Clear,
    SwitchConversation(ConversationId),
    Invalid(String),
}

impl Command {
    fn parse(line: &str) -> Self {
        let mut parts = line.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let arg = parts.next();

        match (name, arg) {
            ("/quit" | "/exit" | "/q", _) => Command::Quit,
            ("/help" | "/h" | "/?", _) => Command::Help,
            ("/history", _) => Command::History,
            ("/clear", _) => Command::Clear,
            ("/id", Some(value)) => match value.parse::<ConversationId>() {
                Ok(id) => Command::SwitchConversation(id),
                Err(e) => Command::Invalid(e.to_string()),
            },
            ("/id", None) => Command::Invalid("usage: /id <number>".to_string()),
            _ => Command::Invalid(format!("Unknown command: {}", name)),
        }
    }
}

/// Interactive chat REPL
pub struct ChatRepl {
    use_case: GuardedChatUseCase,
    conversation_id: ConversationId,
    show_progress: bool,
}

impl ChatRepl {
    /// Create a new ChatRepl
    pub fn new(use_case: GuardedChatUseCase, conversation_id: ConversationId) -> Self {
        Self {
            use_case,
            conversation_id,
            show_progress: true,
        }
    }

    /// Set whether to show progress
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    fn history_path() -> Option<PathBuf> {
        dirs::data_dir().map(|p| p.join("ai-code-helper").join("history.txt"))
    }

    /// Open the line history at `path`, or `None` after logging why not.
    fn open_history(path: PathBuf) -> Option<FileBackedHistory> {
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!(
                    "Cannot create history directory {}: {}",
                    parent.display(),
                    e
                );
                return None;
            }
        }
        match FileBackedHistory::with_file(HISTORY_CAPACITY, path) {
            Ok(history) => Some(history),
            Err(e) => {
                warn!("Input history unavailable: {}", e);
                None
            }
        }
    }

    fn editor() -> Reedline {
        let editor = Reedline::create();
        match Self::history_path().and_then(Self::open_history) {
            Some(history) => editor.with_history(Box::new(history)),
            None => editor,
        }
    }

    fn prompt(&self) -> DefaultPrompt {
        DefaultPrompt::new(
            DefaultPromptSegment::Basic(format!("[{}]", self.conversation_id)),
            DefaultPromptSegment::Empty,
        )
    }

    /// Run the interactive REPL
    ///
    /// Requires a multi-threaded runtime: line editing blocks its thread.
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut editor = Self::editor();

        self.print_welcome();

        loop {
            let prompt = self.prompt();
            let signal = tokio::task::block_in_place(|| editor.read_line(&prompt))?;

            match signal {
                Signal::Success(line) => {
                    let line = line.trim();

                    // Skip empty lines
                    if line.is_empty() {
                        continue;
                    }

                    // Handle commands
                    if line.starts_with('/') {
                        if self.handle_command(line).await {
                            break;
                        }
                        continue;
                    }

                    self.process_message(line).await;
                }
                Signal::CtrlC => {
                    println!("^C");
                    continue;
                }
                Signal::CtrlD => {
                    println!("Bye!");
                    break;
                }
            }
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", ConsoleFormatter::header("AI Code Helper - Chat Mode"));
        println!();
        println!("Model: {}", self.use_case.session().model_name());
        println!("Conversation: {}", self.conversation_id);
        println!();
        Self::print_help();
    }

    fn print_help() {
        println!("Commands:");
        println!("  /help, /h, /?    - Show this help");
        println!("  /id <number>     - Switch conversation");
        println!("  /history         - Show this conversation's memory");
        println!("  /clear           - Forget this conversation");
        println!("  /quit, /exit, /q - Exit chat");
        println!("Ctrl-C while a reply is streaming stops it.");
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    async fn handle_command(&mut self, line: &str) -> bool {
        match Command::parse(line) {
            Command::Quit => {
                println!("Bye!");
                return true;
            }
            Command::Help => {
                println!();
                Self::print_help();
            }
            Command::History => {
                let messages = self.use_case.session().history(self.conversation_id).await;
                println!();
                print!("{}", ConsoleFormatter::history(self.conversation_id, &messages));
                println!();
            }
            Command::Clear => {
                if self.use_case.session().clear(self.conversation_id) {
                    println!("Conversation {} cleared.", self.conversation_id);
                } else {
                    println!("Conversation {} has no history.", self.conversation_id);
                }
            }
            Command::SwitchConversation(id) => {
                self.conversation_id = id;
                println!("Switched to conversation {}.", id);
            }
            Command::Invalid(message) => {
                println!("{}", message);
                println!("Type /help for available commands");
            }
        }
        false
    }

    async fn process_message(&self, message: &str) {
        println!();

        let progress: Box<dyn TurnProgress> = if self.show_progress {
            Box::new(ProgressReporter::new())
        } else {
            Box::new(SilentProgress)
        };
        let cancel = async {
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
        };

        let mut stdout = std::io::stdout();
        let outcome = run_turn(
            &self.use_case,
            self.conversation_id,
            message,
            &mut stdout,
            progress.as_ref(),
            cancel,
        )
        .await;

        match outcome {
            TurnOutcome::Completed => println!(),
            TurnOutcome::Rejected(reason) => println!("{}", ConsoleFormatter::rejection(&reason)),
            TurnOutcome::Cancelled => {
                println!();
                println!("{}", ConsoleFormatter::cancelled());
            }
            TurnOutcome::Failed(e) => {
                println!();
                eprintln!("{}", ConsoleFormatter::error(&e));
            }
            TurnOutcome::OutputFailed(e) => eprintln!("Error: {}", e),
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("/quit"), Command::Quit);
        assert_eq!(Command::parse("/q"), Command::Quit);
        assert_eq!(Command::parse("/help"), Command::Help);
        assert_eq!(Command::parse("/history"), Command::History);
        assert_eq!(Command::parse("/clear"), Command::Clear);
        assert_eq!(
            Command::parse("/id 42"),
            Command::SwitchConversation(ConversationId::new(42))
        );
    }

    #[test]
    fn test_open_history_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("history.txt");

        assert!(ChatRepl::open_history(path).is_some());
        assert!(dir.path().join("nested").is_dir());
    }

    #[test]
    fn test_open_history_without_directory_is_none() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the directory should be
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        assert!(ChatRepl::open_history(blocker.join("history.txt")).is_none());
    }

    #[test]
    fn test_parse_invalid_commands() {
        assert!(matches!(Command::parse("/id"), Command::Invalid(_)));
        assert!(matches!(Command::parse("/id abc"), Command::Invalid(_)));
        assert!(matches!(Command::parse("/models"), Command::Invalid(_)));
    }
}
