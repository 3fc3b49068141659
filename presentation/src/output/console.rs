//! Console formatting for chat output

use code_helper_application::ChatError;
use code_helper_domain::{ConversationId, Message, Role};
use colored::Colorize;

/// Formats chat events for terminal display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// A message the guardrail refused
    pub fn rejection(reason: &str) -> String {
        format!("{} {}", "Rejected:".red().bold(), reason)
    }

    /// Any other failed turn
    pub fn error(error: &ChatError) -> String {
        match error {
            ChatError::Rejected { reason } => Self::rejection(reason),
            other => format!("{} {}", "Error:".red().bold(), other),
        }
    }

    /// Shown after Ctrl-C stops a reply
    pub fn cancelled() -> String {
        format!("{}", "[reply cancelled]".yellow())
    }

    /// Stored history of one conversation
    pub fn history(conversation_id: ConversationId, messages: &[Message]) -> String {
        let mut output = format!(
            "{} {} ({} messages)\n",
            "Conversation".cyan().bold(),
            conversation_id,
            messages.len()
        );
        if messages.is_empty() {
            output.push_str("  (empty)\n");
            return output;
        }
        for message in messages {
            let label = match message.role() {
                Role::User => "you".green().bold(),
                Role::Assistant => "assistant".blue().bold(),
                Role::System => "system".dimmed(),
            };
            output.push_str(&format!("  {}: {}\n", label, message.content()));
        }
        output
    }

    pub fn header(title: &str) -> String {
        let width = title.chars().count() + 8;
        format!(
            "╭{}╮\n│    {}    │\n╰{}╯",
            "─".repeat(width),
            title.bold(),
            "─".repeat(width)
        )
    }
}
