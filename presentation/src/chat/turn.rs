//! One request/reply exchange, shared by one-shot and REPL modes

use crate::progress::reporter::TurnProgress;
use code_helper_application::{ChatError, GuardedChatUseCase};
use code_helper_domain::ConversationId;
use futures::StreamExt;
use std::future::Future;
use std::io::Write;

/// How a turn ended
#[derive(Debug)]
pub enum TurnOutcome {
    /// The whole reply was written
    Completed,
    /// The guardrail refused the message; nothing was sent to the model
    Rejected(String),
    /// `cancel` fired before the reply finished
    Cancelled,
    /// The chat failed (backend error, timeout, empty message)
    Failed(ChatError),
    /// Writing the reply failed
    OutputFailed(std::io::Error),
}

/// Send `message` and write reply fragments to `out` as they arrive.
///
/// Resolving `cancel` drops the reply stream, which aborts the backend request
/// and leaves the conversation history untouched.
pub async fn run_turn<W, C>(
    use_case: &GuardedChatUseCase,
    conversation_id: ConversationId,
    message: &str,
    out: &mut W,
    progress: &dyn TurnProgress,
    cancel: C,
) -> TurnOutcome
where
    W: Write,
    C: Future<Output = ()>,
{
    let mut stream = match use_case.chat_stream(conversation_id, message) {
        Ok(stream) => stream,
        Err(ChatError::Rejected { reason }) => return TurnOutcome::Rejected(reason),
        Err(e) => return TurnOutcome::Failed(e),
    };

    progress.on_waiting(use_case.session().model_name());
    tokio::pin!(cancel);
    let mut waiting = true;

    let outcome = loop {
        tokio::select! {
            _ = &mut cancel => break TurnOutcome::Cancelled,
            next = stream.next() => match next {
                Some(Ok(fragment)) => {
                    if waiting {
                        progress.on_first_chunk();
                        waiting = false;
                    }
                    if let Err(e) = out.write_all(fragment.as_bytes()).and_then(|_| out.flush()) {
                        break TurnOutcome::OutputFailed(e);
                    }
                }
                Some(Err(e)) => break TurnOutcome::Failed(e),
                None => break TurnOutcome::Completed,
            }
        }
    };

    if waiting {
        progress.on_first_chunk();
    }
    outcome
}
