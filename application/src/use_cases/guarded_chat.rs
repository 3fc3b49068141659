//! Guarded chat use case
//!
//! Composes the input guardrail in front of the [`ChatSessionService`]. A
//! rejected message is answered with [`ChatError::Rejected`] and never reaches
//! the model or the conversation memory.

use super::chat_session::{ChatError, ChatSessionService, ChatStream, collect_reply};
use crate::ports::input_guardrail::InputGuardrail;
use code_helper_domain::util::preview;
use code_helper_domain::{ConversationId, Verdict};
use std::sync::Arc;
use tracing::warn;

/// Use case for a guarded, streaming chat turn.
#[derive(Clone)]
pub struct GuardedChatUseCase {
    guardrail: Arc<dyn InputGuardrail>,
    session: ChatSessionService,
}

impl GuardedChatUseCase {
    pub fn new(guardrail: Arc<dyn InputGuardrail>, session: ChatSessionService) -> Self {
        Self { guardrail, session }
    }

    pub fn session(&self) -> &ChatSessionService {
        &self.session
    }

    /// Validate `user_message`, then stream the reply.
    ///
    /// `Err(ChatError::Rejected)` is returned before any stream exists, so a
    /// rejection can never be mistaken for an empty reply.
    pub fn chat_stream(
        &self,
        conversation_id: ConversationId,
        user_message: impl Into<String>,
    ) -> Result<ChatStream, ChatError> {
        let user_message = user_message.into();

        if let Verdict::Reject { reason } = self.guardrail.validate(&user_message) {
            warn!(
                "Rejected message [conversation {}]: {} ({})",
                conversation_id,
                reason,
                preview(&user_message, 40)
            );
            return Err(ChatError::Rejected { reason });
        }

        self.session.chat_stream(conversation_id, user_message)
    }

    /// Non-streaming variant of [`chat_stream`](Self::chat_stream).
    pub async fn chat(
        &self,
        conversation_id: ConversationId,
        user_message: impl Into<String>,
    ) -> Result<String, ChatError> {
        collect_reply(self.chat_stream(conversation_id, user_message)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChatConfig;
    use crate::ports::input_guardrail::NoGuardrail;
    use crate::ports::system_prompt::InlineSystemPrompt;
    use crate::use_cases::test_support::{ScriptedModel, TestMemory};

    /// Rejects any message containing "badword", ignoring case
    struct BadWordGuardrail;

    impl InputGuardrail for BadWordGuardrail {
        fn validate(&self, user_message: &str) -> Verdict {
            if user_message.to_lowercase().contains("badword") {
                Verdict::sensitive_content()
            } else {
                Verdict::Accept
            }
        }
    }

    fn use_case(
        guardrail: Arc<dyn InputGuardrail>,
        model: Arc<ScriptedModel>,
    ) -> GuardedChatUseCase {
        let session = ChatSessionService::new(
            model,
            Arc::new(TestMemory::new(10)),
            &InlineSystemPrompt::new("prompt"),
            ChatConfig::default(),
        )
        .unwrap();
        GuardedChatUseCase::new(guardrail, session)
    }

    #[tokio::test]
    async fn test_rejected_message_never_reaches_model() {
        let model = Arc::new(ScriptedModel::replying(&["should not run"]));
        let use_case = use_case(Arc::new(BadWordGuardrail), model.clone());
        let id = ConversationId::new(1);

        let result = use_case.chat_stream(id, "This has BadWord in it");
        let error = result.err().expect("message should be rejected");
        assert!(error.is_rejection());
        assert_eq!(error.rejection_reason(), Some("sensitive content detected"));

        assert!(model.requests().is_empty());
        assert!(use_case.session().history(id).await.is_empty());
    }

    #[tokio::test]
    async fn test_accepted_message_is_forwarded() {
        let model = Arc::new(ScriptedModel::replying(&["Sure."]));
        let use_case = use_case(Arc::new(BadWordGuardrail), model.clone());

        let reply = use_case
            .chat(ConversationId::new(1), "Explain lifetimes")
            .await
            .unwrap();
        assert_eq!(reply, "Sure.");
        assert_eq!(model.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_disabled_guardrail_forwards_anything() {
        let model = Arc::new(ScriptedModel::replying(&["ok"]));
        let use_case = use_case(Arc::new(NoGuardrail), model.clone());

        let reply = use_case
            .chat(ConversationId::new(1), "This has BadWord in it")
            .await
            .unwrap();
        assert_eq!(reply, "ok");
        assert_eq!(model.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_rejection_distinct_from_empty_reply() {
        let model = Arc::new(ScriptedModel::replying(&[]));
        let use_case = use_case(Arc::new(BadWordGuardrail), model);

        let empty = use_case.chat(ConversationId::new(2), "say nothing").await;
        assert_eq!(empty.unwrap(), "");

        let rejected = use_case.chat(ConversationId::new(2), "badword").await;
        assert!(rejected.unwrap_err().is_rejection());
    }
}
