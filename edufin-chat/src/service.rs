//! Per-turn orchestration: validation, session resolution, recording, and
//! completion.

use crate::conversation::{validate_user_content, ConversationManager};
use crate::gateway::CompletionGateway;
use crate::types::{Language, Message, Session};
use edufin_common::{Error, Result};

/// Orchestrates one chat turn end to end.
///
/// A turn moves through validation, session resolution, user-turn
/// recording, completion, and assistant-turn recording. Validation
/// failures mutate nothing. A completion failure leaves the user's
/// message persisted and records no assistant turn, so resubmitting the
/// same question appends a fresh user entry rather than erroring.
pub struct ChatService {
    conversation: ConversationManager,
    gateway: CompletionGateway,
    history_window: usize,
}

impl ChatService {
    /// Create a service over the given manager and gateway.
    pub fn new(
        conversation: ConversationManager,
        gateway: CompletionGateway,
        history_window: usize,
    ) -> Self {
        Self {
            conversation,
            gateway,
            history_window,
        }
    }

    /// Create or update a session: idempotent upsert, switching the
    /// language in place when it differs.
    pub async fn init_session(&self, session_id: &str, language: Language) -> Result<Session> {
        validate_session_id(session_id)?;
        self.conversation.ensure_session(session_id, language).await
    }

    /// Process one chat turn, returning the persisted assistant message.
    pub async fn send_message(
        &self,
        session_id: &str,
        message: &str,
        language: Language,
    ) -> Result<Message> {
        // Shape validation first: a rejected turn must not create or touch
        // the session.
        validate_session_id(session_id)?;
        let message = validate_user_content(message)?;

        let session = self.conversation.ensure_session(session_id, language).await?;

        // The user's question is persisted before the completion call and
        // survives a completion failure.
        let user_message = self
            .conversation
            .record_user_turn(session_id, message, language)
            .await?;

        let window = self
            .conversation
            .context_window(session_id, self.history_window)
            .await?;

        let completion = match self
            .gateway
            .complete(session.language, &window, &user_message.content)
            .await
        {
            Ok(completion) => completion,
            Err(e) => {
                tracing::warn!(
                    session_id = %session_id,
                    error = %e,
                    "Completion failed; user turn kept, no assistant turn recorded"
                );
                return Err(e);
            }
        };

        let assistant_message = self
            .conversation
            .record_assistant_turn(session_id, &completion, language)
            .await?;

        tracing::info!(
            session_id = %session_id,
            user_message_id = user_message.id,
            assistant_message_id = assistant_message.id,
            "Turn completed"
        );

        Ok(assistant_message)
    }

    /// Full transcript for a session; empty for unknown sessions.
    pub async fn history(&self, session_id: &str) -> Result<Vec<Message>> {
        validate_session_id(session_id)?;
        self.conversation.history(session_id).await
    }
}

fn validate_session_id(session_id: &str) -> Result<()> {
    if session_id.trim().is_empty() {
        return Err(Error::Validation("sessionId must not be empty".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{CompletionProvider, CompletionRequest};
    use crate::store::MemoryStore;
    use crate::types::MessageRole;
    use async_trait::async_trait;
    use edufin_common::ProviderConfig;
    use std::sync::{Arc, Mutex};

    /// Provider double: scripted replies, captured requests.
    struct ScriptedProvider {
        requests: Mutex<Vec<CompletionRequest>>,
        fail: bool,
    }

    impl ScriptedProvider {
        fn replying() -> Arc<Self> {
            Arc::new(Self {
                requests: Mutex::new(Vec::new()),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                requests: Mutex::new(Vec::new()),
                fail: true,
            })
        }
    }

    #[async_trait]
    impl CompletionProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, request: CompletionRequest) -> Result<String> {
            self.requests.lock().unwrap().push(request);
            if self.fail {
                Err(Error::Upstream {
                    status: Some(503),
                    message: "service unavailable".into(),
                })
            } else {
                Ok("QRIS adalah standar pembayaran QR nasional.".into())
            }
        }
    }

    fn service_with(provider: Arc<ScriptedProvider>) -> ChatService {
        let store = Arc::new(MemoryStore::new());
        let config = ProviderConfig::default();
        ChatService::new(
            ConversationManager::new(store),
            CompletionGateway::new(provider, &config),
            20,
        )
    }

    #[tokio::test]
    async fn successful_turn_persists_user_then_assistant() {
        let provider = ScriptedProvider::replying();
        let service = service_with(provider.clone());

        let assistant = service
            .send_message("s1", "Apa itu QRIS?", Language::Id)
            .await
            .unwrap();
        assert_eq!(assistant.role, MessageRole::Assistant);
        assert_eq!(assistant.content, "QRIS adalah standar pembayaran QR nasional.");

        let history = service.history("s1").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, MessageRole::User);
        assert_eq!(history[0].content, "Apa itu QRIS?");
        assert_eq!(history[1].role, MessageRole::Assistant);
        assert!(history[0].id < history[1].id);
    }

    #[tokio::test]
    async fn first_turn_gateway_sees_empty_history() {
        let provider = ScriptedProvider::replying();
        let service = service_with(provider.clone());

        service.send_message("s1", "Apa itu QRIS?", Language::Id).await.unwrap();

        let requests = provider.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        // system + the new user turn only
        assert_eq!(requests[0].messages.len(), 2);
        assert_eq!(requests[0].messages[1].content, "Apa itu QRIS?");
    }

    #[tokio::test]
    async fn failed_completion_keeps_user_turn_only() {
        let provider = ScriptedProvider::failing();
        let service = service_with(provider);

        let err = service
            .send_message("s1", "Apa itu BI-FAST?", Language::Id)
            .await
            .unwrap_err();
        assert!(err.is_upstream());

        let history = service.history("s1").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].role, MessageRole::User);
    }

    #[tokio::test]
    async fn resend_after_failure_appends_duplicate_user_entry() {
        let provider = ScriptedProvider::failing();
        let service = service_with(provider);

        for _ in 0..2 {
            let _ = service.send_message("s1", "Apa itu QRIS?", Language::Id).await;
        }

        let history = service.history("s1").await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|m| m.role == MessageRole::User));
    }

    #[tokio::test]
    async fn validation_failure_mutates_nothing() {
        let provider = ScriptedProvider::replying();
        let service = service_with(provider.clone());

        let err = service.send_message("s1", "   ", Language::Id).await.unwrap_err();
        assert!(err.is_validation());

        assert!(service.history("s1").await.unwrap().is_empty());
        assert!(provider.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_session_id_rejected() {
        let provider = ScriptedProvider::replying();
        let service = service_with(provider);

        let err = service.send_message("  ", "Apa itu QRIS?", Language::Id).await.unwrap_err();
        assert!(err.is_validation());

        let err = service.init_session("", Language::Id).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn language_switch_changes_system_instruction() {
        let provider = ScriptedProvider::replying();
        let service = service_with(provider.clone());

        service.send_message("s1", "Apa itu QRIS?", Language::Id).await.unwrap();
        service.init_session("s1", Language::En).await.unwrap();
        service.send_message("s1", "What is QRIS?", Language::En).await.unwrap();

        let requests = provider.requests.lock().unwrap();
        assert!(requests[0].messages[0]
            .content
            .contains("Selalu jawab dalam bahasa Indonesia"));
        assert!(requests[1].messages[0].content.contains("Always answer in English"));
    }

    #[tokio::test]
    async fn window_excludes_current_turn_and_caps_at_nineteen() {
        let provider = ScriptedProvider::replying();
        let service = service_with(provider.clone());

        // 25 completed turns = 50 persisted messages
        for i in 0..25 {
            service
                .send_message("s1", &format!("pertanyaan {i}"), Language::Id)
                .await
                .unwrap();
        }

        service.send_message("s1", "pertanyaan terakhir", Language::Id).await.unwrap();

        let requests = provider.requests.lock().unwrap();
        let last = requests.last().unwrap();
        // system + 19 prior + current user turn
        assert_eq!(last.messages.len(), 21);
        let prior = &last.messages[1..20];
        assert!(prior.iter().all(|m| m.content != "pertanyaan terakhir"));
        assert_eq!(last.messages[20].content, "pertanyaan terakhir");
    }

    #[tokio::test]
    async fn init_session_is_idempotent_upsert() {
        let provider = ScriptedProvider::replying();
        let service = service_with(provider);

        let created = service.init_session("s1", Language::Id).await.unwrap();
        let switched = service.init_session("s1", Language::Zh).await.unwrap();

        assert_eq!(created.session_id, switched.session_id);
        assert_eq!(created.created_at, switched.created_at);
        assert_eq!(switched.language, Language::Zh);
    }

    #[tokio::test]
    async fn history_unknown_session_is_empty() {
        let provider = ScriptedProvider::replying();
        let service = service_with(provider);
        assert!(service.history("never-seen").await.unwrap().is_empty());
    }
}
