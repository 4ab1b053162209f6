//! Session lifecycle, message append/read, and history windowing.

use crate::store::ConversationStore;
use crate::types::{Language, Message, MessageRole, NewMessage, Session, MAX_USER_MESSAGE_CHARS};
use edufin_common::{Error, Result};
use std::sync::Arc;

/// Validate user-turn content: trimmed, non-empty, at most
/// [`MAX_USER_MESSAGE_CHARS`] characters. Returns the trimmed content.
pub fn validate_user_content(content: &str) -> Result<&str> {
    let content = content.trim();
    if content.is_empty() {
        return Err(Error::Validation("message must not be empty".into()));
    }
    if content.chars().count() > MAX_USER_MESSAGE_CHARS {
        return Err(Error::Validation(format!(
            "message exceeds {MAX_USER_MESSAGE_CHARS} characters"
        )));
    }
    Ok(content)
}

/// Owns session lifecycle and the append-only message log. The only
/// component that creates messages; everything else reads.
pub struct ConversationManager {
    store: Arc<dyn ConversationStore>,
}

impl ConversationManager {
    /// Create a manager over the given store.
    pub fn new(store: Arc<dyn ConversationStore>) -> Self {
        Self { store }
    }

    /// Return the existing session, creating it with `language` if absent.
    ///
    /// When the session exists with a different language, the language is
    /// switched in place and `updated_at` bumped: one session id never
    /// produces two session records.
    pub async fn ensure_session(&self, session_id: &str, language: Language) -> Result<Session> {
        if let Some(mut session) = self.store.get_session(session_id).await? {
            if session.language != language {
                session.switch_language(language);
                self.store.put_session(session.clone()).await?;
                tracing::debug!(
                    session_id = %session_id,
                    language = %language,
                    "Session language switched"
                );
            }
            return Ok(session);
        }

        let session = Session::new(session_id, language);
        self.store.put_session(session.clone()).await?;
        tracing::debug!(session_id = %session_id, language = %language, "Session created");
        Ok(session)
    }

    /// Validate and append a user turn.
    ///
    /// Content is trimmed; empty or over-long content is rejected before
    /// anything reaches the store.
    pub async fn record_user_turn(
        &self,
        session_id: &str,
        content: &str,
        language: Language,
    ) -> Result<Message> {
        let content = validate_user_content(content)?;

        self.store
            .append_message(NewMessage {
                session_id: session_id.into(),
                role: MessageRole::User,
                content: content.into(),
                language,
            })
            .await
    }

    /// Append an assistant turn. Content is provider output and appended
    /// unconditionally.
    pub async fn record_assistant_turn(
        &self,
        session_id: &str,
        content: &str,
        language: Language,
    ) -> Result<Message> {
        self.store
            .append_message(NewMessage {
                session_id: session_id.into(),
                role: MessageRole::Assistant,
                content: content.into(),
                language,
            })
            .await
    }

    /// Full transcript in creation order. Empty for unknown sessions.
    pub async fn history(&self, session_id: &str) -> Result<Vec<Message>> {
        self.store.list_messages(session_id).await
    }

    /// The completion context: the last `max_turns` messages with the
    /// final entry dropped.
    ///
    /// The final entry is the just-recorded current user turn; dropping it
    /// by index keeps it out of the prior-context slice, so the gateway
    /// sees at most `max_turns - 1` messages and never the turn it is
    /// about to answer. Index-based exclusion relies on the single-writer-
    /// per-session assumption.
    pub async fn context_window(&self, session_id: &str, max_turns: usize) -> Result<Vec<Message>> {
        let mut recent = self.store.list_recent_messages(session_id, max_turns).await?;
        recent.pop();
        Ok(recent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn manager() -> ConversationManager {
        ConversationManager::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn ensure_session_creates_once() {
        let manager = manager();

        let created = manager.ensure_session("s1", Language::Id).await.unwrap();
        let again = manager.ensure_session("s1", Language::Id).await.unwrap();

        assert_eq!(created.session_id, again.session_id);
        assert_eq!(created.created_at, again.created_at);
    }

    #[tokio::test]
    async fn ensure_session_switches_language_in_place() {
        let manager = manager();

        let created = manager.ensure_session("s1", Language::Id).await.unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let switched = manager.ensure_session("s1", Language::En).await.unwrap();

        assert_eq!(switched.language, Language::En);
        assert_eq!(switched.created_at, created.created_at);
        assert!(switched.updated_at > created.updated_at);
    }

    #[tokio::test]
    async fn record_user_turn_trims_content() {
        let manager = manager();
        let message = manager
            .record_user_turn("s1", "  Apa itu QRIS?  ", Language::Id)
            .await
            .unwrap();
        assert_eq!(message.content, "Apa itu QRIS?");
        assert_eq!(message.role, MessageRole::User);
    }

    #[tokio::test]
    async fn empty_user_turn_rejected_without_side_effects() {
        let manager = manager();
        let err = manager.record_user_turn("s1", "   ", Language::Id).await.unwrap_err();
        assert!(err.is_validation());
        assert!(manager.history("s1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn over_long_user_turn_rejected() {
        let manager = manager();
        let content = "x".repeat(MAX_USER_MESSAGE_CHARS + 1);
        let err = manager
            .record_user_turn("s1", &content, Language::Id)
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(manager.history("s1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn exactly_max_chars_accepted() {
        let manager = manager();
        let content = "x".repeat(MAX_USER_MESSAGE_CHARS);
        let message = manager
            .record_user_turn("s1", &content, Language::Id)
            .await
            .unwrap();
        assert_eq!(message.content.chars().count(), MAX_USER_MESSAGE_CHARS);
    }

    #[tokio::test]
    async fn history_is_strictly_ordered() {
        let manager = manager();
        for i in 0..6 {
            manager
                .record_user_turn("s1", &format!("question {i}"), Language::Id)
                .await
                .unwrap();
            manager
                .record_assistant_turn("s1", &format!("answer {i}"), Language::Id)
                .await
                .unwrap();
        }

        let history = manager.history("s1").await.unwrap();
        assert_eq!(history.len(), 12);
        for pair in history.windows(2) {
            assert!(pair[0].id < pair[1].id);
        }
    }

    #[tokio::test]
    async fn context_window_drops_current_turn() {
        let manager = manager();

        manager.record_user_turn("s1", "first question", Language::Id).await.unwrap();
        manager.record_assistant_turn("s1", "first answer", Language::Id).await.unwrap();
        let current = manager
            .record_user_turn("s1", "second question", Language::Id)
            .await
            .unwrap();

        let window = manager.context_window("s1", 20).await.unwrap();
        assert_eq!(window.len(), 2);
        assert!(window.iter().all(|m| m.id != current.id));
        assert_eq!(window[0].content, "first question");
        assert_eq!(window[1].content, "first answer");
    }

    #[tokio::test]
    async fn context_window_caps_at_max_turns_minus_one() {
        let manager = manager();

        // 25 prior turns (50 messages), then the current question
        for i in 0..25 {
            manager
                .record_user_turn("s1", &format!("q{i}"), Language::Id)
                .await
                .unwrap();
            manager
                .record_assistant_turn("s1", &format!("a{i}"), Language::Id)
                .await
                .unwrap();
        }
        manager.record_user_turn("s1", "current", Language::Id).await.unwrap();

        let window = manager.context_window("s1", 20).await.unwrap();
        assert_eq!(window.len(), 19);
        assert!(window.iter().all(|m| m.content != "current"));
        // Most recent prior exchange is still present
        assert_eq!(window.last().unwrap().content, "a24");
    }

    #[tokio::test]
    async fn context_window_empty_for_fresh_session() {
        let manager = manager();
        manager.record_user_turn("s1", "first ever", Language::Id).await.unwrap();

        // Only the current turn exists; the window must be empty
        let window = manager.context_window("s1", 20).await.unwrap();
        assert!(window.is_empty());
    }

    #[tokio::test]
    async fn context_window_unknown_session_is_empty() {
        let manager = manager();
        assert!(manager.context_window("nope", 20).await.unwrap().is_empty());
    }
}
