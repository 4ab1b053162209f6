//! Volatile in-memory conversation store.
//!
//! The reference backend: nothing survives a restart. Session and message
//! maps live behind a single `RwLock`; appends take the write lock, which
//! makes id assignment and insertion one atomic step.

use super::ConversationStore;
use crate::types::{Message, NewMessage, Session};
use async_trait::async_trait;
use chrono::Utc;
use edufin_common::Result;
use std::collections::HashMap;
use tokio::sync::RwLock;

struct MemoryInner {
    sessions: HashMap<String, Session>,
    messages: HashMap<String, Vec<Message>>,
    next_message_id: i64,
}

/// In-memory conversation store.
pub struct MemoryStore {
    inner: RwLock<MemoryInner>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryInner {
                sessions: HashMap::new(),
                messages: HashMap::new(),
                next_message_id: 1,
            }),
        }
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn put_session(&self, session: Session) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner
            .sessions
            .insert(session.session_id.clone(), session);
        Ok(())
    }

    async fn get_session(&self, session_id: &str) -> Result<Option<Session>> {
        let inner = self.inner.read().await;
        Ok(inner.sessions.get(session_id).cloned())
    }

    async fn append_message(&self, message: NewMessage) -> Result<Message> {
        let mut inner = self.inner.write().await;

        let id = inner.next_message_id;
        inner.next_message_id += 1;

        let message = Message {
            id,
            session_id: message.session_id,
            role: message.role,
            content: message.content,
            language: message.language,
            created_at: Utc::now(),
        };

        inner
            .messages
            .entry(message.session_id.clone())
            .or_default()
            .push(message.clone());

        Ok(message)
    }

    async fn list_messages(&self, session_id: &str) -> Result<Vec<Message>> {
        let inner = self.inner.read().await;
        Ok(inner.messages.get(session_id).cloned().unwrap_or_default())
    }

    async fn list_recent_messages(&self, session_id: &str, limit: usize) -> Result<Vec<Message>> {
        let inner = self.inner.read().await;
        let messages = inner.messages.get(session_id).map(Vec::as_slice).unwrap_or(&[]);
        let start = messages.len().saturating_sub(limit);
        Ok(messages[start..].to_vec())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
