//! Conversation storage backends.
//!
//! The store is an injected capability; the conversation manager only
//! sees the [`ConversationStore`] trait. Backends: volatile in-memory
//! (default) and `SQLite`.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::types::{Message, NewMessage, Session};
use async_trait::async_trait;
use edufin_common::Result;

/// Trait for conversation storage backends.
///
/// Reads against an unknown session return empty/absent, not an error.
/// `append_message` must be atomic: it assigns the message id and creation
/// time inside its critical section, so message ids within a session are
/// strictly increasing in append order even under concurrent callers.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Backend name (e.g., "memory", "sqlite").
    fn name(&self) -> &str;

    /// Insert or replace a session record.
    async fn put_session(&self, session: Session) -> Result<()>;

    /// Look up a session. Absence is represented as `None`.
    async fn get_session(&self, session_id: &str) -> Result<Option<Session>>;

    /// Append a message, assigning its id and creation time.
    async fn append_message(&self, message: NewMessage) -> Result<Message>;

    /// All messages for a session in creation order. Empty for unknown sessions.
    async fn list_messages(&self, session_id: &str) -> Result<Vec<Message>>;

    /// The most recent `limit` messages for a session, in original order.
    async fn list_recent_messages(&self, session_id: &str, limit: usize) -> Result<Vec<Message>>;

    /// Health check - returns true if the backend is operational.
    async fn health_check(&self) -> bool;
}
