//! `SQLite`-backed conversation store.
//!
//! Two tables: `sessions` (unique on `session_id`) and `messages`
//! (append-only log, AUTOINCREMENT ids, indexed by session and id).
//! The connection mutex makes each append a single critical section, so
//! id assignment and insertion cannot interleave.

use super::ConversationStore;
use crate::types::{Language, Message, MessageRole, NewMessage, Session};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use edufin_common::{Error, Result};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;

/// `SQLite` conversation store.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the store at the given database path.
    pub fn new(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path).map_err(db_err)?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Initialize database schema.
    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS sessions (
                session_id  TEXT PRIMARY KEY,
                language    TEXT NOT NULL,
                created_at  TEXT NOT NULL,
                updated_at  TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS messages (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id  TEXT NOT NULL,
                role        TEXT NOT NULL,
                content     TEXT NOT NULL,
                language    TEXT NOT NULL,
                created_at  TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_messages_session ON messages(session_id, id);",
        )
        .map_err(db_err)?;
        Ok(())
    }

    fn row_to_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<Message> {
        Ok(Message {
            id: row.get(0)?,
            session_id: row.get(1)?,
            role: MessageRole::parse(&row.get::<_, String>(2)?),
            content: row.get(3)?,
            language: parse_language(&row.get::<_, String>(4)?),
            created_at: parse_timestamp(&row.get::<_, String>(5)?),
        })
    }
}

fn db_err(e: rusqlite::Error) -> Error {
    Error::Database(e.to_string())
}

fn lock_err<T>(e: std::sync::PoisonError<T>) -> Error {
    Error::Database(format!("Lock error: {e}"))
}

/// Stored codes are always written from `Language::as_str`; anything else
/// maps to the default language.
fn parse_language(code: &str) -> Language {
    Language::from_code(code).unwrap_or(Language::Id)
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[async_trait]
impl ConversationStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn put_session(&self, session: Session) -> Result<()> {
        let conn = self.conn.lock().map_err(lock_err)?;
        conn.execute(
            "INSERT INTO sessions (session_id, language, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(session_id) DO UPDATE SET
                 language = excluded.language,
                 updated_at = excluded.updated_at",
            params![
                session.session_id,
                session.language.as_str(),
                session.created_at.to_rfc3339(),
                session.updated_at.to_rfc3339(),
            ],
        )
        .map_err(db_err)?;
        Ok(())
    }

    async fn get_session(&self, session_id: &str) -> Result<Option<Session>> {
        let conn = self.conn.lock().map_err(lock_err)?;
        let mut stmt = conn
            .prepare(
                "SELECT session_id, language, created_at, updated_at
                 FROM sessions WHERE session_id = ?1",
            )
            .map_err(db_err)?;

        let mut rows = stmt
            .query_map(params![session_id], |row| {
                Ok(Session {
                    session_id: row.get(0)?,
                    language: parse_language(&row.get::<_, String>(1)?),
                    created_at: parse_timestamp(&row.get::<_, String>(2)?),
                    updated_at: parse_timestamp(&row.get::<_, String>(3)?),
                })
            })
            .map_err(db_err)?;

        match rows.next() {
            Some(row) => Ok(Some(row.map_err(db_err)?)),
            None => Ok(None),
        }
    }

    async fn append_message(&self, message: NewMessage) -> Result<Message> {
        let conn = self.conn.lock().map_err(lock_err)?;
        let created_at = Utc::now();

        conn.execute(
            "INSERT INTO messages (session_id, role, content, language, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                message.session_id,
                message.role.as_str(),
                message.content,
                message.language.as_str(),
                created_at.to_rfc3339(),
            ],
        )
        .map_err(db_err)?;

        Ok(Message {
            id: conn.last_insert_rowid(),
            session_id: message.session_id,
            role: message.role,
            content: message.content,
            language: message.language,
            created_at,
        })
    }

    async fn list_messages(&self, session_id: &str) -> Result<Vec<Message>> {
        let conn = self.conn.lock().map_err(lock_err)?;
        let mut stmt = conn
            .prepare(
                "SELECT id, session_id, role, content, language, created_at
                 FROM messages WHERE session_id = ?1 ORDER BY id ASC",
            )
            .map_err(db_err)?;

        let rows = stmt
            .query_map(params![session_id], Self::row_to_message)
            .map_err(db_err)?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row.map_err(db_err)?);
        }
        Ok(messages)
    }

    async fn list_recent_messages(&self, session_id: &str, limit: usize) -> Result<Vec<Message>> {
        let conn = self.conn.lock().map_err(lock_err)?;
        let mut stmt = conn
            .prepare(
                "SELECT id, session_id, role, content, language, created_at
                 FROM messages WHERE session_id = ?1 ORDER BY id DESC LIMIT ?2",
            )
            .map_err(db_err)?;

        let rows = stmt
            .query_map(params![session_id, limit as i64], Self::row_to_message)
            .map_err(db_err)?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row.map_err(db_err)?);
        }
        messages.reverse();
        Ok(messages)
    }

    async fn health_check(&self) -> bool {
        self.conn
            .lock()
            .map(|c| c.execute_batch("SELECT 1").is_ok())
            .unwrap_or(false)
    }
}
