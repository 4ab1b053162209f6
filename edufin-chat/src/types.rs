//! Domain types for sessions, messages, and prompt payloads.

use chrono::{DateTime, Utc};
use edufin_common::Error;
use serde::{Deserialize, Serialize};

/// Maximum length of a user message, in characters, after trimming.
pub const MAX_USER_MESSAGE_CHARS: usize = 1000;

/// Supported interface languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Indonesian (default)
    Id,
    /// English
    En,
    /// Chinese
    Zh,
}

impl Language {
    /// Wire code for this language.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::En => "en",
            Self::Zh => "zh",
        }
    }

    /// Parse a wire code. Unknown codes are a validation failure at the
    /// HTTP boundary, not a silent fallback.
    pub fn from_code(code: &str) -> Result<Self, Error> {
        match code {
            "id" => Ok(Self::Id),
            "en" => Ok(Self::En),
            "zh" => Ok(Self::Zh),
            other => Err(Error::Validation(format!(
                "unsupported language code '{other}' (expected id, en, or zh)"
            ))),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message role in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// User message
    User,
    /// Assistant (AI) response
    Assistant,
}

impl MessageRole {
    /// Convert to string representation for storage and provider payloads.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    /// Parse from storage representation.
    pub fn parse(s: &str) -> Self {
        match s {
            "assistant" => Self::Assistant,
            _ => Self::User,
        }
    }
}

/// A chat session: one continuous conversation identified by an opaque
/// client-generated token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Opaque unique session token
    pub session_id: String,
    /// Current interface language; mutable, switched in place
    pub language: Language,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last update time (bumped on language switch)
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session with the given language.
    pub fn new(session_id: impl Into<String>, language: Language) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            language,
            created_at: now,
            updated_at: now,
        }
    }

    /// Switch the session language in place, bumping `updated_at`.
    pub fn switch_language(&mut self, language: Language) {
        self.language = language;
        self.updated_at = Utc::now();
    }
}

/// A persisted conversation message. Append-only; never mutated after
/// creation. Ids are store-assigned and strictly increasing, so id order
/// equals chronological order within a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Store-assigned monotonic id
    pub id: i64,
    /// Owning session token
    pub session_id: String,
    /// user or assistant
    pub role: MessageRole,
    /// Message text
    pub content: String,
    /// Language the turn was submitted in
    pub language: Language,
    /// Creation time (store-assigned)
    pub created_at: DateTime<Utc>,
}

/// A message to append; the store assigns `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub session_id: String,
    pub role: MessageRole,
    pub content: String,
    pub language: Language,
}

/// A role-tagged message in a completion request payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: String,
    pub content: String,
}

impl PromptMessage {
    /// System instruction entry.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    /// User turn entry.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

impl From<&Message> for PromptMessage {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role.as_str().into(),
            content: message.content.clone(),
        }
    }
}
