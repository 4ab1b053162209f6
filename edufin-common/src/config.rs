//! Configuration types and loading for the EduFin chat service.
//!
//! Configuration is read from `~/.edufin/config.json` with environment
//! variable overrides applied on top. Every field carries a default so an
//! empty or missing file yields a runnable local configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the configuration directory (`~/.edufin`).
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".edufin"),
        |dirs| dirs.home_dir().join(".edufin"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

// ============================================================================
// Server
// ============================================================================

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address.
    /// Default: "127.0.0.1" (conservative, local only)
    /// Set to "0.0.0.0" for remote access
    #[serde(default = "default_bind_address")]
    pub bind: String,

    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind_address(),
            port: default_port(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    4600
}

// ============================================================================
// Completion Provider
// ============================================================================

/// Completion provider (LLM backend) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key. Falls back to the `GROQ_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible chat completions API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum tokens per completion.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Request timeout in seconds. Expiry surfaces as an upstream error.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.groq.com/openai".into()
}

fn default_model() -> String {
    "llama-3.3-70b-versatile".into()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f64 {
    0.3
}

fn default_timeout_secs() -> u64 {
    60
}

// ============================================================================
// Storage
// ============================================================================

/// Conversation store backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Volatile in-memory store (reference behavior, no persistence)
    Memory,
    /// SQLite-backed store, persists across restarts
    Sqlite,
}

/// Conversation storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Which backend to use.
    #[serde(default = "default_backend")]
    pub backend: StorageBackend,

    /// Database path for the sqlite backend.
    /// Default: `~/.edufin/chat.db`
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            db_path: None,
        }
    }
}

impl StorageConfig {
    /// Resolve the sqlite database path.
    pub fn resolved_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| config_dir().join("chat.db"))
    }
}

fn default_backend() -> StorageBackend {
    StorageBackend::Memory
}

// ============================================================================
// Chat
// ============================================================================

/// Conversation behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Number of recent messages fetched per turn for LLM context.
    /// The just-recorded user turn is dropped from this slice, so the
    /// provider sees at most `history_window - 1` prior messages.
    #[serde(default = "default_history_window")]
    pub history_window: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
        }
    }
}

fn default_history_window() -> usize {
    20
}

// ============================================================================
// Observability
// ============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Base log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Output format: "json" for structured JSON, "pretty" for human-readable.
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

// ============================================================================
// Top-level Config
// ============================================================================

/// Complete service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Completion provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Conversation storage settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Conversation behavior settings
    #[serde(default)]
    pub chat: ChatConfig,

    /// Logging settings
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// A missing file is not an error; defaults are used.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            tracing::info!("Config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Load configuration with environment variable overrides.
    pub fn load_with_env() -> Result<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(bind) = std::env::var("EDUFIN_BIND_ADDRESS") {
            self.server.bind = bind;
        }
        if let Ok(port) = std::env::var("EDUFIN_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }

        // Provider overrides; GROQ_API_KEY matches the provider's own convention
        if let Ok(key) = std::env::var("GROQ_API_KEY") {
            self.provider.api_key = Some(key);
        }
        if let Ok(url) = std::env::var("EDUFIN_PROVIDER_URL") {
            self.provider.base_url = url;
        }
        if let Ok(model) = std::env::var("EDUFIN_MODEL") {
            self.provider.model = model;
        }

        if let Ok(path) = std::env::var("EDUFIN_DB_PATH") {
            self.storage.backend = StorageBackend::Sqlite;
            self.storage.db_path = Some(PathBuf::from(path));
        }

        if let Ok(level) = std::env::var("EDUFIN_LOG_LEVEL") {
            self.observability.log_level = level;
        }
        if let Ok(format) = std::env::var("EDUFIN_LOG_FORMAT") {
            self.observability.log_format = format;
        }
    }
}
