//! EduFin Chat - multilingual financial-education chat service.
//!
//! An HTTP service that collects user questions about Indonesian financial
//! services, forwards them to an LLM completion provider, and persists
//! conversation history per session.
//!
//! ## Architecture
//!
//! ```text
//! HTTP → routes → ChatService → ConversationManager → ConversationStore
//!                      ↓
//!               CompletionGateway → CompletionProvider (Groq)
//! ```
//!
//! The store and the provider are injected capabilities; everything between
//! them is deterministic conversation logic.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod conversation;
pub mod gateway;
pub mod prompts;
pub mod provider;
pub mod routes;
pub mod service;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use conversation::ConversationManager;
pub use gateway::CompletionGateway;
pub use provider::{CompletionProvider, CompletionRequest, GroqProvider};
pub use routes::{build_router, AppState, ChatTurnRequest, ChatTurnResponse, SessionInitRequest};
pub use service::ChatService;
pub use store::{ConversationStore, MemoryStore, SqliteStore};
pub use types::{Language, Message, MessageRole, NewMessage, PromptMessage, Session};

use edufin_common::{Config, StorageBackend};
use std::net::SocketAddr;
use std::sync::Arc;

/// Build application state from configuration with an injected provider.
pub fn create_state(
    config: &Config,
    provider: Arc<dyn CompletionProvider>,
) -> edufin_common::Result<AppState> {
    let store: Arc<dyn ConversationStore> = match config.storage.backend {
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
        StorageBackend::Sqlite => Arc::new(SqliteStore::new(&config.storage.resolved_db_path())?),
    };
    tracing::info!(backend = store.name(), "Conversation store ready");

    let service = ChatService::new(
        ConversationManager::new(store),
        CompletionGateway::new(provider, &config.provider),
        config.chat.history_window,
    );

    Ok(AppState {
        service: Arc::new(service),
    })
}

/// Start the HTTP server.
pub async fn start_server(config: &Config) -> anyhow::Result<()> {
    let addr = SocketAddr::from((
        config.server.bind.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    let provider = Arc::new(GroqProvider::new(&config.provider));
    let state = create_state(config, provider)?;
    let router = build_router(state);

    tracing::info!("Starting EduFin Chat on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
