//! Completion provider capability.
//!
//! The LLM collaborator is an opaque text-completion service: one awaited
//! call over role-tagged messages returning a single completion. No retry
//! is performed here; a failed call surfaces as a typed upstream error.

mod groq;

pub use groq::GroqProvider;

use crate::types::PromptMessage;
use async_trait::async_trait;
use edufin_common::Result;

/// A chat completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Model identifier
    pub model: String,
    /// System instruction, prior turns, and the new user turn, in order
    pub messages: Vec<PromptMessage>,
    /// Maximum tokens for the completion
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f64,
}

/// Trait for completion provider backends.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider name (e.g., "groq").
    fn name(&self) -> &str;

    /// Generate a single text completion for the request.
    async fn complete(&self, request: CompletionRequest) -> Result<String>;
}
