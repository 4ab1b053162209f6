//! Completion gateway: prompt assembly and provider invocation.

use crate::prompts::system_prompt;
use crate::provider::{CompletionProvider, CompletionRequest};
use crate::types::{Language, Message, PromptMessage};
use edufin_common::{ProviderConfig, Result};
use std::sync::Arc;

/// Builds the completion payload and invokes the provider.
///
/// Payload order is fixed: system instruction first, then prior turns in
/// chronological order, then the new user message last. The system
/// instruction comes from the fixed per-language mapping and cannot be
/// supplied by callers.
pub struct CompletionGateway {
    provider: Arc<dyn CompletionProvider>,
    model: String,
    max_tokens: u32,
    temperature: f64,
}

impl CompletionGateway {
    /// Create a gateway over the given provider.
    pub fn new(provider: Arc<dyn CompletionProvider>, config: &ProviderConfig) -> Self {
        Self {
            provider,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    /// Generate a completion for the new user message, grounded in the
    /// prior history. Awaited; no internal retry.
    pub async fn complete(
        &self,
        language: Language,
        history: &[Message],
        user_message: &str,
    ) -> Result<String> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(PromptMessage::system(system_prompt(language)));
        messages.extend(history.iter().map(PromptMessage::from));
        messages.push(PromptMessage::user(user_message));

        tracing::debug!(
            provider = self.provider.name(),
            model = %self.model,
            language = %language,
            history_len = history.len(),
            "Requesting completion"
        );

        self.provider
            .complete(CompletionRequest {
                model: self.model.clone(),
                messages,
                max_tokens: self.max_tokens,
                temperature: self.temperature,
            })
            .await
    }
}
