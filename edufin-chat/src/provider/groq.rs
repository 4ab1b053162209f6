//! Groq provider implementation (OpenAI-compatible chat completions).

use super::{CompletionProvider, CompletionRequest};
use crate::types::PromptMessage;
use async_trait::async_trait;
use edufin_common::{Error, ProviderConfig, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Groq API provider.
pub struct GroqProvider {
    client: reqwest::Client,
    base_url: String,
}

impl GroqProvider {
    /// Create a provider from configuration.
    ///
    /// The request timeout is applied at the client level; expiry surfaces
    /// as an upstream error with no status code.
    pub fn new(config: &ProviderConfig) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(ref api_key) = config.api_key {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", api_key))
                    .unwrap_or_else(|_| HeaderValue::from_static("")),
            );
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl CompletionProvider for GroqProvider {
    fn name(&self) -> &str {
        "groq"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        let start = Instant::now();
        let url = format!("{}/v1/chat/completions", self.base_url);

        let groq_request = GroqRequest {
            model: request.model,
            messages: request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&groq_request)
            .send()
            .await
            .map_err(|e| Error::Upstream {
                status: None,
                message: format!("Request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream {
                status: Some(status.as_u16()),
                message: format!("API error: {body}"),
            });
        }

        let groq_response: GroqResponse = response
            .json()
            .await
            .map_err(|e| Error::UpstreamFormat(format!("Failed to parse response: {e}")))?;

        let content = groq_response
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| Error::UpstreamFormat("response contained no choices".into()))?;

        tracing::debug!(
            provider = "groq",
            latency_ms = start.elapsed().as_millis() as u64,
            "Completion received"
        );

        Ok(content)
    }
}

// ============================================================================
// Groq API Types
// ============================================================================

#[derive(Debug, Serialize)]
struct GroqRequest {
    model: String,
    messages: Vec<PromptMessage>,
    max_tokens: u32,
    temperature: f64,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GroqResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}
