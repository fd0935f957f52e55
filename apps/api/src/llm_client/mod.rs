//! AI Gateway client, the single point of entry for all text-generation calls.
//!
//! ARCHITECTURAL RULE: No other module may call the AI endpoint directly.
//! All AI interactions MUST go through an `AiGateway`.
//!
//! One synchronous round trip per call: no retry and no timeout beyond the
//! transport default. Callers own the fallback policy.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

/// Sampling temperature for scoring an existing job description.
pub const ANALYSIS_TEMPERATURE: f32 = 0.3;
/// Sampling temperature for generating a new job description.
pub const GENERATION_TEMPERATURE: f32 = 0.5;
pub const DEFAULT_MAX_TOKENS: u32 = 3000;

const API_KEY_HEADER: &str = "x-api-key";
const DEFAULT_FAILURE_MESSAGE: &str = "AI API request failed";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("AI gateway returned an empty reply")]
    EmptyReply,
}

/// Outbound `/chat` body. Serialized with the gateway's camelCase field names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    pub system_prompt: &'a str,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl<'a> ChatRequest<'a> {
    pub fn new(message: &'a str, system_prompt: &'a str, temperature: f32) -> Self {
        Self {
            message,
            system_prompt,
            temperature,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// `{success, message, error?}` response envelope.
#[derive(Debug, Deserialize)]
struct ChatEnvelope {
    #[serde(default)]
    success: bool,
    message: Option<String>,
    error: Option<String>,
}

/// The gateway trait. Implement this to swap transports without touching the
/// orchestrator or handlers.
///
/// Carried in `AppState` as `Arc<dyn AiGateway>`.
#[async_trait]
pub trait AiGateway: Send + Sync {
    /// Returns the raw text reply.
    async fn chat(&self, request: ChatRequest<'_>) -> Result<String, GatewayError>;
}

/// HTTP gateway posting to `{base_url}/chat` with an API-key header.
#[derive(Clone)]
pub struct HttpAiGateway {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl HttpAiGateway {
    pub fn new(base_url: &str, api_key: String) -> Result<Self, GatewayError> {
        Ok(Self {
            client: Client::builder()
                .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
                .build()?,
            endpoint: format!("{}/chat", base_url.trim_end_matches('/')),
            api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AiGateway for HttpAiGateway {
    async fn chat(&self, request: ChatRequest<'_>) -> Result<String, GatewayError> {
        debug!(
            "AI call: message_len={}, system_len={}, temperature={}, max_tokens={}",
            request.message.len(),
            request.system_prompt.len(),
            request.temperature,
            request.max_tokens
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let envelope: ChatEnvelope = response.json().await?;

        // The envelope decides success, not the HTTP status.
        if !envelope.success {
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message: envelope
                    .error
                    .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string()),
            });
        }

        let reply = envelope
            .message
            .filter(|m| !m.trim().is_empty())
            .ok_or(GatewayError::EmptyReply)?;

        debug!("AI call succeeded: reply_len={}", reply.len());
        Ok(reply)
    }
}
