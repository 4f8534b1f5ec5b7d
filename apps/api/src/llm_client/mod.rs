/// LLM Client — the single point of entry for all Groq API calls.
///
/// ARCHITECTURAL RULE: No other module may call the completion provider directly.
/// Everything goes through `CompletionService`, implemented here by `GroqClient`.
///
/// Model: llama-3.1-8b-instant (hardcoded, not configurable)
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::diagnostics::{Diagnostic, DiagnosticSink};

pub mod prompts;
#[cfg(test)]
pub mod stub;

/// The model used for every completion call.
pub const MODEL: &str = "llama-3.1-8b-instant";
const TEMPERATURE: f32 = 0.7;
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Provider messages containing any of these mean the caller should back off.
const RATE_LIMIT_MARKERS: &[&str] = &["rate_limit_exceeded", "tokens per minute"];

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("GROQ_API_KEY not found in environment variables")]
    Configuration,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Transport { status: u16, message: String },

    #[error("No response generated")]
    EmptyResponse,
}

impl LlmError {
    /// True when the provider's error message reports a rate limit. The status
    /// code alone is not enough.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            LlmError::Transport { message, .. } => {
                RATE_LIMIT_MARKERS.iter().any(|m| message.contains(m))
            }
            _ => false,
        }
    }
}

/// Seam between the analysis pipeline and the completion provider.
///
/// Carried in `AppState` as `Arc<dyn CompletionService>`.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Returns the raw text of the model's single completion choice.
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, LlmError>;

    /// Returns the provider's model listing, untouched.
    async fn list_models(&self) -> Result<Value, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl ChatResponse {
    /// Content of the first choice, if the provider produced one.
    fn into_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
    }
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: Option<String>,
}

/// OpenAI-compatible chat-completions client for Groq.
///
/// No retries: a failed call is reported once and the caller decides what to do.
#[derive(Clone)]
pub struct GroqClient {
    client: Client,
    api_key: Option<String>,
    api_base: String,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl GroqClient {
    pub fn new(
        api_key: Option<String>,
        api_base: impl Into<String>,
        diagnostics: Arc<dyn DiagnosticSink>,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            api_key,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            diagnostics,
        })
    }

    fn api_key(&self) -> Result<&str, LlmError> {
        self.api_key.as_deref().ok_or(LlmError::Configuration)
    }

    /// Sends a prepared request, converting non-2xx replies into `LlmError::Transport`.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, LlmError> {
        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                self.diagnostics.record(Diagnostic::TransportFailure {
                    status: None,
                    detail: &e.to_string(),
                });
                return Err(LlmError::Http(e));
            }
        };

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            self.diagnostics.record(Diagnostic::TransportFailure {
                status: Some(status.as_u16()),
                detail: &body,
            });
            let message = serde_json::from_str::<ProviderError>(&body)
                .ok()
                .and_then(|e| e.error.message)
                .unwrap_or_else(|| format!("API request failed: {}", status.as_u16()));
            return Err(LlmError::Transport {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl CompletionService for GroqClient {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, LlmError> {
        let api_key = self.api_key()?;

        let request_body = ChatRequest {
            model: MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
            max_tokens,
        };

        let body = self
            .send(
                self.client
                    .post(format!("{}/chat/completions", self.api_base))
                    .bearer_auth(api_key)
                    .json(&request_body),
            )
            .await?;

        let text = serde_json::from_str::<ChatResponse>(&body)
            .ok()
            .and_then(ChatResponse::into_text)
            .ok_or(LlmError::EmptyResponse)?;

        debug!("Groq completion succeeded: {} chars", text.len());
        Ok(text)
    }

    async fn list_models(&self) -> Result<Value, LlmError> {
        let api_key = self.api_key()?;

        let body = self
            .send(
                self.client
                    .get(format!("{}/models", self.api_base))
                    .bearer_auth(api_key),
            )
            .await?;

        serde_json::from_str(&body).map_err(|_| LlmError::EmptyResponse)
    }
}
