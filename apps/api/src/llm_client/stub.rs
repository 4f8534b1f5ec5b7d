use async_trait::async_trait;
use serde_json::{json, Value};

use super::{CompletionService, LlmError};

/// Canned completion service for tests that must not touch the network.
#[derive(Debug, Clone)]
pub enum StubCompletion {
    /// Replies with this text as the completion content.
    Reply(String),
    /// Fails as if no credential were configured.
    Unconfigured,
    /// Fails with a provider error carrying this status and message.
    Fail { status: u16, message: String },
}

impl StubCompletion {
    pub fn reply(text: &str) -> Self {
        StubCompletion::Reply(text.to_string())
    }

    pub fn rate_limited() -> Self {
        StubCompletion::Fail {
            status: 429,
            message: "rate_limit_exceeded".to_string(),
        }
    }

    fn outcome(&self) -> Result<String, LlmError> {
        match self {
            StubCompletion::Reply(text) => Ok(text.clone()),
            StubCompletion::Unconfigured => Err(LlmError::Configuration),
            StubCompletion::Fail { status, message } => Err(LlmError::Transport {
                status: *status,
                message: message.clone(),
            }),
        }
    }
}

#[async_trait]
impl CompletionService for StubCompletion {
    async fn complete(&self, _prompt: &str, _max_tokens: u32) -> Result<String, LlmError> {
        self.outcome()
    }

    async fn list_models(&self) -> Result<Value, LlmError> {
        self.outcome()
            .map(|_| json!({ "object": "list", "data": [{ "id": super::MODEL }] }))
    }
}
