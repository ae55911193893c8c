use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use crate::models::{ChatRequest, ChatResponse};
use crate::prompt::PromptMessage;

/// Every way a completion call can fail.
///
/// Closed on purpose: the handler maps each kind to a status code with an
/// exhaustive match. The `String` payloads are for server logs only.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("upstream rejected the credentials: {0}")]
    Authentication(String),
    #[error("upstream denied access: {0}")]
    PermissionDenied(String),
    #[error("upstream rate limit exceeded: {0}")]
    RateLimited(String),
    #[error("upstream call timed out")]
    Timeout,
    #[error("could not connect to upstream: {0}")]
    Connection(String),
    #[error("upstream service error: {0}")]
    Service(String),
    #[error("unexpected completion failure: {0}")]
    Unexpected(String),
}

impl CompletionError {
    // Short label for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Authentication(_) => "authentication",
            Self::PermissionDenied(_) => "permission_denied",
            Self::RateLimited(_) => "rate_limited",
            Self::Timeout => "timeout",
            Self::Connection(_) => "connection",
            Self::Service(_) => "service",
            Self::Unexpected(_) => "unexpected",
        }
    }
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    // Returns the text of the first generated choice
    async fn complete(
        &self,
        messages: &[PromptMessage],
        api_key: &str,
        timeout: Duration,
    ) -> Result<String, CompletionError>;
}

// OpenAI-compatible chat completion client
pub struct OpenAiClient {
    client: reqwest::Client,
    api_base: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(client: reqwest::Client, api_base: &str, model: &str) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(
        &self,
        messages: &[PromptMessage],
        api_key: &str,
        timeout: Duration,
    ) -> Result<String, CompletionError> {
        let body = ChatRequest {
            model: &self.model,
            messages,
        };

        tracing::debug!(model = %self.model, messages = messages.len(), "Calling completion API");

        let res = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .timeout(timeout)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = res.status();
        if !status.is_success() {
            // body is logged server side only
            let detail = res.text().await.unwrap_or_default();
            return Err(map_status(status, detail));
        }

        let parsed: ChatResponse = res.json().await.map_err(map_transport_error)?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| CompletionError::Service("response contained no generated text".to_string()))
    }
}

fn map_status(status: StatusCode, detail: String) -> CompletionError {
    let detail = format!("{}: {}", status, detail);
    match status {
        StatusCode::UNAUTHORIZED => CompletionError::Authentication(detail),
        StatusCode::FORBIDDEN => CompletionError::PermissionDenied(detail),
        StatusCode::TOO_MANY_REQUESTS => CompletionError::RateLimited(detail),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => CompletionError::Timeout,
        _ => CompletionError::Service(detail),
    }
}

fn map_transport_error(e: reqwest::Error) -> CompletionError {
    if e.is_timeout() {
        CompletionError::Timeout
    } else if e.is_connect() {
        CompletionError::Connection(e.to_string())
    } else if e.is_decode() {
        CompletionError::Service(format!("undecodable response: {}", e))
    } else if e.is_builder() {
        CompletionError::Unexpected(e.to_string())
    } else {
        CompletionError::Service(e.to_string())
    }
}
