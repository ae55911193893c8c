use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use crate::completion::CompletionError;
use crate::models::ErrorBody;

// Everything that can end a /generate request early
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid JSON body")]
    InvalidJson,
    #[error("no code provided")]
    MissingCode,
    #[error("code is blank")]
    BlankCode,
    #[error("code has {len} characters, limit is {max}")]
    CodeTooLong { len: usize, max: usize },
    #[error("request body over the size limit, code limit is {max}")]
    BodyTooLarge { max: usize },
    #[error("local rate limit exceeded for {0}")]
    RateLimited(String),
    #[error("API key variable {0} is not set")]
    MissingApiKey(String),
    #[error(transparent)]
    Upstream(#[from] CompletionError),
}

impl ApiError {
    // Status code and the message the caller is allowed to see
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::InvalidJson => (StatusCode::BAD_REQUEST, "Invalid JSON data".to_string()),
            Self::MissingCode => (StatusCode::BAD_REQUEST, "No PLSQL code provided".to_string()),
            Self::BlankCode => (StatusCode::BAD_REQUEST, "Please provide valid PLSQL code".to_string()),
            Self::CodeTooLong { max, .. } | Self::BodyTooLarge { max } => (
                StatusCode::BAD_REQUEST,
                format!("Code too long. Please limit to {} characters.", group_thousands(*max)),
            ),
            Self::RateLimited(_) => (
                StatusCode::TOO_MANY_REQUESTS,
                "Rate limit exceeded. Please try again in a few minutes.".to_string(),
            ),
            Self::MissingApiKey(var) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("OpenAI API key not configured. Set the {} environment variable.", var),
            ),
            Self::Upstream(e) => upstream_status_and_message(e),
        }
    }
}

fn upstream_status_and_message(e: &CompletionError) -> (StatusCode, String) {
    let (status, msg) = match e {
        CompletionError::Authentication(_) => (
            StatusCode::UNAUTHORIZED,
            "Invalid OpenAI API key. Please check your API key configuration.",
        ),
        CompletionError::PermissionDenied(_) => (
            StatusCode::FORBIDDEN,
            "OpenAI API access denied. Check your API key permissions.",
        ),
        CompletionError::RateLimited(_) => (
            StatusCode::TOO_MANY_REQUESTS,
            "OpenAI API rate limit exceeded. Please try again later.",
        ),
        CompletionError::Timeout => (
            StatusCode::REQUEST_TIMEOUT,
            "Request timed out. Please try again.",
        ),
        CompletionError::Connection(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "Connection error. Could not reach the AI service.",
        ),
        CompletionError::Service(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "AI service error. Please try again later.",
        ),
        CompletionError::Unexpected(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "An unexpected error occurred.",
        ),
    };
    (status, msg.to_string())
}

// 50000 -> "50,000"
fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::MissingApiKey(_) => tracing::error!(error = %self, "Configuration error"),
            Self::RateLimited(_) => tracing::warn!(error = %self, "Request rejected"),
            Self::Upstream(CompletionError::Unexpected(_)) => {
                tracing::error!(error = %self, "Unexpected error while generating tests")
            }
            Self::Upstream(e) => tracing::warn!(kind = e.kind(), error = %self, "Completion call failed"),
            _ => tracing::debug!(error = %self, "Rejected invalid input"),
        }

        let (status, error) = self.status_and_message();
        (status, Json(ErrorBody { error })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_errors_are_bad_request() {
        for e in [
            ApiError::InvalidJson,
            ApiError::MissingCode,
            ApiError::BlankCode,
            ApiError::CodeTooLong { len: 50_001, max: 50_000 },
            ApiError::BodyTooLarge { max: 50_000 },
        ] {
            assert_eq!(e.status_and_message().0, StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn too_long_message_groups_digits() {
        let (_, msg) = ApiError::CodeTooLong { len: 50_001, max: 50_000 }.status_and_message();
        assert_eq!(msg, "Code too long. Please limit to 50,000 characters.");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn upstream_kinds_map_to_statuses() {
        let cases = [
            (CompletionError::Authentication("x".into()), StatusCode::UNAUTHORIZED),
            (CompletionError::PermissionDenied("x".into()), StatusCode::FORBIDDEN),
            (CompletionError::RateLimited("x".into()), StatusCode::TOO_MANY_REQUESTS),
            (CompletionError::Timeout, StatusCode::REQUEST_TIMEOUT),
            (CompletionError::Connection("x".into()), StatusCode::SERVICE_UNAVAILABLE),
            (CompletionError::Service("x".into()), StatusCode::SERVICE_UNAVAILABLE),
            (CompletionError::Unexpected("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (e, status) in cases {
            assert_eq!(ApiError::from(e).status_and_message().0, status);
        }
    }

    #[test]
    fn upstream_detail_never_reaches_the_caller() {
        let e = ApiError::from(CompletionError::Authentication("sk-live-abc123 invalid".into()));
        let (_, msg) = e.status_and_message();
        assert!(!msg.contains("sk-live"));
    }

    #[test]
    fn missing_key_is_a_server_error() {
        let (status, msg) = ApiError::MissingApiKey("OPENAI_API_KEY".into()).status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(msg.contains("OPENAI_API_KEY"));
    }
}
