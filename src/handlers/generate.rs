use axum::{
    Json,
    body::Bytes,
    extract::{ConnectInfo, State, rejection::BytesRejection},
    http::{HeaderMap, StatusCode},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use crate::completion::CompletionError;
use crate::error::ApiError;
use crate::metrics::{GENERATION_LATENCY, RATE_LIMITED_TOTAL, REQUEST_TOTAL, UPSTREAM_ERRORS};
use crate::models::{GenerateRequest, GenerateResponse};
use crate::prompt;
use crate::state::AppState;

// Proxy headers first, then the socket peer
fn client_id(headers: &HeaderMap, peer: SocketAddr) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    header("x-real-ip")
        .or_else(|| header("x-forwarded-for"))
        .unwrap_or_else(|| peer.ip().to_string())
}

// Input checks in order: JSON, presence, blank, length
fn extract_code(body: &[u8], max_len: usize) -> Result<String, ApiError> {
    let req: GenerateRequest = serde_json::from_slice(body).map_err(|_| ApiError::InvalidJson)?;

    let code = match req.code {
        Some(code) if !code.is_empty() => code,
        _ => return Err(ApiError::MissingCode),
    };

    if code.trim().is_empty() {
        return Err(ApiError::BlankCode);
    }

    let len = code.chars().count();
    if len > max_len {
        return Err(ApiError::CodeTooLong { len, max: max_len });
    }

    Ok(code)
}

pub async fn generate_handler(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    REQUEST_TOTAL.inc();

    let client = client_id(&headers, peer);
    if !state.rate_limiter.check_and_record(&client) {
        RATE_LIMITED_TOTAL.inc();
        return Err(ApiError::RateLimited(client));
    }

    // body limit rejections surface here, after the rate limit check
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::BodyTooLarge { max: state.max_code_len }
        } else {
            ApiError::InvalidJson
        }
    })?;

    let code = extract_code(&body, state.max_code_len)?;

    let api_key = state
        .api_key
        .resolve()
        .ok_or_else(|| ApiError::MissingApiKey(state.api_key.variable().to_string()))?;

    let messages = prompt::build(&state.resources, &code);
    tracing::info!(client = %client, code_chars = code.chars().count(), "Generating tests");

    let start_time = Instant::now();

    // outer bound holds even if a client ignores its own timeout
    let result = tokio::time::timeout(
        state.timeout,
        state.completion.complete(&messages, &api_key, state.timeout),
    )
    .await
    .unwrap_or(Err(CompletionError::Timeout));

    GENERATION_LATENCY.observe(start_time.elapsed().as_secs_f64());

    match result {
        Ok(test) => {
            tracing::info!(client = %client, elapsed_ms = start_time.elapsed().as_millis() as u64, "Tests generated");
            Ok(Json(GenerateResponse { test }))
        }
        Err(e) => {
            UPSTREAM_ERRORS.with_label_values(&[e.kind()]).inc();
            Err(ApiError::Upstream(e))
        }
    }
}
