use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;
use crate::handlers::{generate_handler, health_handler, metrics_handler};
use crate::security::{SecurityHeaders, security_headers};
use crate::state::AppState;

// Explicit routes win; everything else falls through to the static directory
pub fn build(state: Arc<AppState>, static_dir: &Path, debug: bool) -> Router {
    Router::new()
        .route("/generate", post(generate_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .fallback_service(ServeDir::new(static_dir))
        .with_state(state)
        .layer(middleware::from_fn_with_state(
            SecurityHeaders { debug },
            security_headers,
        ))
}
