mod completion;
mod config;
mod error;
mod handlers;
mod metrics;
mod models;
mod prompt;
mod rate_limit;
mod resources;
mod router;
mod security;
mod state;
mod telemetry;

use anyhow::Context;
use clap::Parser; // for cli
use std::net::SocketAddr;
use std::sync::Arc;
use crate::completion::OpenAiClient;
use crate::config::{ApiKeySource, Args};
use crate::rate_limit::SlidingWindowLimiter;
use crate::resources::StaticResources;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // parse cli arguments
    let args = Args::parse();
    telemetry::init(args.json_logs);

    let resources = StaticResources::load(&args.resources_dir);

    let http_client = reqwest::Client::builder()
        .build()
        .context("failed to build HTTP client")?;

    // creating shared state
    let state = Arc::new(AppState {
        resources,
        rate_limiter: Arc::new(SlidingWindowLimiter::new(args.rate_limit, args.rate_window())),
        completion: Arc::new(OpenAiClient::new(http_client, &args.api_base, &args.model)),
        api_key: ApiKeySource::from_default_env(),
        timeout: args.upstream_timeout(),
        max_code_len: args.max_code_len,
    });

    let app = router::build(state, &args.static_dir, args.debug);

    let addr = args.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!(address = %addr, "Test generator running");
    tracing::info!(model = %args.model, api_base = %args.api_base, timeout_secs = args.timeout, "Completion API");
    tracing::info!(
        limit = args.rate_limit,
        window_secs = args.rate_window,
        "Rate limit per client"
    );
    if args.debug {
        tracing::warn!("Debug mode: Content-Security-Policy header disabled");
    }

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .context("server error")?;

    Ok(())
}
