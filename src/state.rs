use std::sync::Arc;
use std::time::Duration;
use crate::completion::CompletionClient;
use crate::config::ApiKeySource;
use crate::rate_limit::RequestLimiter;
use crate::resources::StaticResources;
// app's shared state

pub struct AppState {
    pub resources: StaticResources,              // read-only after startup
    pub rate_limiter: Arc<dyn RequestLimiter>,   // only mutable shared state
    pub completion: Arc<dyn CompletionClient>,
    pub api_key: ApiKeySource,
    pub timeout: Duration,                       // upstream call budget
    pub max_code_len: usize,                     // in characters
}
