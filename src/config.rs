use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "plsql-testgen")]
#[command(about = "Generates PLSQL unit test suites through the OpenAI chat completion API")]
pub struct Args {
    // Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    // Port to run the server on
    #[arg(short, long, default_value_t = 5000)]
    pub port: u16,

    // Directory holding knowledge_base.txt and examples.sql
    #[arg(long, default_value = "resources")]
    pub resources_dir: PathBuf,

    // Front-end page and assets
    #[arg(long, default_value = "static")]
    pub static_dir: PathBuf,

    // Chat completion model
    #[arg(short, long, default_value = "gpt-4o-mini")]
    pub model: String,

    // Completion API base url
    #[arg(long, default_value = "https://api.openai.com/v1")]
    pub api_base: String,

    // Upstream timeout in seconds
    #[arg(short, long, default_value_t = 30)]
    pub timeout: u64,

    // Rate limit max requests per window
    #[arg(long, default_value_t = 10)]
    pub rate_limit: usize,

    // Rate limit window in seconds
    #[arg(long, default_value_t = 300)]
    pub rate_window: u64,

    // Max accepted code length in characters
    #[arg(long, default_value_t = 50_000)]
    pub max_code_len: usize,

    // Development mode: no Content-Security-Policy header
    #[arg(long)]
    pub debug: bool,

    // JSON log lines instead of pretty output
    #[arg(long)]
    pub json_logs: bool,
}

impl Args {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn rate_window(&self) -> Duration {
        Duration::from_secs(self.rate_window)
    }
}

/// Where the completion API key comes from.
///
/// The key is looked up on every request so the server starts without one.
#[derive(Debug, Clone)]
pub enum ApiKeySource {
    Env(String),
    #[cfg(test)]
    Fixed(Option<String>),
}

impl ApiKeySource {
    pub const DEFAULT_VAR: &'static str = "OPENAI_API_KEY";

    pub fn from_default_env() -> Self {
        Self::Env(Self::DEFAULT_VAR.to_string())
    }

    pub fn variable(&self) -> &str {
        match self {
            Self::Env(var) => var,
            #[cfg(test)]
            Self::Fixed(_) => Self::DEFAULT_VAR,
        }
    }

    // Empty values count as missing
    pub fn resolve(&self) -> Option<String> {
        let key = match self {
            Self::Env(var) => std::env::var(var).ok(),
            #[cfg(test)]
            Self::Fixed(key) => key.clone(),
        };
        key.filter(|k| !k.trim().is_empty())
    }
}
