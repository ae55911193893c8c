use serde::{Deserialize, Serialize};
use crate::prompt::PromptMessage;

// POST /generate body; code stays optional so a missing field is our 400, not serde's
#[derive(Deserialize, Debug)]
pub struct GenerateRequest {
    #[serde(default)]
    pub code: Option<String>,
}

// POST /generate success body
#[derive(Serialize, Debug)]
pub struct GenerateResponse {
    pub test: String,
}

// Every error response body
#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub error: String,
}

// Chat completion API request format
#[derive(Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [PromptMessage],
}

// Chat completion API response format (only what we read)
#[derive(Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

#[derive(Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub content: Option<String>,
}
