use serde::Serialize;
use crate::resources::StaticResources;

pub const SYSTEM_INSTRUCTION: &str =
    "You are an AI assistant specialized in generating PLSQL unit tests.";
pub const KNOWLEDGE_LEAD_IN: &str =
    "Here is some relevant knowledge about PLSQL standards and practices:";
pub const EXAMPLES_LEAD_IN: &str = "Here are some examples of PLSQL unit tests:";
pub const CODE_LEAD_IN: &str =
    "Generate a comprehensive PLSQL unit test suite for the following code:";
pub const CODE_TRAILER: &str = "The tests should cover normal scenarios, edge cases and error handling. Only return the unit tests, and use plain ASCII spaces for indentation.";

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

// One role-tagged chat message, serialized as-is into the completion request
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

impl PromptMessage {
    fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

/// Builds the four-message prompt: instruction, knowledge base, examples, code.
///
/// Resources are included verbatim, empty or not, so the shape never changes.
pub fn build(resources: &StaticResources, code: &str) -> Vec<PromptMessage> {
    vec![
        PromptMessage::system(SYSTEM_INSTRUCTION),
        PromptMessage::user(format!("{}\n\n{}", KNOWLEDGE_LEAD_IN, resources.knowledge_base)),
        PromptMessage::user(format!("{}\n\n{}", EXAMPLES_LEAD_IN, resources.examples)),
        PromptMessage::user(format!(
            "{}\n\n```sql\n{}\n```\n\n{}",
            CODE_LEAD_IN, code, CODE_TRAILER
        )),
    ]
}
