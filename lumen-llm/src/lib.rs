pub mod client;
mod error;
pub mod prompt;

use async_trait::async_trait;

pub use client::{LlmProvider, LlmService};
pub use error::GenerationError;
pub use prompt::{GenerationMode, ParseModeError};

/// One chat-completion call: fixed system instruction plus a user prompt.
#[derive(Clone, Debug, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn for_topic(topic: &str, mode: GenerationMode) -> Self {
        Self {
            system: prompt::system_prompt(),
            prompt: mode.user_prompt(topic),
            temperature: prompt::TEMPERATURE,
            max_tokens: prompt::MAX_TOKENS,
        }
    }
}

/// Anything that can turn a completion request into text.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GenerationError>;
}

/// Generate an explanation of `topic` in the given style. No caching, no retries.
pub async fn generate_explanation(
    generator: &dyn ContentGenerator,
    topic: &str,
    mode: GenerationMode,
) -> Result<String, GenerationError> {
    let request = CompletionRequest::for_topic(topic, mode);
    generator.complete(&request).await
}
