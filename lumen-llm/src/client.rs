use std::str::FromStr;

use async_trait::async_trait;
use lumen_utils::env::{env_bool, env_string, env_string_or, env_u64};
use ollama_rs::{
    Ollama,
    generation::chat::{ChatMessage, request::ChatMessageRequest},
    models::ModelOptions,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{CompletionRequest, ContentGenerator, GenerationError};

pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";
const DEFAULT_OLLAMA_MODEL: &str = "llama3.3";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LlmProvider {
    /// OpenAI-compatible chat completions endpoint (Groq by default).
    Groq,
    Ollama,
}

impl FromStr for LlmProvider {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "groq" | "openai" => Ok(LlmProvider::Groq),
            "ollama" => Ok(LlmProvider::Ollama),
            other => anyhow::bail!("unsupported LLM_PROVIDER `{other}` (expected groq or ollama)"),
        }
    }
}

#[derive(Clone, Debug)]
enum Backend {
    Groq {
        http: reqwest::Client,
        base_url: String,
        api_key: String,
    },
    Ollama(Ollama),
}

/// Process-lifetime chat-completion client.
#[derive(Clone, Debug)]
pub struct LlmService {
    backend: Backend,
    model: String,
}

impl LlmService {
    /// Build from the environment, or `None` when generation is disabled or the
    /// selected provider has no credentials.
    pub fn from_env_optional() -> anyhow::Result<Option<Self>> {
        if !env_bool("LLM_ENABLED", true) {
            return Ok(None);
        }

        let provider: LlmProvider = env_string_or("LLM_PROVIDER", "groq").parse()?;
        match provider {
            LlmProvider::Groq => {
                let Some(api_key) = env_string("GROQ_API_KEY") else {
                    return Ok(None);
                };
                let base_url = env_string_or("GROQ_BASE_URL", DEFAULT_GROQ_BASE_URL);
                let model = env_string_or("LLM_MODEL", DEFAULT_GROQ_MODEL);
                Ok(Some(Self::groq(base_url, api_key, model)))
            }
            LlmProvider::Ollama => {
                let host = env_string_or("OLLAMA_HOST", "http://127.0.0.1");
                let port = u16::try_from(env_u64("OLLAMA_PORT", 11434)).unwrap_or(11434);
                let model = env_string_or("OLLAMA_MODEL", DEFAULT_OLLAMA_MODEL);
                Ok(Some(Self::ollama(host, port, model)))
            }
        }
    }

    pub fn groq(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            backend: Backend::Groq {
                http: reqwest::Client::new(),
                base_url: base_url.into(),
                api_key: api_key.into(),
            },
            model: model.into(),
        }
    }

    pub fn ollama(host: impl Into<String>, port: u16, model: impl Into<String>) -> Self {
        Self {
            backend: Backend::Ollama(Ollama::new(host.into(), port)),
            model: model.into(),
        }
    }

    pub fn provider(&self) -> LlmProvider {
        match self.backend {
            Backend::Groq { .. } => LlmProvider::Groq,
            Backend::Ollama(_) => LlmProvider::Ollama,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn complete_openai(
        &self,
        http: &reqwest::Client,
        base_url: &str,
        api_key: &str,
        request: &CompletionRequest,
    ) -> Result<String, GenerationError> {
        let url = format!("{}/chat/completions", base_url.trim_end_matches('/'));
        let payload = ChatRequest::new(&self.model, request);

        let response = http
            .post(url)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                message: provider_error_message(&body),
            });
        }

        let body: ChatResponse = response.json().await?;
        extract_content(body)
    }

    async fn complete_ollama(
        &self,
        client: &Ollama,
        request: &CompletionRequest,
    ) -> Result<String, GenerationError> {
        let messages = vec![
            ChatMessage::system(request.system.clone()),
            ChatMessage::user(request.prompt.clone()),
        ];
        let chat = ChatMessageRequest::new(self.model.clone(), messages).options(
            ModelOptions::default()
                .temperature(request.temperature as f32)
                .num_predict(i32::try_from(request.max_tokens).unwrap_or(i32::MAX)),
        );

        let response = client
            .send_chat_messages(chat)
            .await
            .map_err(|e| GenerationError::Provider(e.to_string()))?;

        if response.message.content.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        Ok(response.message.content)
    }
}

#[async_trait]
impl ContentGenerator for LlmService {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GenerationError> {
        debug!(
            provider = ?self.provider(),
            model = %self.model,
            prompt_len = request.prompt.len(),
            "sending chat completion"
        );

        match &self.backend {
            Backend::Groq {
                http,
                base_url,
                api_key,
            } => self.complete_openai(http, base_url, api_key, request).await,
            Backend::Ollama(client) => self.complete_ollama(client, request).await,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [WireMessage<'a>; 2],
    temperature: f64,
    max_tokens: u32,
}

impl<'a> ChatRequest<'a> {
    fn new(model: &'a str, request: &'a CompletionRequest) -> Self {
        Self {
            model,
            messages: [
                WireMessage {
                    role: "system",
                    content: &request.system,
                },
                WireMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// First choice's text, untouched.
fn extract_content(body: ChatResponse) -> Result<String, GenerationError> {
    body.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(GenerationError::EmptyResponse)
}

/// Pull `error.message` out of an OpenAI-style error body, or return the body.
fn provider_error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) if body.trim().is_empty() => "empty error body".to_owned(),
        Err(_) => body.trim().to_owned(),
    }
}
