//! Text-generation backend client
//!
//! Every narrative in the pipeline funnels through [`NarrativeGenerator`].
//! The production implementation talks to an OpenAI-compatible
//! `/chat/completions` endpoint (Ollama, llama.cpp server, vLLM, ...).
//! No authentication is sent; the backend is assumed to be local.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Generation call failure
#[derive(Debug, Error)]
pub enum GenerationFailure {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Backend error {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// One prompt in, one generated text out
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationFailure>;
}

/// Immutable backend configuration, fixed at construction
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Base address, e.g. `http://localhost:11434/v1`
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    /// Per-call timeout
    pub timeout: Duration,
}

impl GeneratorConfig {
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434/v1".to_string(),
            model: "llama3.1:8b".to_string(),
            temperature: 0.7,
            timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
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

/// OpenAI-compatible chat completions client
///
/// The inner `reqwest::Client` is pooled and safe to share across concurrent
/// calls, so one instance serves every request of the service.
pub struct ChatCompletionsGenerator {
    http_client: reqwest::Client,
    config: GeneratorConfig,
}

impl ChatCompletionsGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, GenerationFailure> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("mxp-ex/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationFailure::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn map_transport_error(&self, err: reqwest::Error) -> GenerationFailure {
        if err.is_timeout() {
            GenerationFailure::Timeout(self.config.timeout)
        } else {
            GenerationFailure::Network(err.to_string())
        }
    }
}

#[async_trait]
impl NarrativeGenerator for ChatCompletionsGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationFailure> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.temperature,
        };

        let started = Instant::now();
        tracing::debug!(
            model = %self.config.model,
            prompt_chars = prompt.len(),
            "Requesting completion"
        );

        let response = self
            .http_client
            .post(self.config.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !status.is_success() {
            return Err(GenerationFailure::Backend {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| GenerationFailure::MalformedResponse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                GenerationFailure::MalformedResponse("response carried no message content".to_string())
            })?;

        tracing::debug!(
            model = %self.config.model,
            elapsed_ms = started.elapsed().as_millis() as u64,
            response_chars = content.len(),
            "Completion received"
        );

        Ok(content)
    }
}
