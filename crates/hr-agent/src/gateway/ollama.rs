//! Ollama chat client.
//!
//! Calls the local Ollama HTTP API (`/api/chat`) with `stream=false` and
//! returns the assistant message content untouched. The whole call is bounded
//! by `timeout_secs` so a stalled backend cannot hang the read loop.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{CompletionOptions, LanguageModel, ModelError};

/// Configuration for the Ollama endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaConfig {
    /// Ollama HTTP API base URL.
    #[serde(default = "default_host")]
    pub host: String,
    /// Model to use for extraction.
    #[serde(default = "default_model")]
    pub model: String,
    /// Deadline for one completion, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Sampling temperature. Kept low for structured output.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_host() -> String {
    "http://localhost:11434".into()
}
fn default_model() -> String {
    "qwen2.5:3b".into()
}
fn default_timeout_secs() -> u64 {
    5
}
fn default_temperature() -> f32 {
    0.1
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
        }
    }
}

/// Ollama chat API request body.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'a str>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
}

/// Ollama chat API response (only fields we need).
#[derive(Deserialize)]
struct ChatResponse {
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Client for a local Ollama server.
pub struct OllamaClient {
    client: reqwest::Client,
    config: OllamaConfig,
}

impl OllamaClient {
    pub fn new(config: OllamaConfig) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ModelError::Client(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    fn timeout(&self) -> ModelError {
        ModelError::Timeout {
            timeout_secs: self.config.timeout_secs,
        }
    }

    async fn chat(&self, prompt: &str, options: &CompletionOptions) -> Result<String, ModelError> {
        let url = format!("{}/api/chat", self.config.host.trim_end_matches('/'));
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            format: options.json.then_some("json"),
            stream: false,
            options: ChatOptions {
                temperature: options.temperature,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    self.timeout()
                } else {
                    ModelError::Unavailable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ModelError::Unavailable(format!("ollama returned {status}")));
        }

        let chat: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                self.timeout()
            } else {
                ModelError::Unavailable(format!("undecodable ollama response: {e}"))
            }
        })?;

        chat.message
            .map(|m| m.content)
            .ok_or_else(|| ModelError::Unavailable("ollama response has no message".into()))
    }
}

#[async_trait]
impl LanguageModel for OllamaClient {
    async fn complete(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, ModelError> {
        let deadline = Duration::from_secs(self.config.timeout_secs);
        let result = match tokio::time::timeout(deadline, self.chat(prompt, options)).await {
            Ok(result) => result,
            Err(_) => Err(self.timeout()),
        };
        if let Err(e) = &result {
            tracing::warn!(error = %e, model = %self.config.model, "ollama completion failed");
        }
        result
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
