//! Language model gateway.
//!
//! A thin request/response wrapper around a text-generation backend. It turns
//! a prompt into raw text and owns none of the semantics: no retries, no
//! caching, no parsing of the returned text.
//!
//! - **Ollama** (local HTTP API) for production.
//! - **Scripted** (canned responses) for tests.

pub mod ollama;
pub mod scripted;

use async_trait::async_trait;
use thiserror::Error;

pub use ollama::{OllamaClient, OllamaConfig};
pub use scripted::ScriptedModel;

/// Backend failures. Both runtime variants are retryable by the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("model backend unavailable: {0}")]
    Unavailable(String),

    #[error("model did not respond within {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("model client error: {0}")]
    Client(String),
}

/// Per-call generation options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionOptions {
    pub temperature: f32,
    /// Ask the backend to constrain output to JSON.
    pub json: bool,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            json: true,
        }
    }
}

/// Trait for text-generation backends.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Send one prompt and return the raw completion text.
    async fn complete(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, ModelError>;

    /// Model identifier (for logging).
    fn model_name(&self) -> &str;
}
