//! Agent configuration, loadable from TOML with environment overrides.

use std::path::Path;

use serde::Deserialize;

use crate::gateway::ollama::OllamaConfig;

/// Environment variable overriding `[ollama] host`.
pub const ENV_OLLAMA_HOST: &str = "HR_AGENT_OLLAMA_HOST";
/// Environment variable overriding `[ollama] model`.
pub const ENV_OLLAMA_MODEL: &str = "HR_AGENT_OLLAMA_MODEL";

/// Top-level configuration for the HR agent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgentConfig {
    /// Local Ollama backend settings.
    #[serde(default)]
    pub ollama: OllamaConfig,
    /// Action extraction policy.
    #[serde(default)]
    pub extraction: ExtractionConfig,
    /// Record store bootstrap.
    #[serde(default)]
    pub records: RecordsConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractionConfig {
    /// Re-prompt the model once when its response is malformed.
    #[serde(default)]
    pub reprompt_on_format_error: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordsConfig {
    /// JSON seed file. None uses the built-in sample data.
    #[serde(default)]
    pub seed_path: Option<String>,
}

impl AgentConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config the way the binary does.
    ///
    /// An explicitly named file must exist; a missing default file falls back
    /// to built-in defaults.
    pub fn load(path: &str, explicit: bool) -> anyhow::Result<Self> {
        if !explicit && !Path::new(path).exists() {
            tracing::info!(path, "config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    /// Apply `HR_AGENT_*` overrides from `lookup` (normally `std::env::var`).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup(ENV_OLLAMA_HOST).filter(|v| !v.trim().is_empty()) {
            self.ollama.host = host;
        }
        if let Some(model) = lookup(ENV_OLLAMA_MODEL).filter(|v| !v.trim().is_empty()) {
            self.ollama.model = model;
        }
    }
}
