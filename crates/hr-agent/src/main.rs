//! HR Agent: interactive natural-language HR self-service.
//!
//! Wires the record store, capability set and Ollama gateway into a
//! dispatcher and runs the read loop on stdin/stdout. Logs go to stderr.

use std::sync::Arc;

use tokio::io::{AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

use hr_agent::config::AgentConfig;
use hr_agent::dispatcher::Dispatcher;
use hr_agent::extractor::ActionExtractor;
use hr_agent::gateway::{CompletionOptions, LanguageModel, OllamaClient};
use hr_agent::messages;
use hr_agent::repl;
use hr_agent::router::QueryRouter;
use hr_capabilities::LedgerCapabilities;
use hr_records::{MemoryRecordStore, RecordLedger, RecordStore};

const DEFAULT_CONFIG_PATH: &str = "hr-agent.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "hr-agent starting");

    // ── Load config ─────────────────────────────────────────────
    let explicit = std::env::args().nth(1);
    let config_path = explicit
        .clone()
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let mut config = AgentConfig::load(&config_path, explicit.is_some())?;
    config.apply_overrides(|key| std::env::var(key).ok());
    tracing::info!(
        path = %config_path,
        model = %config.ollama.model,
        reprompt = config.extraction.reprompt_on_format_error,
        "config loaded"
    );

    // ── Record store ────────────────────────────────────────────
    let store = match config.records.seed_path.as_deref() {
        Some(path) => MemoryRecordStore::from_json_file(path)?,
        None => {
            tracing::info!("no seed file configured, using sample data");
            MemoryRecordStore::with_sample_data()
        }
    };
    let store = Arc::new(store);
    let records: Arc<dyn RecordStore> = store.clone();
    let ledger: Arc<dyn RecordLedger> = store;

    // ── Capabilities ────────────────────────────────────────────
    let capabilities = Arc::new(LedgerCapabilities::new(ledger));

    // ── Ollama gateway ──────────────────────────────────────────
    let model: Arc<dyn LanguageModel> = Arc::new(OllamaClient::new(config.ollama.clone())?);
    tracing::info!(
        host = %config.ollama.host,
        model = model.model_name(),
        timeout_secs = config.ollama.timeout_secs,
        "ollama gateway configured"
    );

    let extractor = ActionExtractor::new(model, records.clone())
        .with_options(CompletionOptions {
            temperature: config.ollama.temperature,
            json: true,
        })
        .with_reprompt(config.extraction.reprompt_on_format_error);
    let dispatcher = Dispatcher::from_parts(QueryRouter::new(records), extractor, capabilities);

    // ── Read loop ───────────────────────────────────────────────
    let mut stdout = tokio::io::stdout();
    stdout.write_all(messages::BANNER.as_bytes()).await?;
    stdout.flush().await?;

    tracing::info!("hr-agent ready");

    tokio::select! {
        result = repl::run(
            &dispatcher,
            BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
            || chrono::Local::now().naive_local(),
        ) => {
            result?;
        }
        // Graceful shutdown on SIGINT
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
            stdout
                .write_all(format!("\n{}\n", messages::FAREWELL).as_bytes())
                .await?;
            stdout.flush().await?;
        }
    }

    tracing::info!("hr-agent stopped");
    Ok(())
}
