// SPDX-FileCopyrightText: 2026 TransLanda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `translanda serve` command implementation.
//!
//! Builds the answering core (embedding model, knowledge matcher, JSON
//! conversation store, Gemini provider), starts the liveness listener, and
//! runs the Telegram bot until Ctrl-C.

use std::sync::Arc;

use tracing::info;

use translanda_config::model::TranslandaConfig;
use translanda_core::error::TranslandaError;
use translanda_gemini::GeminiProvider;
use translanda_memory::{
    ConversationConfig, ConversationStore, JsonFileStore, KnowledgeMatcher, MatcherConfig,
    ModelManager, OnnxEmbedder, Responder,
};
use translanda_telegram::{BotContext, TelegramBot};

/// Runs the `translanda serve` command.
pub async fn run_serve(config: TranslandaConfig) -> Result<(), TranslandaError> {
    info!(name = %config.agent.name, "starting translanda serve");

    let responder = build_responder(&config).await?;
    let context = BotContext::from_config(&config, responder)?;
    let bot = TelegramBot::new(&config, context)?;

    let liveness = translanda_gateway::spawn(&config.liveness);

    bot.run().await;

    if let Some(handle) = liveness {
        handle.abort();
    }
    info!("translanda stopped");
    Ok(())
}

/// Assembles the matcher-then-model answering pipeline from config.
///
/// The provider is built first so a missing API key fails before the
/// embedding model download starts.
pub async fn build_responder(config: &TranslandaConfig) -> Result<Arc<Responder>, TranslandaError> {
    let provider = Arc::new(GeminiProvider::new(&config.gemini)?);

    // Download model on first run.
    let model_manager = ModelManager::from_config(&config.knowledge);
    info!("ensuring embedding model is available...");
    let model_path = model_manager.ensure_model().await?;
    info!(path = %model_path.display(), "embedding model ready");

    let embedder = Arc::new(OnnxEmbedder::new(&model_path)?);
    let store = Arc::new(JsonFileStore::from_config(&config.memory, &config.knowledge));

    let matcher = Arc::new(KnowledgeMatcher::new(
        embedder,
        store.clone(),
        MatcherConfig::from(&config.knowledge),
    ));
    let conversations = Arc::new(ConversationStore::new(
        store.clone(),
        store,
        ConversationConfig::from_config(&config.memory, &config.gemini.model),
    ));

    Ok(Arc::new(Responder::new(matcher, conversations, provider)))
}

/// Installs the global tracing subscriber. `RUST_LOG` wins over the config.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("translanda={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
