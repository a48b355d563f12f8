// SPDX-FileCopyrightText: 2026 TransLanda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the TransLanda bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level TransLanda configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TranslandaConfig {
    /// Bot identity and logging.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Telegram bot integration settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Gemini generative backend settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Image search API settings.
    #[serde(default)]
    pub search: SearchConfig,

    /// Exchange-rate page scraping settings.
    #[serde(default)]
    pub exchange: ExchangeConfig,

    /// Conversation memory settings.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Curated knowledge base and embedding model settings.
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Trip catalog and contact details.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Liveness HTTP listener settings.
    #[serde(default)]
    pub liveness: LivenessConfig,
}

/// Bot identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the bot.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "translanda".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telegram bot integration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. `None` disables the bot.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Public URL of the company logo sent by `/logo`.
    #[serde(default)]
    pub logo_url: Option<String>,

    /// Skip updates that queued up while the bot was offline.
    #[serde(default = "default_drop_pending_updates")]
    pub drop_pending_updates: bool,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            logo_url: None,
            drop_pending_updates: default_drop_pending_updates(),
        }
    }
}

fn default_drop_pending_updates() -> bool {
    true
}

/// Gemini API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// Gemini API key. `None` requires the `GEMINI_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model used for every generated reply.
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// Request timeout in seconds.
    #[serde(default = "default_gemini_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_gemini_model(),
            timeout_secs: default_gemini_timeout_secs(),
        }
    }
}

fn default_gemini_model() -> String {
    "gemini-1.5-pro".to_string()
}

fn default_gemini_timeout_secs() -> u64 {
    120
}

/// Google Custom Search configuration for `/img`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// Custom Search API key.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Programmable search engine id (`cx`).
    #[serde(default)]
    pub engine_id: Option<String>,
}

/// Exchange-rate scraping configuration for `/dolar`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ExchangeConfig {
    /// Page that publishes the USD to VES rate.
    #[serde(default = "default_exchange_url")]
    pub url: String,

    /// CSS selector of the element holding the rate.
    #[serde(default = "default_exchange_selector")]
    pub selector: String,

    /// Link offered to the user when the page cannot be fetched.
    #[serde(default = "default_exchange_fallback_url")]
    pub fallback_url: String,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            url: default_exchange_url(),
            selector: default_exchange_selector(),
            fallback_url: default_exchange_fallback_url(),
        }
    }
}

fn default_exchange_url() -> String {
    "https://wise.com/es/currency-converter/usd-to-ves-rate".to_string()
}

fn default_exchange_selector() -> String {
    "span.text-success".to_string()
}

fn default_exchange_fallback_url() -> String {
    "https://www.bcv.org.ve/".to_string()
}

/// Conversation memory configuration.
///
/// Controls where transcripts live, how long they may grow, and the
/// labels used to render them into a prompt.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// JSON document mapping user ids to transcripts.
    #[serde(default = "default_memory_file")]
    pub memory_file: String,

    /// JSON document with the seed transcript for new users.
    #[serde(default = "default_base_conversation_file")]
    pub base_conversation_file: String,

    /// Maximum transcript lines used when building a prompt.
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,

    /// Heading placed above the rendered transcript.
    #[serde(default = "default_history_header")]
    pub history_header: String,

    /// Prefix of user lines.
    #[serde(default = "default_user_label")]
    pub user_label: String,

    /// Prefix of model lines.
    #[serde(default = "default_model_label")]
    pub model_label: String,

    /// Reply used when the model returns no text.
    #[serde(default = "default_fallback_reply")]
    pub fallback_reply: String,

    /// Reply shown to the end user when answering fails.
    #[serde(default = "default_error_reply")]
    pub error_reply: String,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            memory_file: default_memory_file(),
            base_conversation_file: default_base_conversation_file(),
            max_lines: default_max_lines(),
            history_header: default_history_header(),
            user_label: default_user_label(),
            model_label: default_model_label(),
            fallback_reply: default_fallback_reply(),
            error_reply: default_error_reply(),
        }
    }
}

fn default_memory_file() -> String {
    "memoria.json".to_string()
}

fn default_base_conversation_file() -> String {
    "conversacion_base.json".to_string()
}

fn default_max_lines() -> usize {
    1000
}

fn default_history_header() -> String {
    "Conversation history".to_string()
}

fn default_user_label() -> String {
    "User".to_string()
}

fn default_model_label() -> String {
    "Model".to_string()
}

fn default_fallback_reply() -> String {
    "Could not understand the question.".to_string()
}

fn default_error_reply() -> String {
    "Lo siento, ocurrió un error al procesar tu mensaje. Intenta de nuevo más tarde.".to_string()
}

/// Curated knowledge base configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KnowledgeConfig {
    /// JSON document with the curated `preguntas` entries.
    #[serde(default = "default_responses_file")]
    pub responses_file: String,

    /// Minimum cosine similarity for a curated answer to win (-1.0 to 1.0).
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    /// Name of the sentence embedding model.
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Directory under which the embedding model is cached.
    #[serde(default = "default_model_dir")]
    pub model_dir: String,

    /// Memoise phrase embeddings between lookups.
    #[serde(default = "default_cache_embeddings")]
    pub cache_embeddings: bool,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            responses_file: default_responses_file(),
            similarity_threshold: default_similarity_threshold(),
            model_name: default_model_name(),
            model_dir: default_model_dir(),
            cache_embeddings: default_cache_embeddings(),
        }
    }
}

fn default_responses_file() -> String {
    "preguntas.json".to_string()
}

fn default_similarity_threshold() -> f32 {
    0.85
}

fn default_model_name() -> String {
    "all-MiniLM-L6-v2".to_string()
}

fn default_model_dir() -> String {
    dirs::data_dir()
        .map(|p| p.join("translanda"))
        .unwrap_or_else(|| std::path::PathBuf::from(".translanda"))
        .to_string_lossy()
        .into_owned()
}

fn default_cache_embeddings() -> bool {
    true
}

/// Trip catalog and business contact configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    /// JSON document listing the trips. The built-in catalog is used when absent.
    #[serde(default = "default_catalog_file")]
    pub file: String,

    /// Image shown above the trip menu.
    #[serde(default)]
    pub brand_image: Option<String>,

    /// Contact block shown by `/contacto`.
    #[serde(default)]
    pub contact: ContactConfig,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            file: default_catalog_file(),
            brand_image: None,
            contact: ContactConfig::default(),
        }
    }
}

fn default_catalog_file() -> String {
    "viajes.json".to_string()
}

/// Business contact details. Unset fields are omitted from `/contacto`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ContactConfig {
    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub instagram: Option<String>,

    #[serde(default)]
    pub instagram_promoter: Option<String>,

    #[serde(default)]
    pub email: Option<String>,
}

/// Liveness listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LivenessConfig {
    /// Serve `GET /` for external uptime monitors.
    #[serde(default = "default_liveness_enabled")]
    pub enabled: bool,

    /// Address to bind.
    #[serde(default = "default_liveness_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_liveness_port")]
    pub port: u16,

    /// Constant body returned by `GET /`.
    #[serde(default = "default_liveness_message")]
    pub message: String,
}

impl Default for LivenessConfig {
    fn default() -> Self {
        Self {
            enabled: default_liveness_enabled(),
            host: default_liveness_host(),
            port: default_liveness_port(),
            message: default_liveness_message(),
        }
    }
}

fn default_liveness_enabled() -> bool {
    true
}

fn default_liveness_host() -> String {
    "0.0.0.0".to_string()
}

fn default_liveness_port() -> u16 {
    8080
}

fn default_liveness_message() -> String {
    "Bot está activo!".to_string()
}
