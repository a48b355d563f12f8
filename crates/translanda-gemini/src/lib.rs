// SPDX-FileCopyrightText: 2026 TransLanda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Gemini provider adapter for the TransLanda bot.
//!
//! Implements [`ProviderAdapter`] over the `generateContent` endpoint. The
//! whole prompt is sent as one user turn and the reply is the text of the
//! first candidate. A response without text is returned as empty content,
//! leaving the fallback decision to the caller.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use translanda_config::model::GeminiConfig;
use translanda_core::error::TranslandaError;
use translanda_core::traits::{PluginAdapter, ProviderAdapter};
use translanda_core::types::{AdapterType, HealthStatus, ProviderRequest, ProviderResponse};

use crate::client::GeminiClient;
use crate::types::GenerateContentRequest;

/// Gemini provider implementing [`ProviderAdapter`].
pub struct GeminiProvider {
    client: GeminiClient,
    default_model: String,
}

impl GeminiProvider {
    /// Creates a provider from the `[gemini]` config section.
    ///
    /// Fails when no API key is configured (`gemini.api_key`,
    /// `TRANSLANDA_GEMINI_API_KEY`, or `GEMINI_API_KEY`).
    pub fn new(config: &GeminiConfig) -> Result<Self, TranslandaError> {
        let api_key = resolve_api_key(&config.api_key)?;
        let client = GeminiClient::new(&api_key, Duration::from_secs(config.timeout_secs))?;

        info!(model = %config.model, "Gemini provider initialized");

        Ok(Self::with_client(client, config.model.clone()))
    }

    /// Creates a provider around an existing client.
    pub fn with_client(client: GeminiClient, default_model: String) -> Self {
        Self {
            client,
            default_model,
        }
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }
}

#[async_trait]
impl PluginAdapter for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, TranslandaError> {
        // No probe call: it would spend quota.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), TranslandaError> {
        debug!("Gemini provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for GeminiProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, TranslandaError> {
        let model = if request.model.is_empty() {
            self.default_model.clone()
        } else {
            request.model
        };

        let response = self
            .client
            .generate_content(&model, &GenerateContentRequest::from_prompt(request.prompt))
            .await?;

        let content = response.text();
        if content.is_empty() {
            debug!(model = %model, finish_reason = ?response.finish_reason(), "Gemini returned no text");
        }

        Ok(ProviderResponse {
            content,
            finish_reason: response.finish_reason(),
            model: response.model_version.unwrap_or(model),
        })
    }
}

fn resolve_api_key(config_key: &Option<String>) -> Result<String, TranslandaError> {
    match config_key {
        Some(key) if !key.trim().is_empty() => Ok(key.clone()),
        _ => Err(TranslandaError::Config(
            "Gemini API key not found. Set gemini.api_key in config or the GEMINI_API_KEY environment variable.".into(),
        )),
    }
}
