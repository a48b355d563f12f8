// SPDX-FileCopyrightText: 2026 TransLanda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock generative backend for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` with pre-configured replies
//! and records every prompt it receives.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use translanda_core::traits::{PluginAdapter, ProviderAdapter};
use translanda_core::types::{AdapterType, HealthStatus, ProviderRequest, ProviderResponse};
use translanda_core::TranslandaError;

/// A mock provider that returns pre-configured replies.
///
/// Replies are popped from a FIFO queue. When the queue is empty,
/// `"mock response"` is returned. An empty string in the queue simulates
/// a backend that produced no text.
pub struct MockProvider {
    responses: Arc<Mutex<VecDeque<String>>>,
    requests: Arc<Mutex<Vec<ProviderRequest>>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl MockProvider {
    /// Create a new mock provider with an empty reply queue.
    pub fn new() -> Self {
        Self::with_responses(Vec::new())
    }

    /// Create a mock provider pre-loaded with the given replies.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            requests: Arc::new(Mutex::new(Vec::new())),
            failure: Arc::new(Mutex::new(None)),
        }
    }

    /// Add a reply to the end of the queue.
    pub async fn add_response(&self, text: impl Into<String>) {
        self.responses.lock().await.push_back(text.into());
    }

    /// Make every following call fail with a provider error.
    pub async fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock().await = Some(message.into());
    }

    /// Prompts received so far, oldest first.
    pub async fn prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .await
            .iter()
            .map(|r| r.prompt.clone())
            .collect()
    }

    /// Requests received so far, oldest first.
    pub async fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, TranslandaError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), TranslandaError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, TranslandaError> {
        let model = request.model.clone();
        self.requests.lock().await.push(request);

        if let Some(message) = self.failure.lock().await.clone() {
            return Err(TranslandaError::Provider {
                message,
                source: None,
            });
        }

        let content = self
            .responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| "mock response".to_string());

        Ok(ProviderResponse {
            content,
            model,
            finish_reason: Some("STOP".to_string()),
        })
    }
}
