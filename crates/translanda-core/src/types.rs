// SPDX-FileCopyrightText: 2026 TransLanda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the TransLanda core.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Stable identifier of a messaging-platform user.
///
/// Always the string form of the platform-assigned numeric ID, so it can be
/// used directly as a key of the persisted memory document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        UserId(value.to_string())
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        UserId(value)
    }
}

impl From<u64> for UserId {
    fn from(value: u64) -> Self {
        UserId(value.to_string())
    }
}

/// Ordered transcript lines for one user, alternating user and model turns.
pub type Transcript = Vec<String>;

/// The full persisted mapping from user identifier to transcript.
///
/// A `BTreeMap` keeps the serialized document stable between writes.
pub type MemoryMap = BTreeMap<String, Transcript>;

/// A curated question/answer entry of the knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    /// Trigger phrases, scanned in order.
    #[serde(default)]
    pub keys: Vec<String>,
    /// Canonical answer returned when any trigger phrase matches.
    pub response: String,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Channel,
    Provider,
    Embedding,
}

/// A single-prompt request to a generative backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRequest {
    /// Model identifier chosen by the caller.
    pub model: String,
    /// Fully assembled prompt text.
    pub prompt: String,
}

/// A response from a generative backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResponse {
    /// Generated text. Empty when the backend produced no text.
    pub content: String,
    /// Model that produced the response.
    pub model: String,
    /// Backend-reported finish reason, if any.
    pub finish_reason: Option<String>,
}

/// Input for an embedding adapter.
#[derive(Debug, Clone)]
pub struct EmbeddingInput {
    pub texts: Vec<String>,
}

/// Output from an embedding adapter, one vector per input text.
#[derive(Debug, Clone)]
pub struct EmbeddingOutput {
    pub embeddings: Vec<Vec<f32>>,
    pub dimensions: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_from_numeric_platform_id() {
        let id = UserId::from(123_456_789u64);
        assert_eq!(id.as_str(), "123456789");
        assert_eq!(id.to_string(), "123456789");
    }

    #[test]
    fn user_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&UserId::from("42")).unwrap();
        assert_eq!(json, "\"42\"");
    }

    #[test]
    fn knowledge_entry_deserializes_curated_shape() {
        let entry: KnowledgeEntry =
            serde_json::from_str(r#"{"keys": ["hola", "buenas"], "response": "¡Hola!"}"#).unwrap();
        assert_eq!(entry.keys, vec!["hola", "buenas"]);
        assert_eq!(entry.response, "¡Hola!");
    }

    #[test]
    fn knowledge_entry_without_keys_defaults_to_empty() {
        let entry: KnowledgeEntry = serde_json::from_str(r#"{"response": "x"}"#).unwrap();
        assert!(entry.keys.is_empty());
    }

    #[test]
    fn health_status_variants() {
        assert_eq!(HealthStatus::Healthy, HealthStatus::Healthy);
        assert_ne!(HealthStatus::Degraded("slow".into()), HealthStatus::Healthy);
        assert_ne!(HealthStatus::Unhealthy("down".into()), HealthStatus::Healthy);
    }
}
