// SPDX-FileCopyrightText: 2026 TransLanda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles the JSON store, knowledge matcher, conversation
//! store, and responder over a temp directory, with [`MockEmbedder`] and
//! [`MockProvider`] standing in for the model and the generative backend.

use std::path::PathBuf;
use std::sync::Arc;

use translanda_config::model::MemoryConfig;
use translanda_core::traits::TranscriptStore;
use translanda_core::types::{KnowledgeEntry, MemoryMap, UserId};
use translanda_core::TranslandaError;
use translanda_memory::{
    ConversationConfig, ConversationStore, JsonFileStore, KnowledgeMatcher, MatcherConfig, Reply,
    Responder,
};

use crate::mock_embedder::MockEmbedder;
use crate::mock_provider::MockProvider;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    responses: Vec<String>,
    curated: Option<Vec<KnowledgeEntry>>,
    base_conversation: Option<Vec<String>>,
    memory: Option<MemoryMap>,
    max_lines: Option<usize>,
    matcher_config: MatcherConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            responses: Vec::new(),
            curated: None,
            base_conversation: None,
            memory: None,
            max_lines: None,
            matcher_config: MatcherConfig::default(),
        }
    }

    /// Set mock provider replies.
    pub fn with_mock_responses(mut self, responses: Vec<String>) -> Self {
        self.responses = responses;
        self
    }

    /// Write a curated entries file.
    pub fn with_curated(mut self, entries: Vec<KnowledgeEntry>) -> Self {
        self.curated = Some(entries);
        self
    }

    /// Write a seed transcript file.
    pub fn with_base_conversation(mut self, lines: Vec<String>) -> Self {
        self.base_conversation = Some(lines);
        self
    }

    /// Start from an existing memory document.
    pub fn with_memory(mut self, memory: MemoryMap) -> Self {
        self.memory = Some(memory);
        self
    }

    pub fn with_max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = Some(max_lines);
        self
    }

    pub fn with_matcher_config(mut self, config: MatcherConfig) -> Self {
        self.matcher_config = config;
        self
    }

    /// Build the harness, writing the requested files into a fresh temp dir.
    pub async fn build(self) -> Result<TestHarness, TranslandaError> {
        let temp_dir = tempfile::TempDir::new().map_err(TranslandaError::storage)?;
        let memory_path = temp_dir.path().join("memoria.json");
        let base_path = temp_dir.path().join("conversacion_base.json");
        let curated_path = temp_dir.path().join("preguntas.json");

        if let Some(entries) = self.curated {
            write_json(&curated_path, &serde_json::json!({ "preguntas": entries }))?;
        }
        if let Some(lines) = self.base_conversation {
            write_json(&base_path, &serde_json::json!({ "conversacion_base": lines }))?;
        }

        let store = Arc::new(JsonFileStore::new(&memory_path, &base_path, &curated_path));
        if let Some(memory) = self.memory {
            store.save_memory(&memory).await?;
        }

        let embedder = Arc::new(MockEmbedder::new());
        let provider = Arc::new(MockProvider::with_responses(self.responses));

        let matcher = Arc::new(KnowledgeMatcher::new(
            embedder.clone(),
            store.clone(),
            self.matcher_config,
        ));

        let mut memory_config = MemoryConfig::default();
        if let Some(max_lines) = self.max_lines {
            memory_config.max_lines = max_lines;
        }
        let conversations = Arc::new(ConversationStore::new(
            store.clone(),
            store.clone(),
            ConversationConfig::from_config(&memory_config, "mock-model"),
        ));

        let responder = Responder::new(matcher.clone(), conversations.clone(), provider.clone());

        Ok(TestHarness {
            store,
            embedder,
            provider,
            matcher,
            conversations,
            responder,
            memory_path,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete memory stack over temp files.
pub struct TestHarness {
    /// JSON flat store (temp dir, cleaned up on drop).
    pub store: Arc<JsonFileStore>,
    pub embedder: Arc<MockEmbedder>,
    pub provider: Arc<MockProvider>,
    pub matcher: Arc<KnowledgeMatcher>,
    pub conversations: Arc<ConversationStore>,
    pub responder: Responder,
    /// Path of the memory document.
    pub memory_path: PathBuf,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Route `text` from `user` through the responder.
    pub async fn send(&self, user: &str, text: &str) -> Result<Reply, TranslandaError> {
        self.responder.reply(&UserId::from(user), text).await
    }

    /// The memory document as currently persisted.
    pub async fn memory(&self) -> Result<MemoryMap, TranslandaError> {
        self.store.load_memory().await
    }

    /// The persisted transcript of `user`, if any.
    pub async fn transcript(&self, user: &str) -> Result<Option<Vec<String>>, TranslandaError> {
        self.conversations.transcript(&UserId::from(user)).await
    }
}

/// Builds a curated entry from string slices.
pub fn entry(keys: &[&str], response: &str) -> KnowledgeEntry {
    KnowledgeEntry {
        keys: keys.iter().map(|k| k.to_string()).collect(),
        response: response.to_string(),
    }
}

fn write_json(path: &std::path::Path, value: &serde_json::Value) -> Result<(), TranslandaError> {
    let body = serde_json::to_string_pretty(value)
        .map_err(|e| TranslandaError::Internal(format!("fixture serialization failed: {e}")))?;
    std::fs::write(path, body).map_err(TranslandaError::storage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn harness_builds_with_defaults() {
        let harness = TestHarness::builder().build().await.unwrap();
        assert!(harness.memory().await.unwrap().is_empty());
        assert!(!harness.memory_path.exists());
    }

    #[tokio::test]
    async fn harness_serves_curated_and_generated_replies() {
        let harness = TestHarness::builder()
            .with_curated(vec![entry(&["hola"], "¡Hola!")])
            .with_mock_responses(vec!["generated".into()])
            .build()
            .await
            .unwrap();

        assert_eq!(
            harness.send("1", "hola").await.unwrap(),
            Reply::Curated("¡Hola!".into())
        );
        assert_eq!(
            harness.send("1", "otra cosa").await.unwrap(),
            Reply::Generated("generated".into())
        );
    }

    #[tokio::test]
    async fn harness_preloads_memory() {
        let mut memory = MemoryMap::new();
        memory.insert("9".into(), vec!["User: old".into()]);
        let harness = TestHarness::builder().with_memory(memory).build().await.unwrap();

        assert_eq!(
            harness.transcript("9").await.unwrap(),
            Some(vec!["User: old".to_string()])
        );
    }
}
