// SPDX-FileCopyrightText: 2026 TransLanda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic matching of user text against curated question/answer entries.
//!
//! Every trigger phrase of every entry is scored against the user text by
//! cosine similarity. The single best phrase across the whole knowledge base
//! wins; its entry's response is returned when the score reaches the
//! configured threshold. Earlier phrases win ties.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use translanda_config::model::KnowledgeConfig;
use translanda_core::error::TranslandaError;
use translanda_core::traits::{EmbeddingAdapter, KnowledgeSource};
use translanda_core::types::{EmbeddingInput, KnowledgeEntry};

use crate::types::{cosine_similarity, KnowledgeMatch};

/// Default minimum similarity for a curated answer.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.85;

/// Tuning for [`KnowledgeMatcher`].
#[derive(Debug, Clone, PartialEq)]
pub struct MatcherConfig {
    pub similarity_threshold: f32,
    /// Memoise phrase embeddings across calls.
    pub cache_embeddings: bool,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            cache_embeddings: true,
        }
    }
}

impl From<&KnowledgeConfig> for MatcherConfig {
    fn from(config: &KnowledgeConfig) -> Self {
        Self {
            similarity_threshold: config.similarity_threshold,
            cache_embeddings: config.cache_embeddings,
        }
    }
}

/// Finds the curated answer closest in meaning to a user message.
///
/// Entries are re-read from the source on every call, so edits to the
/// curated file apply without a restart. Phrase vectors are cached by
/// phrase text; since embedding is deterministic this never changes a result.
pub struct KnowledgeMatcher {
    embedder: Arc<dyn EmbeddingAdapter>,
    source: Arc<dyn KnowledgeSource>,
    config: MatcherConfig,
    phrase_cache: DashMap<String, Vec<f32>>,
}

impl KnowledgeMatcher {
    pub fn new(
        embedder: Arc<dyn EmbeddingAdapter>,
        source: Arc<dyn KnowledgeSource>,
        config: MatcherConfig,
    ) -> Self {
        Self {
            embedder,
            source,
            config,
            phrase_cache: DashMap::new(),
        }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Returns the curated response for `text`, or `None` below the threshold.
    pub async fn find_response(&self, text: &str) -> Result<Option<String>, TranslandaError> {
        Ok(self.find_match(text).await?.map(|m| m.response))
    }

    /// Scores `text` against every trigger phrase and returns the global best
    /// if it clears the threshold.
    pub async fn find_match(&self, text: &str) -> Result<Option<KnowledgeMatch>, TranslandaError> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        let entries = self.source.load_curated_entries().await?;
        if entries.iter().all(|entry| entry.keys.is_empty()) {
            return Ok(None);
        }

        let query = self.embed_one(text).await?;
        let phrase_vectors = self.phrase_vectors(&entries).await?;

        let mut best: Option<KnowledgeMatch> = None;
        let mut best_score = 0.0f32;
        for (entry, vectors) in entries.iter().zip(&phrase_vectors) {
            for (phrase, vector) in entry.keys.iter().zip(vectors) {
                let score = cosine_similarity(&query, vector)?;
                if score > best_score {
                    best_score = score;
                    best = Some(KnowledgeMatch {
                        response: entry.response.clone(),
                        phrase: phrase.clone(),
                        score,
                    });
                }
            }
        }

        match best {
            Some(candidate) if candidate.score >= self.config.similarity_threshold => {
                debug!(phrase = %candidate.phrase, score = candidate.score, "curated match");
                Ok(Some(candidate))
            }
            Some(candidate) => {
                debug!(
                    phrase = %candidate.phrase,
                    score = candidate.score,
                    threshold = self.config.similarity_threshold,
                    "best curated phrase below threshold"
                );
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>, TranslandaError> {
        let output = self
            .embedder
            .embed(EmbeddingInput {
                texts: vec![text.to_string()],
            })
            .await?;
        output
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| TranslandaError::embedding("embedder returned no vector"))
    }

    /// Vectors for every phrase, grouped per entry in entry order.
    async fn phrase_vectors(
        &self,
        entries: &[KnowledgeEntry],
    ) -> Result<Vec<Vec<Vec<f32>>>, TranslandaError> {
        let mut missing: Vec<String> = Vec::new();
        for phrase in entries.iter().flat_map(|e| &e.keys) {
            let cached = self.config.cache_embeddings && self.phrase_cache.contains_key(phrase);
            if !cached && !missing.contains(phrase) {
                missing.push(phrase.clone());
            }
        }

        let mut fresh: HashMap<String, Vec<f32>> = HashMap::new();
        if !missing.is_empty() {
            let output = self
                .embedder
                .embed(EmbeddingInput {
                    texts: missing.clone(),
                })
                .await?;
            if output.embeddings.len() != missing.len() {
                return Err(TranslandaError::embedding(format!(
                    "embedder returned {} vectors for {} phrases",
                    output.embeddings.len(),
                    missing.len()
                )));
            }
            for (phrase, vector) in missing.into_iter().zip(output.embeddings) {
                if self.config.cache_embeddings {
                    self.phrase_cache.insert(phrase.clone(), vector.clone());
                }
                fresh.insert(phrase, vector);
            }
        }

        entries
            .iter()
            .map(|entry| {
                entry
                    .keys
                    .iter()
                    .map(|phrase| {
                        fresh
                            .get(phrase)
                            .cloned()
                            .or_else(|| self.phrase_cache.get(phrase).map(|v| v.value().clone()))
                            .ok_or_else(|| {
                                TranslandaError::Internal(format!("no vector for phrase {phrase:?}"))
                            })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use translanda_core::traits::PluginAdapter;
    use translanda_core::types::{AdapterType, EmbeddingOutput, HealthStatus, Transcript};

    use super::*;

    /// Maps known words to fixed axes so scores are easy to reason about.
    struct AxisEmbedder {
        calls: AtomicUsize,
        texts_embedded: AtomicUsize,
    }

    impl AxisEmbedder {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                texts_embedded: AtomicUsize::new(0),
            }
        }

        fn vector(text: &str) -> Vec<f32> {
            match text {
                "hola" => vec![1.0, 0.0, 0.0],
                "buenas" => vec![0.9, 0.1, 0.0],
                "precio" => vec![0.0, 1.0, 0.0],
                "cuanto cuesta" => vec![0.0, 0.95, 0.3],
                _ => vec![0.0, 0.0, 1.0],
            }
        }
    }

    #[async_trait]
    impl PluginAdapter for AxisEmbedder {
        fn name(&self) -> &str {
            "axis"
        }
        fn version(&self) -> semver::Version {
            semver::Version::new(0, 0, 0)
        }
        fn adapter_type(&self) -> AdapterType {
            AdapterType::Embedding
        }
        async fn health_check(&self) -> Result<HealthStatus, TranslandaError> {
            Ok(HealthStatus::Healthy)
        }
        async fn shutdown(&self) -> Result<(), TranslandaError> {
            Ok(())
        }
    }

    #[async_trait]
    impl EmbeddingAdapter for AxisEmbedder {
        async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, TranslandaError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.texts_embedded.fetch_add(input.texts.len(), Ordering::SeqCst);
            Ok(EmbeddingOutput {
                embeddings: input.texts.iter().map(|t| Self::vector(t)).collect(),
                dimensions: 3,
            })
        }
    }

    struct FixedEntries(Vec<KnowledgeEntry>);

    #[async_trait]
    impl KnowledgeSource for FixedEntries {
        async fn load_curated_entries(&self) -> Result<Vec<KnowledgeEntry>, TranslandaError> {
            Ok(self.0.clone())
        }
        async fn load_base_conversation(&self) -> Result<Transcript, TranslandaError> {
            Ok(Vec::new())
        }
    }

    fn entry(keys: &[&str], response: &str) -> KnowledgeEntry {
        KnowledgeEntry {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            response: response.to_string(),
        }
    }

    fn matcher(
        entries: Vec<KnowledgeEntry>,
        config: MatcherConfig,
    ) -> (KnowledgeMatcher, Arc<AxisEmbedder>) {
        let embedder = Arc::new(AxisEmbedder::new());
        let source = Arc::new(FixedEntries(entries));
        (KnowledgeMatcher::new(embedder.clone(), source, config), embedder)
    }

    #[tokio::test]
    async fn exact_phrase_returns_its_response() {
        let (matcher, _) = matcher(
            vec![entry(&["hola"], "¡Hola!"), entry(&["precio"], "Depende.")],
            MatcherConfig::default(),
        );

        let found = matcher.find_match("hola").await.unwrap().unwrap();
        assert_eq!(found.response, "¡Hola!");
        assert_eq!(found.phrase, "hola");
        assert!((found.score - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn global_best_phrase_wins_across_entries() {
        // "cuanto cuesta" is close to "precio" but "precio" itself is exact.
        let (matcher, _) = matcher(
            vec![entry(&["cuanto cuesta"], "A"), entry(&["hola", "precio"], "B")],
            MatcherConfig::default(),
        );

        assert_eq!(matcher.find_response("precio").await.unwrap().as_deref(), Some("B"));
    }

    #[tokio::test]
    async fn first_seen_phrase_wins_ties() {
        let (matcher, _) = matcher(
            vec![entry(&["hola"], "first"), entry(&["hola"], "second")],
            MatcherConfig::default(),
        );

        assert_eq!(matcher.find_response("hola").await.unwrap().as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn below_threshold_is_no_match() {
        let (matcher, _) = matcher(vec![entry(&["hola"], "¡Hola!")], MatcherConfig::default());
        assert!(matcher.find_match("adios").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn threshold_is_inclusive() {
        // cos("buenas", "hola") = 0.9 / |(0.9, 0.1)| ~= 0.9939
        let config = MatcherConfig {
            similarity_threshold: cosine_similarity(&[0.9, 0.1, 0.0], &[1.0, 0.0, 0.0]).unwrap(),
            cache_embeddings: true,
        };
        let (matcher, _) = matcher(vec![entry(&["hola"], "¡Hola!")], config);
        assert!(matcher.find_match("buenas").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn blank_input_skips_embedding() {
        let (matcher, embedder) = matcher(vec![entry(&["hola"], "¡Hola!")], MatcherConfig::default());
        assert!(matcher.find_match("   \n").await.unwrap().is_none());
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_knowledge_base_never_matches() {
        let (matcher, embedder) = matcher(vec![entry(&[], "orphan")], MatcherConfig::default());
        assert!(matcher.find_match("hola").await.unwrap().is_none());
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn cached_phrases_are_embedded_once() {
        let (matcher, embedder) = matcher(
            vec![entry(&["hola", "precio"], "x")],
            MatcherConfig::default(),
        );

        matcher.find_match("hola").await.unwrap();
        matcher.find_match("precio").await.unwrap();

        // 2 phrases once + 2 queries
        assert_eq!(embedder.texts_embedded.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn uncached_phrases_are_embedded_every_call() {
        let config = MatcherConfig {
            cache_embeddings: false,
            ..MatcherConfig::default()
        };
        let (matcher, embedder) = matcher(vec![entry(&["hola", "precio"], "x")], config);

        matcher.find_match("hola").await.unwrap();
        matcher.find_match("hola").await.unwrap();

        assert_eq!(embedder.texts_embedded.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn config_from_knowledge_section() {
        let config = MatcherConfig::from(&KnowledgeConfig {
            similarity_threshold: 0.7,
            cache_embeddings: false,
            ..KnowledgeConfig::default()
        });
        assert!((config.similarity_threshold - 0.7).abs() < f32::EPSILON);
        assert!(!config.cache_embeddings);
    }
}
