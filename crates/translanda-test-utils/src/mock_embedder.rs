// SPDX-FileCopyrightText: 2026 TransLanda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic stand-in for the sentence embedding model.
//!
//! Words are lowercased, hashed into a fixed number of buckets, counted,
//! and the count vector is scaled to unit length. Identical text always
//! scores 1.0; texts without shared words score 0.0 unless their words
//! collide in a bucket.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use translanda_core::traits::{EmbeddingAdapter, PluginAdapter};
use translanda_core::types::{AdapterType, EmbeddingInput, EmbeddingOutput, HealthStatus};
use translanda_core::TranslandaError;

/// Bucket count of the mock embedding space.
pub const MOCK_DIMENSIONS: usize = 256;

/// Hashed bag-of-words embedder.
#[derive(Default)]
pub struct MockEmbedder {
    texts_embedded: AtomicUsize,
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of individual texts embedded so far.
    pub fn texts_embedded(&self) -> usize {
        self.texts_embedded.load(Ordering::SeqCst)
    }

    /// Embeds one text.
    pub fn vector(text: &str) -> Vec<f32> {
        let mut buckets = vec![0.0f32; MOCK_DIMENSIONS];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let mut hasher = DefaultHasher::new();
            word.to_lowercase().hash(&mut hasher);
            buckets[(hasher.finish() % MOCK_DIMENSIONS as u64) as usize] += 1.0;
        }

        let norm = buckets.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            buckets.iter_mut().for_each(|v| *v /= norm);
        }
        buckets
    }
}

#[async_trait]
impl PluginAdapter for MockEmbedder {
    fn name(&self) -> &str {
        "mock-embedder"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
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
impl EmbeddingAdapter for MockEmbedder {
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, TranslandaError> {
        self.texts_embedded
            .fetch_add(input.texts.len(), Ordering::SeqCst);
        Ok(EmbeddingOutput {
            embeddings: input.texts.iter().map(|t| Self::vector(t)).collect(),
            dimensions: MOCK_DIMENSIONS,
        })
    }
}
