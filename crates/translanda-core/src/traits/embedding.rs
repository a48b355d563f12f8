// SPDX-FileCopyrightText: 2026 TransLanda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding adapter trait for sentence embedding generation.

use async_trait::async_trait;

use crate::error::TranslandaError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{EmbeddingInput, EmbeddingOutput};

/// Adapter for converting text into fixed-length vectors.
///
/// Implementations must be deterministic: the same text always yields the
/// same vector. The knowledge matcher relies on this to memoise phrases.
#[async_trait]
pub trait EmbeddingAdapter: PluginAdapter {
    /// Generates one embedding per input text, in input order.
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, TranslandaError>;
}
