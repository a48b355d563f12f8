// SPDX-FileCopyrightText: 2026 TransLanda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local sentence embeddings with all-MiniLM-L6-v2 on ONNX Runtime.
//!
//! Text is tokenized with the model's own tokenizer, run through the
//! transformer, mean-pooled over real (non-padding) tokens, and scaled to
//! unit length. Output is 384-dimensional and deterministic per input.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use ndarray::Array2;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::TensorRef;
use tracing::debug;

use translanda_core::error::TranslandaError;
use translanda_core::traits::{EmbeddingAdapter, PluginAdapter};
use translanda_core::types::{AdapterType, EmbeddingInput, EmbeddingOutput, HealthStatus};

/// Output width of all-MiniLM-L6-v2.
pub const EMBEDDING_DIM: usize = 384;

/// Sentence embedder backed by an ONNX Runtime session.
pub struct OnnxEmbedder {
    /// Inference needs `&mut Session`; one caller at a time.
    session: Mutex<Session>,
    tokenizer: tokenizers::Tokenizer,
}

// Safety: the session is only reached through the mutex, and tokenizer
// encoding takes `&self` without interior mutation.
unsafe impl Send for OnnxEmbedder {}
unsafe impl Sync for OnnxEmbedder {}

/// Token-level inputs for one sentence, shaped `[1, seq_len]`.
struct EncodedText {
    input_ids: Array2<i64>,
    attention_mask: Array2<i64>,
    token_type_ids: Array2<i64>,
}

impl OnnxEmbedder {
    /// Loads `model_path` and the `tokenizer.json` that sits next to it.
    pub fn new(model_path: &Path) -> Result<Self, TranslandaError> {
        let model_dir = model_path.parent().ok_or_else(|| {
            TranslandaError::embedding(format!(
                "model path has no parent directory: {}",
                model_path.display()
            ))
        })?;

        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = tokenizers::Tokenizer::from_file(&tokenizer_path).map_err(|e| {
            TranslandaError::embedding(format!(
                "cannot load tokenizer {}: {e}",
                tokenizer_path.display()
            ))
        })?;

        let session = Session::builder()
            .map_err(ort_err("cannot create session builder"))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(ort_err("cannot set optimization level"))?
            .with_intra_threads(1)
            .map_err(ort_err("cannot set thread count"))?
            .commit_from_file(model_path)
            .map_err(ort_err("cannot load ONNX model"))?;

        debug!(model = %model_path.display(), "embedding model loaded");

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
        })
    }

    fn encode(&self, text: &str) -> Result<EncodedText, TranslandaError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| TranslandaError::embedding(format!("tokenization failed: {e}")))?;

        let row = |values: &[u32]| -> Result<Array2<i64>, TranslandaError> {
            let widened: Vec<i64> = values.iter().map(|&v| i64::from(v)).collect();
            Array2::from_shape_vec((1, widened.len()), widened)
                .map_err(|e| TranslandaError::embedding(format!("bad input shape: {e}")))
        };

        Ok(EncodedText {
            input_ids: row(encoding.get_ids())?,
            attention_mask: row(encoding.get_attention_mask())?,
            token_type_ids: row(encoding.get_type_ids())?,
        })
    }

    /// Embeds one sentence into a unit-length vector.
    pub fn embed_text(&self, text: &str) -> Result<Vec<f32>, TranslandaError> {
        let encoded = self.encode(text)?;
        let seq_len = encoded.input_ids.ncols();

        let input_ids = TensorRef::from_array_view(&encoded.input_ids)
            .map_err(ort_err("bad input_ids tensor"))?;
        let attention_mask = TensorRef::from_array_view(&encoded.attention_mask)
            .map_err(ort_err("bad attention_mask tensor"))?;
        let token_type_ids = TensorRef::from_array_view(&encoded.token_type_ids)
            .map_err(ort_err("bad token_type_ids tensor"))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| TranslandaError::embedding("embedding session lock poisoned"))?;

        let outputs = session
            .run(ort::inputs![
                "input_ids" => input_ids,
                "attention_mask" => attention_mask,
                "token_type_ids" => token_type_ids
            ])
            .map_err(ort_err("inference failed"))?;

        // last_hidden_state: [1, seq_len, hidden]
        let (shape, hidden_states) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(ort_err("cannot read model output"))?;
        let hidden = shape
            .last()
            .copied()
            .and_then(|d| usize::try_from(d).ok())
            .ok_or_else(|| TranslandaError::embedding("model returned a scalar output"))?;

        let mask: Vec<i64> = encoded.attention_mask.iter().copied().collect();
        let pooled = masked_mean(hidden_states, &mask, seq_len, hidden);
        Ok(unit_length(pooled))
    }
}

fn ort_err<E: std::fmt::Display>(context: &'static str) -> impl Fn(E) -> TranslandaError {
    move |e| TranslandaError::embedding(format!("{context}: {e}"))
}

/// Averages token vectors whose attention mask is set.
fn masked_mean(token_vectors: &[f32], mask: &[i64], seq_len: usize, hidden: usize) -> Vec<f32> {
    let mut sum = vec![0.0f32; hidden];
    let mut kept = 0usize;

    for (token, &m) in mask.iter().enumerate().take(seq_len) {
        if m == 0 {
            continue;
        }
        let row = &token_vectors[token * hidden..(token + 1) * hidden];
        for (acc, v) in sum.iter_mut().zip(row) {
            *acc += v;
        }
        kept += 1;
    }

    if kept > 0 {
        let n = kept as f32;
        sum.iter_mut().for_each(|v| *v /= n);
    }
    sum
}

/// Scales a vector to length 1; near-zero vectors are returned unchanged.
fn unit_length(mut vector: Vec<f32>) -> Vec<f32> {
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        vector.iter_mut().for_each(|v| *v /= norm);
    }
    vector
}

#[async_trait]
impl PluginAdapter for OnnxEmbedder {
    fn name(&self) -> &str {
        "onnx-minilm"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Embedding
    }

    async fn health_check(&self) -> Result<HealthStatus, TranslandaError> {
        Ok(match self.session.lock() {
            Ok(_) => HealthStatus::Healthy,
            Err(_) => HealthStatus::Unhealthy("embedding session lock poisoned".into()),
        })
    }

    async fn shutdown(&self) -> Result<(), TranslandaError> {
        Ok(())
    }
}

#[async_trait]
impl EmbeddingAdapter for OnnxEmbedder {
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, TranslandaError> {
        let embeddings = input
            .texts
            .iter()
            .map(|text| self.embed_text(text))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(EmbeddingOutput {
            embeddings,
            dimensions: EMBEDDING_DIM,
        })
    }
}
