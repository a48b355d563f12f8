// SPDX-FileCopyrightText: 2026 TransLanda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types for the matcher and the conversation store.

use serde::{Deserialize, Serialize};
use translanda_core::error::TranslandaError;
use translanda_core::types::{KnowledgeEntry, Transcript};

/// A curated answer selected by the knowledge matcher.
#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeMatch {
    /// The canonical response of the winning entry.
    pub response: String,
    /// The trigger phrase that scored highest.
    pub phrase: String,
    /// Cosine similarity between the user text and `phrase`.
    pub score: f32,
}

/// Lifecycle of a user identifier in the memory store.
///
/// `Unseen -> Active` happens once, on the first `respond` call.
/// `Active` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserState {
    /// No transcript stored for this user.
    Unseen,
    /// A transcript exists (possibly just the seed lines).
    Active,
}

/// Where a reply came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Answered from the curated knowledge base; nothing was persisted.
    Curated(String),
    /// Answered by the generative backend and recorded in the transcript.
    Generated(String),
}

impl Reply {
    /// The reply text, regardless of origin.
    pub fn text(&self) -> &str {
        match self {
            Reply::Curated(text) | Reply::Generated(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Reply::Curated(text) | Reply::Generated(text) => text,
        }
    }

    pub fn is_curated(&self) -> bool {
        matches!(self, Reply::Curated(_))
    }
}

/// On-disk shape of the curated entries file: `{"preguntas": [...]}`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CuratedDocument {
    #[serde(default)]
    pub preguntas: Vec<KnowledgeEntry>,
}

/// On-disk shape of the seed transcript file: `{"conversacion_base": [...]}`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BaseConversationDocument {
    #[serde(default)]
    pub conversacion_base: Transcript,
}

/// Returns the trailing `max_lines` window of a transcript.
pub fn trailing_window(transcript: &[String], max_lines: usize) -> &[String] {
    let start = transcript.len().saturating_sub(max_lines);
    &transcript[start..]
}

/// Compute the cosine similarity between two vectors.
///
/// Unlike a plain dot product this does not assume unit-length input, so
/// any embedding backend can be plugged in. A zero vector has no direction
/// and scores 0.0 against everything.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, TranslandaError> {
    if a.len() != b.len() {
        return Err(TranslandaError::embedding(format!(
            "embedding length mismatch: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a <= f32::EPSILON || norm_b <= f32::EPSILON {
        return Ok(0.0);
    }

    Ok((dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_similarity_identical_vectors() {
        let v = vec![0.3, -1.2, 4.0];
        let sim = cosine_similarity(&v, &v).unwrap();
        assert!((sim - 1.0).abs() < 1e-6, "got {sim}");
    }

    #[test]
    fn cosine_similarity_ignores_magnitude() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![2.0, 4.0, 6.0];
        let sim = cosine_similarity(&a, &b).unwrap();
        assert!((sim - 1.0).abs() < 1e-6, "got {sim}");
    }

    #[test]
    fn cosine_similarity_orthogonal() {
        let sim = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap();
        assert!(sim.abs() < f32::EPSILON);
    }

    #[test]
    fn cosine_similarity_opposite() {
        let sim = cosine_similarity(&[1.0, 0.0], &[-3.0, 0.0]).unwrap();
        assert!((sim + 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_similarity_zero_vector_scores_zero() {
        let sim = cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]).unwrap();
        assert_eq!(sim, 0.0);
    }

    #[test]
    fn cosine_similarity_rejects_length_mismatch() {
        let err = cosine_similarity(&[1.0], &[1.0, 0.0]).unwrap_err();
        assert!(matches!(err, TranslandaError::Embedding { .. }));
    }

    #[test]
    fn trailing_window_keeps_most_recent_lines() {
        let lines: Vec<String> = (0..5).map(|i| format!("line {i}")).collect();
        assert_eq!(trailing_window(&lines, 2), &lines[3..]);
        assert_eq!(trailing_window(&lines, 5), &lines[..]);
        assert_eq!(trailing_window(&lines, 10), &lines[..]);
    }

    #[test]
    fn curated_document_parses_entries_without_keys() {
        let doc: CuratedDocument = serde_json::from_str(
            r#"{"preguntas": [{"keys": ["hola"], "response": "¡Hola!"}, {"response": "sin claves"}]}"#,
        )
        .unwrap();
        assert_eq!(doc.preguntas.len(), 2);
        assert!(doc.preguntas[1].keys.is_empty());
    }

    #[test]
    fn base_conversation_document_defaults_to_empty() {
        let doc: BaseConversationDocument = serde_json::from_str("{}").unwrap();
        assert!(doc.conversacion_base.is_empty());
    }

    #[test]
    fn reply_text_accessors() {
        let curated = Reply::Curated("a".into());
        let generated = Reply::Generated("b".into());
        assert!(curated.is_curated());
        assert!(!generated.is_curated());
        assert_eq!(curated.text(), "a");
        assert_eq!(generated.into_text(), "b");
    }
}
