// SPDX-FileCopyrightText: 2026 TransLanda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage traits for conversation memory and curated knowledge.

use async_trait::async_trait;

use crate::error::TranslandaError;
use crate::types::{KnowledgeEntry, MemoryMap, Transcript, UserId};

/// Durable mapping from user identifier to transcript.
///
/// The per-key methods are what the conversation store uses. A whole-document
/// backend implements them as read-modify-write of the full mapping.
#[async_trait]
pub trait TranscriptStore: Send + Sync {
    /// Reads the full mapping. An absent store is an empty mapping.
    async fn load_memory(&self) -> Result<MemoryMap, TranslandaError>;

    /// Replaces the full mapping.
    async fn save_memory(&self, memory: &MemoryMap) -> Result<(), TranslandaError>;

    /// Returns the transcript of one user, or `None` if the user was never seen.
    async fn get_transcript(&self, user_id: &UserId)
        -> Result<Option<Transcript>, TranslandaError>;

    /// Stores the transcript of one user, leaving every other user untouched.
    async fn put_transcript(
        &self,
        user_id: &UserId,
        transcript: &Transcript,
    ) -> Result<(), TranslandaError>;
}

/// Read-only source of the curated knowledge base and the seed transcript.
#[async_trait]
pub trait KnowledgeSource: Send + Sync {
    /// Curated entries. Absent or malformed input yields an empty list.
    async fn load_curated_entries(&self) -> Result<Vec<KnowledgeEntry>, TranslandaError>;

    /// Seed lines for new users. Absent input yields an empty list.
    async fn load_base_conversation(&self) -> Result<Transcript, TranslandaError>;
}
