// SPDX-FileCopyrightText: 2026 TransLanda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user conversation transcripts around a single generative call.
//!
//! A `respond` cycle loads the user's transcript (seeding new users from
//! the base conversation and persisting the seed straight away), bounds it
//! to the trailing `max_lines` window, renders the prompt, asks the
//! provider, then appends the user and model lines and persists again.
//!
//! Cycles for the same user are serialised by a per-user lock; cycles for
//! different users run concurrently and only meet inside the backend.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info};

use translanda_config::model::MemoryConfig;
use translanda_core::error::TranslandaError;
use translanda_core::traits::{KnowledgeSource, ProviderAdapter, TranscriptStore};
use translanda_core::types::{ProviderRequest, Transcript, UserId};

use crate::types::{trailing_window, UserState};

/// Prompt rendering and bounding rules for [`ConversationStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationConfig {
    /// Trailing transcript lines used for a prompt.
    pub max_lines: usize,
    pub history_header: String,
    pub user_label: String,
    pub model_label: String,
    /// Substituted when the provider returns no text.
    pub fallback_reply: String,
    /// Model name passed to the provider on every request.
    pub model: String,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self::from_config(&MemoryConfig::default(), "gemini-1.5-pro")
    }
}

impl ConversationConfig {
    pub fn from_config(memory: &MemoryConfig, model: &str) -> Self {
        Self {
            max_lines: memory.max_lines,
            history_header: memory.history_header.clone(),
            user_label: memory.user_label.clone(),
            model_label: memory.model_label.clone(),
            fallback_reply: memory.fallback_reply.clone(),
            model: model.to_string(),
        }
    }
}

/// Owns the user-to-transcript lifecycle on top of a [`TranscriptStore`].
pub struct ConversationStore {
    backend: Arc<dyn TranscriptStore>,
    seed_source: Arc<dyn KnowledgeSource>,
    config: ConversationConfig,
    user_locks: DashMap<UserId, Arc<Mutex<()>>>,
}

impl ConversationStore {
    pub fn new(
        backend: Arc<dyn TranscriptStore>,
        seed_source: Arc<dyn KnowledgeSource>,
        config: ConversationConfig,
    ) -> Self {
        Self {
            backend,
            seed_source,
            config,
            user_locks: DashMap::new(),
        }
    }

    pub fn config(&self) -> &ConversationConfig {
        &self.config
    }

    /// Whether the user has a stored transcript yet.
    pub async fn state(&self, user_id: &UserId) -> Result<UserState, TranslandaError> {
        Ok(match self.backend.get_transcript(user_id).await? {
            Some(_) => UserState::Active,
            None => UserState::Unseen,
        })
    }

    /// The stored transcript, untrimmed.
    pub async fn transcript(&self, user_id: &UserId) -> Result<Option<Transcript>, TranslandaError> {
        self.backend.get_transcript(user_id).await
    }

    /// Runs one conversational turn and returns the reply text.
    ///
    /// Provider and storage failures propagate unchanged; nothing is
    /// retried. An empty provider reply becomes the configured fallback.
    /// The transcript written back is the bounded window plus the new
    /// user and model lines.
    pub async fn respond(
        &self,
        user_id: &UserId,
        message: &str,
        provider: &dyn ProviderAdapter,
    ) -> Result<String, TranslandaError> {
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;

        let transcript = self.load_or_seed(user_id).await?;

        let mut window = trailing_window(&transcript, self.config.max_lines).to_vec();
        if window.len() < transcript.len() {
            debug!(
                user_id = %user_id,
                stored = transcript.len(),
                kept = window.len(),
                "transcript bounded for prompt"
            );
        }

        let prompt = self.build_prompt(&window, message);
        let response = provider
            .complete(ProviderRequest {
                model: self.config.model.clone(),
                prompt,
            })
            .await?;

        let reply = if response.content.trim().is_empty() {
            debug!(user_id = %user_id, "provider returned no text, using fallback");
            self.config.fallback_reply.clone()
        } else {
            response.content
        };

        window.push(format!("{}: {message}", self.config.user_label));
        window.push(format!("{}: {reply}", self.config.model_label));
        self.backend.put_transcript(user_id, &window).await?;

        debug!(user_id = %user_id, lines = window.len(), "transcript persisted");
        Ok(reply)
    }

    /// Renders the prompt: header, history lines, the new user line, and
    /// an open model line for the backend to complete.
    pub fn build_prompt(&self, history: &[String], message: &str) -> String {
        format!(
            "{header}:\n{history}\n{user}: {message}\n{model}:",
            header = self.config.history_header,
            history = history.join("\n"),
            user = self.config.user_label,
            model = self.config.model_label,
        )
    }

    async fn load_or_seed(&self, user_id: &UserId) -> Result<Transcript, TranslandaError> {
        if let Some(transcript) = self.backend.get_transcript(user_id).await? {
            return Ok(transcript);
        }

        let seed = self.seed_source.load_base_conversation().await?;
        self.backend.put_transcript(user_id, &seed).await?;
        info!(user_id = %user_id, lines = seed.len(), "new user seeded");
        Ok(seed)
    }

    fn user_lock(&self, user_id: &UserId) -> Arc<Mutex<()>> {
        self.user_locks
            .entry(user_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone()
    }
}
