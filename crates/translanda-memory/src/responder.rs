// SPDX-FileCopyrightText: 2026 TransLanda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound text routing: curated knowledge first, generative model on a miss.

use std::sync::Arc;

use tracing::debug;

use translanda_core::error::TranslandaError;
use translanda_core::traits::ProviderAdapter;
use translanda_core::types::UserId;

use crate::conversation::ConversationStore;
use crate::matcher::KnowledgeMatcher;
use crate::types::Reply;

/// Answers one user message.
///
/// Curated answers are returned as-is and leave the transcript untouched. A
/// curated entry with a blank response counts as a miss.
pub struct Responder {
    matcher: Arc<KnowledgeMatcher>,
    conversations: Arc<ConversationStore>,
    provider: Arc<dyn ProviderAdapter>,
}

impl Responder {
    pub fn new(
        matcher: Arc<KnowledgeMatcher>,
        conversations: Arc<ConversationStore>,
        provider: Arc<dyn ProviderAdapter>,
    ) -> Self {
        Self {
            matcher,
            conversations,
            provider,
        }
    }

    pub fn conversations(&self) -> &ConversationStore {
        &self.conversations
    }

    pub async fn reply(&self, user_id: &UserId, text: &str) -> Result<Reply, TranslandaError> {
        let text = text.trim();

        match self.matcher.find_match(text).await? {
            Some(found) if found.response.trim().is_empty() => {
                debug!(
                    user_id = %user_id,
                    phrase = %found.phrase,
                    "curated entry has no response, asking the model"
                );
            }
            Some(found) => {
                debug!(
                    user_id = %user_id,
                    phrase = %found.phrase,
                    score = found.score,
                    "answered from knowledge base"
                );
                return Ok(Reply::Curated(found.response));
            }
            None => {}
        }

        let reply = self
            .conversations
            .respond(user_id, text, self.provider.as_ref())
            .await?;
        Ok(Reply::Generated(reply))
    }
}
