// SPDX-FileCopyrightText: 2026 TransLanda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation memory and curated-answer matching for the TransLanda bot.
//!
//! ## Architecture
//!
//! - **KnowledgeMatcher**: semantic lookup of user text against curated
//!   question/answer entries (global best phrase, fixed threshold)
//! - **ConversationStore**: per-user transcript seeding, bounding, prompt
//!   assembly, and persistence around one generative call
//! - **Responder**: matcher first, conversation store on a miss
//! - **JsonFileStore**: flat JSON documents for memory, curated entries,
//!   and the seed transcript
//! - **OnnxEmbedder**: local all-MiniLM-L6-v2 inference (384 dims)
//! - **ModelManager**: first-run model download from HuggingFace

pub mod conversation;
pub mod embedder;
pub mod matcher;
pub mod model_manager;
pub mod responder;
pub mod store;
pub mod types;

pub use conversation::{ConversationConfig, ConversationStore};
pub use embedder::OnnxEmbedder;
pub use matcher::{KnowledgeMatcher, MatcherConfig};
pub use model_manager::ModelManager;
pub use responder::Responder;
pub use store::JsonFileStore;
pub use types::*;
