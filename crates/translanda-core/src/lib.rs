// SPDX-FileCopyrightText: 2026 TransLanda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the TransLanda bot.
//!
//! This crate provides the trait definitions, error type, and common types
//! shared by the knowledge matcher, the conversation store, and the
//! external collaborators (embedding model, generative backend, flat store,
//! messaging platform).

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::TranslandaError;
pub use types::{
    AdapterType, HealthStatus, KnowledgeEntry, MemoryMap, ProviderRequest, ProviderResponse,
    Transcript, UserId,
};

// Re-export all adapter traits at crate root.
pub use traits::{
    EmbeddingAdapter, KnowledgeSource, PluginAdapter, ProviderAdapter, TranscriptStore,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translanda_error_has_all_variants() {
        let _config = TranslandaError::Config("test".into());
        let _storage = TranslandaError::storage(std::io::Error::other("test"));
        let _malformed = TranslandaError::MalformedStore {
            path: "memoria.json".into(),
            source: serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
        };
        let _channel = TranslandaError::Channel {
            message: "test".into(),
            source: None,
        };
        let _provider = TranslandaError::Provider {
            message: "test".into(),
            source: None,
        };
        let _embedding = TranslandaError::embedding("test");
        let _scrape = TranslandaError::Scrape {
            message: "test".into(),
            source: None,
        };
        let _internal = TranslandaError::Internal("test".into());
    }

    #[test]
    fn malformed_store_message_names_the_file() {
        let err = TranslandaError::MalformedStore {
            path: "data/memoria.json".into(),
            source: serde_json::from_str::<serde_json::Value>("[1,").unwrap_err(),
        };
        assert!(err.to_string().contains("data/memoria.json"), "got: {err}");
    }

    #[test]
    fn adapter_type_round_trips_through_strings() {
        use std::str::FromStr;

        for variant in [
            AdapterType::Channel,
            AdapterType::Provider,
            AdapterType::Embedding,
        ] {
            let s = variant.to_string();
            assert_eq!(AdapterType::from_str(&s).unwrap(), variant);
        }
    }

    #[test]
    fn all_trait_modules_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_provider_adapter<T: ProviderAdapter>() {}
        fn _assert_embedding_adapter<T: EmbeddingAdapter>() {}
        fn _assert_transcript_store<T: TranscriptStore>() {}
        fn _assert_knowledge_source<T: KnowledgeSource>() {}
    }
}
