// SPDX-FileCopyrightText: 2026 TransLanda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the TransLanda bot.

use std::path::PathBuf;

use thiserror::Error;

/// The primary error type used across all TransLanda adapters and core operations.
#[derive(Debug, Error)]
pub enum TranslandaError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Flat-store I/O errors (file read/write, rename, directory creation).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A flat-store document exists but is not valid JSON of the expected shape.
    #[error("malformed store {}: {source}", path.display())]
    MalformedStore {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Messaging channel errors (send failure, invalid chat id).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Generative backend errors (API failure, unparseable response).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Embedding backend errors (tokenization, inference, model files).
    #[error("embedding error: {message}")]
    Embedding {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Third-party page or search API lookups.
    #[error("lookup error: {message}")]
    Scrape {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TranslandaError {
    /// Wraps an I/O error as a storage error.
    pub fn storage(err: std::io::Error) -> Self {
        TranslandaError::Storage {
            source: Box::new(err),
        }
    }

    /// Builds an embedding error without an underlying source.
    pub fn embedding(message: impl Into<String>) -> Self {
        TranslandaError::Embedding {
            message: message.into(),
            source: None,
        }
    }
}
