// SPDX-FileCopyrightText: 2026 TransLanda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for TransLanda integration tests.
//!
//! Provides mock adapters and a temp-dir harness for fast, deterministic,
//! CI-runnable tests without the ONNX model or network access.
//!
//! # Components
//!
//! - [`MockProvider`] - generative backend with queued replies and prompt capture
//! - [`MockEmbedder`] - hashed bag-of-words embedder, identical text scores 1.0
//! - [`TestHarness`] - JSON store, matcher, conversation store, and responder in a temp dir

pub mod harness;
pub mod mock_embedder;
pub mod mock_provider;

pub use harness::TestHarness;
pub use mock_embedder::MockEmbedder;
pub use mock_provider::MockProvider;
