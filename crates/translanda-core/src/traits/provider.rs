// SPDX-FileCopyrightText: 2026 TransLanda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for generative-language backends.

use async_trait::async_trait;

use crate::error::TranslandaError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ProviderRequest, ProviderResponse};

/// Adapter for a generative-language backend.
///
/// A response with empty `content` is a valid outcome, not an error.
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Sends a single prompt and returns the full response.
    async fn complete(&self, request: ProviderRequest)
        -> Result<ProviderResponse, TranslandaError>;
}
