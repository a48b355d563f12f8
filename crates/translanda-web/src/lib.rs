// SPDX-FileCopyrightText: 2026 TransLanda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Third-party web lookups used by bot commands.
//!
//! - [`ExchangeRateScraper`]: USD to VES rate read from a public converter page
//! - [`ImageSearchClient`]: first image result from the Custom Search JSON API

pub mod exchange;
pub mod image_search;

pub use exchange::ExchangeRateScraper;
pub use image_search::ImageSearchClient;

/// Browser-like user agent; some pages refuse obvious bots.
pub(crate) const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
