// SPDX-FileCopyrightText: 2026 TransLanda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! USD to VES exchange rate scraped from a currency converter page.

use std::time::Duration;

use scraper::{Html, Selector};
use tracing::{debug, warn};

use translanda_config::model::ExchangeConfig;
use translanda_core::TranslandaError;

/// Fetches the converter page and reads the rate out of one element.
pub struct ExchangeRateScraper {
    client: reqwest::Client,
    url: String,
    selector: String,
    fallback_url: String,
}

impl ExchangeRateScraper {
    /// Fails when the configured CSS selector does not parse.
    pub fn new(config: &ExchangeConfig) -> Result<Self, TranslandaError> {
        Selector::parse(&config.selector).map_err(|e| {
            TranslandaError::Config(format!("invalid exchange.selector {:?}: {e}", config.selector))
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(crate::USER_AGENT)
            .build()
            .map_err(|e| TranslandaError::Scrape {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            url: config.url.clone(),
            selector: config.selector.clone(),
            fallback_url: config.fallback_url.clone(),
        })
    }

    /// The trimmed text of the first matching element, `None` if absent.
    pub async fn fetch_rate(&self) -> Result<Option<String>, TranslandaError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| TranslandaError::Scrape {
                message: format!("exchange page request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let html = response.text().await.map_err(|e| TranslandaError::Scrape {
            message: format!("failed to read exchange page: {e}"),
            source: Some(Box::new(e)),
        })?;

        let rate = extract_first_text(&html, &self.selector);
        debug!(url = %self.url, found = rate.is_some(), "exchange page scraped");
        Ok(rate)
    }

    /// User-facing rate message; lookup failures become a pointer to the
    /// fallback page instead of an error.
    pub async fn rate_message(&self) -> String {
        match self.fetch_rate().await {
            Ok(Some(rate)) => format!("💵 1 USD = {rate} Bs. VES"),
            Ok(None) => "⚠️ No se pudo encontrar el precio del dólar.".to_string(),
            Err(e) => {
                warn!(error = %e, "exchange rate lookup failed");
                format!(
                    "❌ Error al obtener el precio del dólar: {}",
                    self.fallback_url
                )
            }
        }
    }
}

/// Trimmed text of the first element matching `selector`.
///
/// Empty text counts as not found.
pub fn extract_first_text(html: &str, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    let document = Html::parse_document(html);
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}
