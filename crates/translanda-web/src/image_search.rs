// SPDX-FileCopyrightText: 2026 TransLanda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Image lookup through the Google Custom Search JSON API.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use translanda_config::model::SearchConfig;
use translanda_core::TranslandaError;

const API_BASE_URL: &str = "https://www.googleapis.com/customsearch/v1";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    link: String,
}

/// Returns the link of the first image result for a query.
pub struct ImageSearchClient {
    client: reqwest::Client,
    api_key: String,
    engine_id: String,
    base_url: String,
}

impl ImageSearchClient {
    /// Requires both `search.api_key` and `search.engine_id`.
    pub fn new(config: &SearchConfig) -> Result<Self, TranslandaError> {
        let (Some(api_key), Some(engine_id)) = (
            config.api_key.as_deref().filter(|k| !k.is_empty()),
            config.engine_id.as_deref().filter(|id| !id.is_empty()),
        ) else {
            return Err(TranslandaError::Config(
                "image search needs search.api_key and search.engine_id".into(),
            ));
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| TranslandaError::Scrape {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            engine_id: engine_id.to_string(),
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Overrides the endpoint (for testing with wiremock).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Link of the first image result, `None` when there are no results or
    /// the body is not the expected JSON.
    pub async fn search(&self, query: &str) -> Result<Option<String>, TranslandaError> {
        let url = reqwest::Url::parse_with_params(
            &self.base_url,
            &[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", query),
                ("searchType", "image"),
            ],
        )
        .map_err(|e| TranslandaError::Config(format!("invalid search endpoint: {e}")))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TranslandaError::Scrape {
                message: format!("image search request failed: {e}"),
                source: Some(Box::new(e)),
            })?;
        let status = response.status();
        let body = response.text().await.map_err(|e| TranslandaError::Scrape {
            message: format!("failed to read image search response: {e}"),
            source: Some(Box::new(e)),
        })?;

        match serde_json::from_str::<SearchResponse>(&body) {
            Ok(parsed) => {
                let link = parsed.items.into_iter().next().map(|item| item.link);
                debug!(query, status = %status, found = link.is_some(), "image search done");
                Ok(link)
            }
            Err(e) => {
                warn!(status = %status, error = %e, "image search response is not valid JSON");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> ImageSearchClient {
        ImageSearchClient::new(&SearchConfig {
            api_key: Some("search-key".into()),
            engine_id: Some("cx-123".into()),
        })
        .unwrap()
        .with_base_url(server.uri())
    }

    #[test]
    fn missing_credentials_are_config_error() {
        assert!(ImageSearchClient::new(&SearchConfig::default()).is_err());
        assert!(ImageSearchClient::new(&SearchConfig {
            api_key: Some("k".into()),
            engine_id: Some(String::new()),
        })
        .is_err());
    }

    #[tokio::test]
    async fn returns_first_item_link() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("key", "search-key"))
            .and(query_param("cx", "cx-123"))
            .and(query_param("q", "playa adicora"))
            .and(query_param("searchType", "image"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [
                    {"link": "https://img.example/1.jpg"},
                    {"link": "https://img.example/2.jpg"}
                ]
            })))
            .mount(&server)
            .await;

        let link = client(&server).search("playa adicora").await.unwrap();
        assert_eq!(link.as_deref(), Some("https://img.example/1.jpg"));
    }

    #[tokio::test]
    async fn no_items_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "searchInformation": {"totalResults": "0"}
            })))
            .mount(&server)
            .await;

        assert!(client(&server).search("zzz").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn non_json_body_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        assert!(client(&server).search("x").await.unwrap().is_none());
    }
}
