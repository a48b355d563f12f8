// SPDX-FileCopyrightText: 2026 TransLanda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Gemini `generateContent` endpoint.
//!
//! One request per call, no retries. Non-2xx responses become provider
//! errors carrying the API's own message when it sent one.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use translanda_core::TranslandaError;

use crate::types::{ApiErrorResponse, GenerateContentRequest, GenerateContentResponse};

/// Base URL of the Generative Language API.
const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    /// Creates a client that authenticates with `api_key` on every request.
    pub fn new(api_key: &str, timeout: Duration) -> Result<Self, TranslandaError> {
        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(api_key)
            .map_err(|e| TranslandaError::Config(format!("invalid Gemini API key header value: {e}")))?;
        key.set_sensitive(true);
        headers.insert("x-goog-api-key", key);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| TranslandaError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{model}:generateContent",
            self.base_url.trim_end_matches('/')
        )
    }

    /// Sends `request` to `model` and returns the parsed response.
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, TranslandaError> {
        let response = self
            .client
            .post(self.endpoint(model))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TranslandaError::Provider {
                        message: "Gemini request timed out".into(),
                        source: Some(Box::new(e)),
                    }
                } else {
                    TranslandaError::Provider {
                        message: format!("HTTP request failed: {e}"),
                        source: Some(Box::new(e)),
                    }
                }
            })?;

        let status = response.status();
        debug!(status = %status, model, "generateContent response received");

        let body = response.text().await.map_err(|e| TranslandaError::Provider {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => format!(
                    "Gemini API error ({} {}): {}",
                    api_err.error.code, api_err.error.status, api_err.error.message
                ),
                Err(_) => format!("API returned {status}: {body}"),
            };
            return Err(TranslandaError::Provider {
                message,
                source: None,
            });
        }

        serde_json::from_str(&body).map_err(|e| TranslandaError::Provider {
            message: format!("failed to parse API response: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> GeminiClient {
        GeminiClient::new("test-api-key", Duration::from_secs(5))
            .unwrap()
            .with_base_url(base_url)
    }

    #[tokio::test]
    async fn generate_content_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/gemini-1.5-pro:generateContent"))
            .and(header("x-goog-api-key", "test-api-key"))
            .and(body_json(serde_json::json!({
                "contents": [{"role": "user", "parts": [{"text": "hola"}]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "¡Hola!"}]}, "finishReason": "STOP"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let resp = client
            .generate_content("gemini-1.5-pro", &GenerateContentRequest::from_prompt("hola"))
            .await
            .unwrap();
        assert_eq!(resp.text(), "¡Hola!");
    }

    #[tokio::test]
    async fn api_error_message_is_surfaced() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}
            })))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .generate_content("gemini-1.5-pro", &GenerateContentRequest::from_prompt("x"))
            .await
            .unwrap_err();
        let text = err.to_string();
        assert!(text.contains("API key not valid"), "got: {text}");
        assert!(text.contains("INVALID_ARGUMENT"), "got: {text}");
    }

    #[tokio::test]
    async fn server_error_is_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .expect(1)
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .generate_content("gemini-1.5-pro", &GenerateContentRequest::from_prompt("x"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("503"), "got: {err}");
    }

    #[tokio::test]
    async fn unparseable_success_body_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .generate_content("gemini-1.5-pro", &GenerateContentRequest::from_prompt("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, TranslandaError::Provider { .. }));
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let client = test_client("http://localhost:1234/");
        assert_eq!(
            client.endpoint("gemini-1.5-flash"),
            "http://localhost:1234/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn invalid_key_is_a_config_error() {
        let err = GeminiClient::new("bad\nkey", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, TranslandaError::Config(_)));
    }
}
