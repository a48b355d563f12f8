// SPDX-FileCopyrightText: 2026 TransLanda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Liveness listener for external uptime monitors.
//!
//! Serves a single `GET /` returning a constant body. It shares no state
//! with the bot, so a wedged dispatcher still reports alive.

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::routing::get;
use tokio::task::JoinHandle;
use tracing::{error, info};

use translanda_config::model::LivenessConfig;
use translanda_core::TranslandaError;

#[derive(Clone)]
struct LivenessState {
    message: Arc<str>,
}

/// Builds the liveness router answering `GET /` with `message`.
pub fn router(message: impl Into<String>) -> Router {
    let state = LivenessState {
        message: Arc::from(message.into()),
    };
    Router::new().route("/", get(alive)).with_state(state)
}

async fn alive(State(state): State<LivenessState>) -> String {
    state.message.to_string()
}

/// Binds `host:port` and serves the liveness router until the process exits.
pub async fn start_server(config: &LivenessConfig) -> Result<(), TranslandaError> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| TranslandaError::Channel {
            message: format!("failed to bind liveness listener to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    info!("Liveness listener on {addr}");

    axum::serve(listener, router(config.message.clone()))
        .await
        .map_err(|e| TranslandaError::Channel {
            message: format!("liveness server error: {e}"),
            source: Some(Box::new(e)),
        })
}

/// Runs [`start_server`] on its own task. Returns `None` when disabled.
pub fn spawn(config: &LivenessConfig) -> Option<JoinHandle<()>> {
    if !config.enabled {
        info!("liveness listener disabled");
        return None;
    }
    let config = config.clone();
    Some(tokio::spawn(async move {
        if let Err(e) = start_server(&config).await {
            error!(error = %e, "liveness listener stopped");
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn root_returns_configured_message() {
        let response = router("Bot está activo!")
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], "Bot está activo!".as_bytes());
    }

    #[tokio::test]
    async fn other_paths_are_not_found() {
        let response = router("ok")
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn post_is_rejected() {
        let response = router("ok")
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn disabled_listener_is_not_spawned() {
        let config = LivenessConfig {
            enabled: false,
            ..LivenessConfig::default()
        };
        assert!(spawn(&config).is_none());
    }

    #[tokio::test]
    async fn bind_failure_is_channel_error() {
        let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = taken.local_addr().unwrap().port();
        let config = LivenessConfig {
            host: "127.0.0.1".into(),
            port,
            ..LivenessConfig::default()
        };
        let err = start_server(&config).await.unwrap_err();
        assert!(matches!(err, TranslandaError::Channel { .. }));
    }
}
