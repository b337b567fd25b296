//! # Keep-Alive Receiver
//!
//! Minimal inbound HTTP endpoint (`POST /keep_alive`). Any JSON body is logged and
//! acknowledged. A body that cannot be read or parsed, including one over
//! [`MAX_BODY_BYTES`], still gets a 200 with an error status in the payload, so
//! whatever pings this space never sees a transport failure.

use anyhow::{Context, Result};
use axum::Router;
use axum::body::Bytes;
use axum::extract::DefaultBodyLimit;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::post;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::domain::config::HttpConfig;
use crate::strings::logs;

/// Largest keep-alive body read into memory.
pub const MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeepAliveAck {
    pub status: String,
    pub message: String,
}

impl KeepAliveAck {
    fn success() -> Self {
        Self {
            status: "success".to_string(),
            message: "KeepAlive received".to_string(),
        }
    }

    fn error() -> Self {
        Self {
            status: "error".to_string(),
            message: "Invalid request".to_string(),
        }
    }
}

pub fn router() -> Router {
    Router::new()
        .route("/keep_alive", post(keep_alive_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}

async fn keep_alive_handler(
    body: Result<Bytes, BytesRejection>,
) -> (StatusCode, Json<KeepAliveAck>) {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            error!("[KeepAlive] Error reading request body: {}", rejection.body_text());
            return (StatusCode::OK, Json(KeepAliveAck::error()));
        }
    };
    match serde_json::from_slice::<serde_json::Value>(&body) {
        Ok(data) => {
            info!("[KeepAlive] Received data: {}", data);
            (StatusCode::OK, Json(KeepAliveAck::success()))
        }
        Err(e) => {
            error!("[KeepAlive] Error processing request: {}", e);
            (StatusCode::OK, Json(KeepAliveAck::error()))
        }
    }
}

/// Serves the receiver until the listener fails.
pub async fn serve(listener: TcpListener) -> Result<()> {
    let addr = listener.local_addr()?;
    info!("{}", logs::http_listening(&addr.to_string()));
    axum::serve(listener, router())
        .await
        .context("Keep-alive listener stopped")
}

/// Binds the listener. The host may be an IP literal or a resolvable name.
pub async fn bind(config: &HttpConfig) -> Result<TcpListener> {
    TcpListener::bind((config.bind_host(), config.port))
        .await
        .with_context(|| format!("Failed to bind keep-alive listener on {}", config.bind_addr()))
}
