//! # Keep-Alive Pinger
//!
//! Background loop that POSTs a small payload to the hosting space so it is never
//! suspended for inactivity. Every attempt is bounded by a timeout and every failure
//! is logged and swallowed; the loop only ends with the process.

use std::fmt;

use chrono::{DateTime, Local};
use reqwest::StatusCode;
use serde_json::json;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::domain::config::KeepAliveConfig;

/// Result of a single ping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PingOutcome {
    Success { status: u16, body: String },
    /// The target answered with a non-2xx status.
    HttpError { status: u16, body: String },
    /// No response: connection failure or timeout.
    NetworkError { message: String, timed_out: bool },
}

impl PingOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Ephemeral record of one ping, kept only for logging.
#[derive(Debug, Clone)]
pub struct PingAttempt {
    pub timestamp: DateTime<Local>,
    pub outcome: PingOutcome,
}

impl fmt::Display for PingAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let at = self.timestamp.format("%Y-%m-%d %H:%M:%S %z");
        match &self.outcome {
            PingOutcome::Success { status, .. } => write!(f, "[{at}] ok ({status})"),
            PingOutcome::HttpError { status, .. } => write!(f, "[{at}] http error ({status})"),
            PingOutcome::NetworkError { message, timed_out: true } => {
                write!(f, "[{at}] timed out: {message}")
            }
            PingOutcome::NetworkError { message, .. } => write!(f, "[{at}] network error: {message}"),
        }
    }
}

pub struct KeepAlivePinger {
    client: reqwest::Client,
    config: KeepAliveConfig,
}

impl KeepAlivePinger {
    pub fn new(config: KeepAliveConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &KeepAliveConfig {
        &self.config
    }

    /// One POST to the target. Never fails; the error is folded into the outcome.
    pub async fn ping_once(&self) -> PingAttempt {
        info!("[KeepAlive] Ping to {}", self.config.target_url);
        let timestamp = Local::now();

        let result = self
            .client
            .post(&self.config.target_url)
            .bearer_auth(&self.config.auth_token)
            .json(&json!({ "data": ["ping"] }))
            .send()
            .await;

        let outcome = match result {
            Ok(resp) => {
                let status = resp.status();
                match resp.text().await {
                    Ok(body) => classify(status, body),
                    // The timeout covers the body too; a half-read response is not a success.
                    Err(e) => PingOutcome::NetworkError {
                        timed_out: e.is_timeout(),
                        message: format!("failed to read response body (status {status}): {e}"),
                    },
                }
            }
            Err(e) => PingOutcome::NetworkError {
                timed_out: e.is_timeout(),
                message: e.to_string(),
            },
        };

        let attempt = PingAttempt { timestamp, outcome };
        log_attempt(&attempt);
        debug!("[KeepAlive] {}", attempt);
        attempt
    }

    /// Ping, sleep the full interval, repeat. Does not return.
    pub async fn run(self) {
        info!(
            "[KeepAlive] Started: target={} interval={}s timeout={}s",
            self.config.target_url,
            self.config.interval.as_secs(),
            self.config.timeout.as_secs()
        );
        let mut failures: u32 = 0;
        loop {
            let attempt = self.ping_once().await;
            if attempt.outcome.is_success() {
                if failures > 0 {
                    info!("[KeepAlive] Recovered after {} failed attempts", failures);
                }
                failures = 0;
            } else {
                failures = failures.saturating_add(1);
                warn!("[KeepAlive] {} consecutive failed attempts", failures);
            }
            sleep(self.config.interval).await;
        }
    }

    /// Runs the loop on its own task, detached from the gateway and listener.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}

fn classify(status: StatusCode, body: String) -> PingOutcome {
    if status.is_success() {
        PingOutcome::Success {
            status: status.as_u16(),
            body,
        }
    } else {
        PingOutcome::HttpError {
            status: status.as_u16(),
            body,
        }
    }
}

fn log_attempt(attempt: &PingAttempt) {
    match &attempt.outcome {
        PingOutcome::Success { status, body } => {
            info!("[KeepAlive] Response Status Code: {}", status);
            info!("[KeepAlive] Response Content: {}", body);
        }
        PingOutcome::HttpError { status, body } => {
            error!("[KeepAlive] HTTP Error: status={} body={}", status, body);
        }
        PingOutcome::NetworkError { message, timed_out } => {
            error!("[KeepAlive] Request Error (timed_out={}): {}", timed_out, message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::http::{HeaderMap, StatusCode as AxumStatus};
    use axum::routing::post;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/api")
    }

    fn config(url: &str, interval: Duration) -> KeepAliveConfig {
        KeepAliveConfig::new(url, "secret", interval).unwrap()
    }

    #[tokio::test]
    async fn test_success_sends_bearer_and_payload() {
        let seen = Arc::new(std::sync::Mutex::new(None));
        let seen_in = seen.clone();
        let router = Router::new().route(
            "/api",
            post(move |headers: HeaderMap, body: String| {
                let seen = seen_in.clone();
                async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    *seen.lock().unwrap() = Some((auth, body));
                    "pong"
                }
            }),
        );
        let url = serve(router).await;

        let pinger = KeepAlivePinger::new(config(&url, Duration::from_secs(60))).unwrap();
        let attempt = pinger.ping_once().await;

        assert_eq!(
            attempt.outcome,
            PingOutcome::Success {
                status: 200,
                body: "pong".to_string()
            }
        );
        let (auth, body) = seen.lock().unwrap().clone().unwrap();
        assert_eq!(auth, "Bearer secret");
        let payload: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(payload, json!({ "data": ["ping"] }));
    }

    #[tokio::test]
    async fn test_non_2xx_is_http_error() {
        let router = Router::new().route(
            "/api",
            post(|| async { (AxumStatus::SERVICE_UNAVAILABLE, "sleeping") }),
        );
        let url = serve(router).await;

        let pinger = KeepAlivePinger::new(config(&url, Duration::from_secs(60))).unwrap();
        let attempt = pinger.ping_once().await;
        assert!(matches!(attempt.outcome, PingOutcome::HttpError { status: 503, .. }));
        assert!(attempt.to_string().contains("http error (503)"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let pinger =
            KeepAlivePinger::new(config(&format!("http://{addr}/api"), Duration::from_secs(60)))
                .unwrap();
        let attempt = pinger.ping_once().await;
        assert!(matches!(
            attempt.outcome,
            PingOutcome::NetworkError { timed_out: false, .. }
        ));
    }

    #[tokio::test]
    async fn test_loop_survives_repeated_failures() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let router = Router::new().route(
            "/api",
            post(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    AxumStatus::INTERNAL_SERVER_ERROR
                }
            }),
        );
        let url = serve(router).await;

        let pinger = KeepAlivePinger::new(config(&url, Duration::from_millis(50))).unwrap();
        let handle = pinger.spawn();

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(hits.load(Ordering::SeqCst) >= 3);
        assert!(!handle.is_finished());
        handle.abort();
    }

    #[tokio::test]
    async fn test_hung_target_bounded_by_timeout() {
        let router = Router::new().route(
            "/api",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                "late"
            }),
        );
        let url = serve(router).await;

        let cfg = config(&url, Duration::from_secs(3600)).with_timeout(Duration::from_millis(200));
        let pinger = KeepAlivePinger::new(cfg).unwrap();

        let started = Instant::now();
        let attempt = pinger.ping_once().await;
        assert!(started.elapsed() < Duration::from_secs(2));
        assert!(matches!(
            attempt.outcome,
            PingOutcome::NetworkError { timed_out: true, .. }
        ));
    }

    #[tokio::test]
    async fn test_stalled_body_is_network_error() {
        use axum::body::{Body, Bytes};
        use futures::StreamExt;

        let router = Router::new().route(
            "/api",
            post(|| async {
                let head = futures::stream::once(async {
                    Ok::<_, std::io::Error>(Bytes::from_static(b"partial"))
                });
                Body::from_stream(head.chain(futures::stream::pending()))
            }),
        );
        let url = serve(router).await;

        let cfg = config(&url, Duration::from_secs(3600)).with_timeout(Duration::from_millis(300));
        let pinger = KeepAlivePinger::new(cfg).unwrap();

        let started = Instant::now();
        let attempt = pinger.ping_once().await;
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(matches!(attempt.outcome, PingOutcome::NetworkError { .. }));
        assert!(attempt.to_string().contains("response body"));
    }

    #[test]
    fn test_classify() {
        assert!(classify(StatusCode::NO_CONTENT, String::new()).is_success());
        assert!(!classify(StatusCode::NOT_FOUND, String::new()).is_success());
    }
}
