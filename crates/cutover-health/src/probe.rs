//! Health check probe logic.
//!
//! Issues HTTP GET probes against a release's health endpoint with a
//! fixed interval between attempts and a per-attempt timeout. A non-2xx
//! response and a connection failure both count as one failed attempt;
//! the first success ends the check.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, warn};

/// Result of a bounded-retry health check. Ephemeral, consulted by the
/// caller and discarded after reporting.
#[derive(Debug, Clone, Serialize)]
pub struct HealthCheckResult {
    pub passed: bool,
    /// Attempts actually issued (≥ 1).
    pub attempts: u32,
    /// Duration of the last attempt, successful or not.
    pub last_latency: Option<Duration>,
    /// Error from the last failed attempt, if the check did not pass.
    pub last_error: Option<String>,
}

/// Why a single probe attempt failed.
#[derive(Debug, thiserror::Error)]
enum ProbeError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("health endpoint returned status {0}")]
    Status(u16),

    #[error("probe timed out")]
    TimedOut,
}

/// Bounded-retry HTTP health probe.
#[derive(Debug, Clone)]
pub struct HealthProbe {
    /// Total attempts budget.
    retries: u32,
    /// Fixed delay between attempts.
    interval: Duration,
    /// Budget for a single attempt.
    timeout: Duration,
}

impl HealthProbe {
    pub fn new(retries: u32, interval: Duration, timeout: Duration) -> Self {
        Self {
            retries: retries.max(1),
            interval,
            timeout,
        }
    }

    /// Probe `http://{address}{path}` until one attempt succeeds or the
    /// attempt budget is exhausted. Never fails: exhaustion returns
    /// `passed: false` with the last error attached.
    pub async fn check(&self, address: &str, path: &str) -> HealthCheckResult {
        let mut last_latency = None;
        let mut last_error = None;

        for attempt in 1..=self.retries {
            let started = Instant::now();
            match probe_once(address, path, self.timeout).await {
                Ok(()) => {
                    debug!(%address, path, attempt, "health probe passed");
                    return HealthCheckResult {
                        passed: true,
                        attempts: attempt,
                        last_latency: Some(started.elapsed()),
                        last_error: None,
                    };
                }
                Err(e) => {
                    debug!(%address, path, attempt, error = %e, "health probe attempt failed");
                    last_latency = Some(started.elapsed());
                    last_error = Some(e.to_string());
                }
            }
            if attempt < self.retries {
                tokio::time::sleep(self.interval).await;
            }
        }

        warn!(%address, path, attempts = self.retries, "health probe exhausted retries");
        HealthCheckResult {
            passed: false,
            attempts: self.retries,
            last_latency,
            last_error,
        }
    }
}

/// Issue one HTTP GET against the endpoint.
async fn probe_once(address: &str, path: &str, timeout: Duration) -> Result<(), ProbeError> {
    let uri = format!("http://{address}{path}");

    let attempt = async {
        let stream = tokio::net::TcpStream::connect(address)
            .await
            .map_err(|e| ProbeError::Connect(e.to_string()))?;

        let io = hyper_util::rt::TokioIo::new(stream);
        let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
            .await
            .map_err(|e| ProbeError::Connect(e.to_string()))?;

        // Drive the connection in the background.
        tokio::spawn(async move {
            let _ = conn.await;
        });

        let req = http::Request::builder()
            .method("GET")
            .uri(&uri)
            .header("host", address)
            .header("user-agent", "cutover-health/0.1")
            .body(http_body_util::Empty::<bytes::Bytes>::new())
            .map_err(|e| ProbeError::Request(e.to_string()))?;

        let resp = sender
            .send_request(req)
            .await
            .map_err(|e| ProbeError::Request(e.to_string()))?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(ProbeError::Status(resp.status().as_u16()))
        }
    };

    match tokio::time::timeout(timeout, attempt).await {
        Ok(result) => result,
        Err(_) => Err(ProbeError::TimedOut),
    }
}
