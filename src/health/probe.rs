//! Single-endpoint liveness probe.
//!
//! A probe returns a [`ProbeStatus`] indicating the endpoint state:
//!
//! - [`Available`](ProbeStatus::Available): health route answered 2xx
//! - [`NotRunning`](ProbeStatus::NotRunning): connection refused / unreachable
//! - [`Timeout`](ProbeStatus::Timeout): no response within deadline
//! - [`Unhealthy`](ProbeStatus::Unhealthy): responds with an error status code
//! - [`TransportError`](ProbeStatus::TransportError): any other client failure

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

use crate::config::RouteConfig;
use crate::error::{AdvisoryError, Result};

/// Status of one endpoint after probing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProbeStatus {
    /// Endpoint answered the health route with a 2xx status.
    Available {
        /// Round-trip latency in milliseconds.
        latency_ms: u64,
    },
    /// Endpoint is not running (connection refused / unreachable).
    NotRunning,
    /// Probe timed out waiting for a response.
    Timeout,
    /// Endpoint responded with an HTTP error status.
    Unhealthy {
        /// HTTP status code.
        status_code: u16,
    },
    /// Request failed for another reason (TLS, malformed URL, ...).
    TransportError {
        /// Description of the failure.
        detail: String,
    },
}

impl ProbeStatus {
    /// Returns `true` if the endpoint is live.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available { latency_ms } => write!(f, "available ({latency_ms}ms)"),
            Self::NotRunning => write!(f, "not running (connection refused)"),
            Self::Timeout => write!(f, "timeout (no response)"),
            Self::Unhealthy { status_code } => write!(f, "unhealthy (HTTP {status_code})"),
            Self::TransportError { detail } => write!(f, "transport error: {detail}"),
        }
    }
}

/// Issues `GET {endpoint}{health_path}` with a bounded timeout.
#[derive(Debug, Clone)]
pub struct EndpointProbe {
    client: reqwest::Client,
    health_path: String,
}

impl EndpointProbe {
    /// Create a probe whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// [`AdvisoryError::Config`] if the HTTP client cannot be built (for
    /// example when the TLS backend fails to initialise).
    pub fn new(timeout: Duration, routes: &RouteConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| AdvisoryError::Config(format!("building health probe client: {e}")))?;
        Ok(Self {
            client,
            health_path: routes.health.clone(),
        })
    }

    /// Probe one endpoint. Never fails; every outcome is a [`ProbeStatus`].
    pub async fn check(&self, endpoint: &str) -> ProbeStatus {
        let url = RouteConfig::url(endpoint, &self.health_path);
        let start = Instant::now();
        match self.client.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => ProbeStatus::Available {
                latency_ms: start.elapsed().as_millis() as u64,
            },
            Ok(resp) => ProbeStatus::Unhealthy {
                status_code: resp.status().as_u16(),
            },
            Err(e) => classify_reqwest_error(&e),
        }
    }
}

/// Classify a reqwest error into a ProbeStatus.
fn classify_reqwest_error(err: &reqwest::Error) -> ProbeStatus {
    if err.is_timeout() {
        ProbeStatus::Timeout
    } else if err.is_connect() {
        ProbeStatus::NotRunning
    } else {
        ProbeStatus::TransportError {
            detail: err.to_string(),
        }
    }
}
