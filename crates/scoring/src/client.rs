//! HTTP client for the scoring oracle.
//!
//! Wraps `POST /calculate-risk` and the `GET /` health probe using
//! [`reqwest`]. Every call is a single attempt bounded by the configured
//! timeout; retry policy belongs to callers.

use std::fmt;
use std::time::Duration;

use crate::messages::{parse_score_response, ScoreResult, ScoringRequest};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Which way a scoring call failed. Callers treat all kinds alike; the
/// kind exists for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringFailureKind {
    /// Connection, DNS, TLS, or body read failure.
    Transport,
    /// The call exceeded the configured timeout.
    Timeout,
    /// The oracle returned a non-2xx status.
    Status,
    /// 2xx with a body missing required fields or out of range.
    Malformed,
}

impl fmt::Display for ScoringFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Transport => "transport error",
            Self::Timeout => "timed out",
            Self::Status => "error status",
            Self::Malformed => "malformed response",
        };
        f.write_str(label)
    }
}

/// A failed scoring call with a human-readable cause.
#[derive(Debug, Clone, thiserror::Error)]
#[error("scoring oracle {kind}: {cause}")]
pub struct ScoringFailure {
    pub kind: ScoringFailureKind,
    pub cause: String,
}

impl ScoringFailure {
    pub fn new(kind: ScoringFailureKind, cause: impl Into<String>) -> Self {
        Self {
            kind,
            cause: cause.into(),
        }
    }

    fn from_reqwest(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ScoringFailureKind::Timeout
        } else {
            ScoringFailureKind::Transport
        };
        Self::new(kind, err.to_string())
    }
}

// ---------------------------------------------------------------------------
// ScoringClient
// ---------------------------------------------------------------------------

/// HTTP client for a single scoring oracle instance.
#[derive(Clone)]
pub struct ScoringClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl ScoringClient {
    /// Create a client.
    ///
    /// * `base_url` - e.g. `http://localhost:8000`; a trailing slash is trimmed.
    /// * `timeout` - applied to every request end to end.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url, timeout))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Score one property.
    ///
    /// Sends `POST /calculate-risk` and validates the answer. Network
    /// failures, timeouts, non-2xx statuses, and malformed bodies all come
    /// back as [`ScoringFailure`].
    pub async fn score(&self, request: &ScoringRequest) -> Result<ScoreResult, ScoringFailure> {
        tracing::debug!(
            property_id = %request.property_id,
            base_url = %self.base_url,
            "Requesting risk score"
        );

        let response = self
            .client
            .post(format!("{}/calculate-risk", self.base_url))
            .timeout(self.timeout)
            .json(request)
            .send()
            .await
            .map_err(ScoringFailure::from_reqwest)?;

        let response = Self::ensure_success(response).await?;
        let body = response
            .bytes()
            .await
            .map_err(ScoringFailure::from_reqwest)?;

        parse_score_response(&body)
            .map_err(|e| ScoringFailure::new(ScoringFailureKind::Malformed, e.to_string()))
    }

    /// Probe `GET /` to check the oracle is reachable and healthy.
    pub async fn health(&self) -> Result<(), ScoringFailure> {
        let response = self
            .client
            .get(format!("{}/", self.base_url))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(ScoringFailure::from_reqwest)?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    // ---- private helpers ----

    /// Return the response unchanged on a 2xx status, otherwise a
    /// [`ScoringFailureKind::Status`] failure carrying the status and body.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ScoringFailure> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ScoringFailure::new(
                ScoringFailureKind::Status,
                format!("HTTP {}: {body}", status.as_u16()),
            ));
        }
        Ok(response)
    }
}
