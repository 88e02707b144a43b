//! Transport abstraction for dispatching prepared API requests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::warn;

use crate::{ErrorKind, Result, SerperError};

/// Hard cap on response body size, applied on every read path.
pub const MAX_RESPONSE_BYTES: usize = 10 * 1024 * 1024;

/// A prepared API request, ready for dispatch.
///
/// The body is owned and the type is `Clone`, so retry middleware can
/// replay the request on subsequent attempts.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// Full endpoint URL.
    pub url: String,
    /// API key sent in the `X-API-KEY` header.
    pub api_key: String,
    /// JSON request body.
    pub body: Vec<u8>,
}

/// A response as seen by the client: status plus the buffered body.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Raw response body.
    pub body: Vec<u8>,
}

/// Trait for executing a prepared request against the API.
///
/// Implementations may be a plain HTTP client, a retrying or tracing
/// wrapper, or a test double. All configuration (timeouts, connection
/// pooling) is set at construction time; `execute` is a request-in,
/// response-out interface.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Executes the request and returns the buffered response.
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse>;
}

/// Middleware that retries transient failures with a fixed backoff.
///
/// Retries transport-level errors and responses whose status classifies
/// as retryable (429, 502, 503). Cancellations are never retried. Once
/// the retry budget is spent, the last response or error is returned
/// as-is for the client to classify.
pub struct RetryTransport {
    inner: Arc<dyn Transport>,
    max_retries: u32,
    backoff: Duration,
}

impl RetryTransport {
    /// Wraps a transport with up to `max_retries` retries and a fixed
    /// backoff between attempts.
    pub fn new(inner: Arc<dyn Transport>, max_retries: u32, backoff: Duration) -> Self {
        Self {
            inner,
            max_retries,
            backoff,
        }
    }
}

#[async_trait]
impl Transport for RetryTransport {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse> {
        let mut attempt = 0;
        loop {
            match self.inner.execute(request.clone()).await {
                Ok(response) => {
                    let status = response.status.as_u16();
                    let retryable =
                        status >= 400 && ErrorKind::from_status(status).is_retryable();
                    if retryable && attempt < self.max_retries {
                        attempt += 1;
                        warn!("attempt {} returned status {}, retrying", attempt, status);
                        tokio::time::sleep(self.backoff).await;
                        continue;
                    }
                    return Ok(response);
                }
                Err(err) => {
                    let retryable =
                        matches!(err, SerperError::Http(_) | SerperError::Other(_));
                    if retryable && attempt < self.max_retries {
                        attempt += 1;
                        warn!("attempt {} failed ({}), retrying", attempt, err);
                        tokio::time::sleep(self.backoff).await;
                        continue;
                    }
                    return Err(err);
                }
            }
        }
    }
}
