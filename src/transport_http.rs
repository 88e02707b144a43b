//! Default HTTP transport using reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

use crate::transport::{Transport, TransportRequest, TransportResponse, MAX_RESPONSE_BYTES};
use crate::{Result, SerperError};

/// Default request timeout for the built-in transport.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A transport that dispatches requests with a plain reqwest client.
///
/// Suitable for direct use; wrap it in `RetryTransport` for retries, or
/// substitute any other `Transport` implementation at client construction.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport with the default timeout.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Creates a transport with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .user_agent(concat!("serper/", env!("CARGO_PKG_VERSION")))
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Creates a transport with a custom reqwest client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse> {
        let mut response = self
            .client
            .post(&request.url)
            .header(CONTENT_TYPE, "application/json")
            .header("X-API-KEY", request.api_key)
            .body(request.body)
            .send()
            .await?;

        let status = response.status();
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > MAX_RESPONSE_BYTES {
                return Err(SerperError::BodyTooLarge {
                    limit: MAX_RESPONSE_BYTES,
                });
            }
            body.extend_from_slice(&chunk);
        }

        Ok(TransportResponse { status, body })
    }
}
