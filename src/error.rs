//! Error types for the Serper client.

use std::fmt;

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, SerperError>;

/// Classification of upstream API failures by HTTP status code.
///
/// The mapping is closed: callers can branch on the kind for retry and
/// alerting decisions without string-matching error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller-supplied input rejected by the upstream (400).
    Validation,
    /// Bad or expired credential (401).
    Unauthorized,
    /// Endpoint or resource absent (404).
    NotFound,
    /// Caller must back off (429).
    RateLimited,
    /// Transient dependency failure (502, 503).
    UpstreamUnavailable,
    /// Any other non-success status.
    Internal,
}

impl ErrorKind {
    /// Classifies a non-success HTTP status code.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::Validation,
            401 => Self::Unauthorized,
            404 => Self::NotFound,
            429 => Self::RateLimited,
            502 | 503 => Self::UpstreamUnavailable,
            _ => Self::Internal,
        }
    }

    /// Returns whether a retry is a reasonable response to this kind.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::RateLimited | Self::UpstreamUnavailable)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validation => "validation",
            Self::Unauthorized => "unauthorized",
            Self::NotFound => "not-found",
            Self::RateLimited => "rate-limited",
            Self::UpstreamUnavailable => "upstream-unavailable",
            Self::Internal => "internal",
        };
        f.write_str(name)
    }
}

/// Errors that can occur during client operations.
#[derive(Error, Debug)]
pub enum SerperError {
    /// Request rejected by local validation; nothing was dispatched.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Client construction failed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// HTTP request failed at the transport level.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The call was cancelled before a response arrived.
    #[error("request cancelled")]
    Cancelled,

    /// Upstream returned a non-success status.
    #[error("HTTP {status} ({kind}): {message}")]
    Api {
        /// Classification of the failure.
        kind: ErrorKind,
        /// The HTTP status code as returned by the upstream.
        status: u16,
        /// Response body text, truncated for diagnostics.
        message: String,
    },

    /// Response body exceeded the size cap.
    #[error("response body exceeds {limit} bytes")]
    BodyTooLarge {
        /// The enforced cap in bytes.
        limit: usize,
    },

    /// Response body failed the pre-decode security screen.
    #[error("unsafe response body: {0}")]
    UnsafeBody(String),

    /// Failed to encode the request body.
    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    /// Failed to decode the response body.
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// Implementation-defined failure from a substituted transport.
    #[error("{0}")]
    Other(String),
}

impl SerperError {
    /// Returns the upstream classification if this is an API error.
    pub fn api_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Api { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
