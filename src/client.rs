//! Serper.dev API client.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::request::SearchRequest;
use crate::response::{
    ImagesResponse, NewsResponse, PlacesResponse, ScholarResponse, SearchResponse,
};
use crate::safety;
use crate::transport::{Transport, TransportRequest, MAX_RESPONSE_BYTES};
use crate::transport_http::HttpTransport;
use crate::{ErrorKind, Result, SerperError};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://google.serper.dev";

/// Error bodies longer than this are truncated in error messages.
const MAX_ERROR_BODY_BYTES: usize = 1024;

const TRUNCATION_MARKER: &str = "...(truncated)";

/// Per-call options threaded alongside a request.
///
/// Carries state that applies to a single call without mutating the
/// client: an API key override and a cancellation token.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    api_key: Option<String>,
    cancellation: Option<CancellationToken>,
}

impl CallOptions {
    /// Creates empty options: the client's configured key, no cancellation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Substitutes the API key for this call only.
    ///
    /// An empty key is ignored and the previous value (or the client's
    /// configured key) stays in effect; applying a non-empty key again
    /// replaces the earlier override.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        if !key.is_empty() {
            self.api_key = Some(key);
        }
        self
    }

    /// Attaches a cancellation token to this call.
    ///
    /// Cancelling the token fails the call with [`SerperError::Cancelled`]
    /// and abandons any in-flight transport dispatch.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}

/// Builder for [`Client`].
///
/// Setters may be called repeatedly; the last value for each setting wins.
/// Validation runs once against the final state in [`ClientBuilder::build`].
pub struct ClientBuilder {
    api_key: String,
    base_url: String,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    /// Overrides the API base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Substitutes the transport used for dispatch.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Validates the configuration and constructs the client.
    ///
    /// Fails if the API key is empty or the base URL does not parse as an
    /// absolute URL. Without a transport override, requests go through
    /// [`HttpTransport`] with its default timeout.
    pub fn build(self) -> Result<Client> {
        if self.api_key.is_empty() {
            return Err(SerperError::Config(
                "API key must not be empty".to_string(),
            ));
        }
        let parsed = Url::parse(&self.base_url).map_err(|e| {
            SerperError::Config(format!("invalid base URL {:?}: {}", self.base_url, e))
        })?;
        if parsed.cannot_be_a_base() {
            return Err(SerperError::Config(format!(
                "invalid base URL {:?}: not a base URL",
                self.base_url
            )));
        }
        Ok(Client {
            api_key: self.api_key,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            transport: self
                .transport
                .unwrap_or_else(|| Arc::new(HttpTransport::new())),
        })
    }
}

/// A Serper.dev API client.
///
/// Configuration is immutable after construction and every call operates
/// on its own copy of the request, so one client can be shared across
/// tasks freely. The client performs exactly one dispatch per call and no
/// logging of its own; retries and tracing belong to the transport.
#[derive(Clone)]
pub struct Client {
    api_key: String,
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client with the default base URL and transport.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder(api_key).build()
    }

    /// Starts building a client with the given API key.
    pub fn builder(api_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            transport: None,
        }
    }

    /// Performs a web search.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        self.dispatch("/search", request, &CallOptions::default())
            .await
    }

    /// Performs a web search with per-call options.
    pub async fn search_with(
        &self,
        request: &SearchRequest,
        options: &CallOptions,
    ) -> Result<SearchResponse> {
        self.dispatch("/search", request, options).await
    }

    /// Performs an image search.
    pub async fn images(&self, request: &SearchRequest) -> Result<ImagesResponse> {
        self.dispatch("/images", request, &CallOptions::default())
            .await
    }

    /// Performs an image search with per-call options.
    pub async fn images_with(
        &self,
        request: &SearchRequest,
        options: &CallOptions,
    ) -> Result<ImagesResponse> {
        self.dispatch("/images", request, options).await
    }

    /// Performs a news search.
    pub async fn news(&self, request: &SearchRequest) -> Result<NewsResponse> {
        self.dispatch("/news", request, &CallOptions::default())
            .await
    }

    /// Performs a news search with per-call options.
    pub async fn news_with(
        &self,
        request: &SearchRequest,
        options: &CallOptions,
    ) -> Result<NewsResponse> {
        self.dispatch("/news", request, options).await
    }

    /// Performs a places search.
    pub async fn places(&self, request: &SearchRequest) -> Result<PlacesResponse> {
        self.dispatch("/places", request, &CallOptions::default())
            .await
    }

    /// Performs a places search with per-call options.
    pub async fn places_with(
        &self,
        request: &SearchRequest,
        options: &CallOptions,
    ) -> Result<PlacesResponse> {
        self.dispatch("/places", request, options).await
    }

    /// Performs a scholar search.
    pub async fn scholar(&self, request: &SearchRequest) -> Result<ScholarResponse> {
        self.dispatch("/scholar", request, &CallOptions::default())
            .await
    }

    /// Performs a scholar search with per-call options.
    pub async fn scholar_with(
        &self,
        request: &SearchRequest,
        options: &CallOptions,
    ) -> Result<ScholarResponse> {
        self.dispatch("/scholar", request, options).await
    }

    /// Verifies connectivity and credentials with a minimal web search.
    ///
    /// This issues a real `/search` request with `num = 1` that counts
    /// toward the account's billable quota. It is not a free probe.
    pub async fn check_connectivity(&self) -> Result<()> {
        let request = SearchRequest::new("test").with_num(1);
        self.search(&request).await.map(|_| ())
    }

    /// Prepares, dispatches, and decodes one request against an endpoint.
    ///
    /// The caller's request is cloned before defaults are applied, so the
    /// original is never modified.
    async fn dispatch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: &SearchRequest,
        options: &CallOptions,
    ) -> Result<T> {
        let mut prepared = request.clone();
        prepared.apply_defaults();
        prepared.validate()?;

        let body = serde_json::to_vec(&prepared).map_err(SerperError::Encode)?;
        let transport_request = TransportRequest {
            url: format!("{}{}", self.base_url, endpoint),
            api_key: options
                .api_key
                .clone()
                .unwrap_or_else(|| self.api_key.clone()),
            body,
        };

        let response = match &options.cancellation {
            Some(token) => {
                if token.is_cancelled() {
                    return Err(SerperError::Cancelled);
                }
                tokio::select! {
                    _ = token.cancelled() => return Err(SerperError::Cancelled),
                    result = self.transport.execute(transport_request) => result?,
                }
            }
            None => self.transport.execute(transport_request).await?,
        };

        // Substituted transports are held to the same cap as the default one.
        if response.body.len() > MAX_RESPONSE_BYTES {
            return Err(SerperError::BodyTooLarge {
                limit: MAX_RESPONSE_BYTES,
            });
        }

        let status = response.status.as_u16();
        if status >= 400 {
            return Err(SerperError::Api {
                kind: ErrorKind::from_status(status),
                status,
                message: truncate_error_body(&response.body),
            });
        }

        safety::validate_json(&response.body)?;
        serde_json::from_slice(&response.body).map_err(SerperError::Decode)
    }
}

/// Renders an error-response body for inclusion in an error message,
/// truncating past the cap with an explicit marker.
fn truncate_error_body(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    if text.len() <= MAX_ERROR_BODY_BYTES {
        return text.into_owned();
    }
    let mut end = MAX_ERROR_BODY_BYTES;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{}", &text[..end], TRUNCATION_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportResponse;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use reqwest::StatusCode;

    /// Captures the dispatched request and returns a canned response.
    struct MockTransport {
        captured: Mutex<Option<TransportRequest>>,
        calls: AtomicUsize,
        status: u16,
        body: Vec<u8>,
        error: Option<String>,
    }

    impl MockTransport {
        fn new(status: u16, body: &str) -> Arc<Self> {
            Arc::new(Self {
                captured: Mutex::new(None),
                calls: AtomicUsize::new(0),
                status,
                body: body.as_bytes().to_vec(),
                error: None,
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                captured: Mutex::new(None),
                calls: AtomicUsize::new(0),
                status: 0,
                body: Vec::new(),
                error: Some(message.to_string()),
            })
        }

        fn captured(&self) -> Option<TransportRequest> {
            self.captured.lock().unwrap().clone()
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn execute(&self, request: TransportRequest) -> Result<TransportResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.captured.lock().unwrap() = Some(request);
            if let Some(message) = &self.error {
                return Err(SerperError::Other(message.clone()));
            }
            Ok(TransportResponse {
                status: StatusCode::from_u16(self.status).unwrap(),
                body: self.body.clone(),
            })
        }
    }

    /// Never completes; the call can only end through cancellation.
    struct PendingTransport;

    #[async_trait]
    impl Transport for PendingTransport {
        async fn execute(&self, _request: TransportRequest) -> Result<TransportResponse> {
            std::future::pending().await
        }
    }

    fn client_with(transport: Arc<dyn Transport>) -> Client {
        Client::builder("test-key")
            .base_url("https://api.test")
            .transport(transport)
            .build()
            .unwrap()
    }

    #[test]
    fn test_new_uses_defaults() {
        let client = Client::new("test-key").unwrap();
        assert_eq!(client.api_key, "test-key");
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_builder_empty_api_key_fails() {
        let err = Client::new("").unwrap_err();
        assert!(matches!(err, SerperError::Config(_)));
        assert!(err.to_string().contains("API key"));
    }

    #[test]
    fn test_builder_malformed_base_url_fails() {
        let err = Client::builder("key")
            .base_url("not a url")
            .build()
            .unwrap_err();
        assert!(matches!(err, SerperError::Config(_)));
        assert!(err.to_string().contains("base URL"));
    }

    #[test]
    fn test_builder_relative_base_url_fails() {
        let err = Client::builder("key")
            .base_url("/just/a/path")
            .build()
            .unwrap_err();
        assert!(matches!(err, SerperError::Config(_)));
    }

    #[test]
    fn test_builder_last_base_url_wins() {
        let client = Client::builder("key")
            .base_url("https://first.test")
            .base_url("https://second.test")
            .build()
            .unwrap();
        assert_eq!(client.base_url, "https://second.test");
    }

    #[test]
    fn test_builder_last_override_validated_against_final_state() {
        // An invalid intermediate value is fine as long as the final one parses.
        let client = Client::builder("key")
            .base_url("not a url")
            .base_url("https://api.test")
            .build()
            .unwrap();
        assert_eq!(client.base_url, "https://api.test");
    }

    #[tokio::test]
    async fn test_builder_last_transport_wins() {
        let first = MockTransport::new(200, "{}");
        let second = MockTransport::new(200, "{}");
        let client = Client::builder("key")
            .transport(first.clone())
            .transport(second.clone())
            .build()
            .unwrap();
        client.search(&SearchRequest::new("test")).await.unwrap();
        assert_eq!(first.calls(), 0);
        assert_eq!(second.calls(), 1);
    }

    #[test]
    fn test_builder_trims_trailing_slash() {
        let client = Client::builder("key")
            .base_url("https://api.test/")
            .build()
            .unwrap();
        assert_eq!(client.base_url, "https://api.test");
    }

    #[tokio::test]
    async fn test_search_success() {
        let mock = MockTransport::new(
            200,
            r#"{
                "searchParameters": {"q": "golang", "gl": "us", "hl": "en", "num": 10, "type": "search", "engine": "google"},
                "organic": [
                    {"title": "Go Programming Language", "link": "https://go.dev", "snippet": "Go is an open source language.", "position": 1}
                ]
            }"#,
        );
        let client = client_with(mock.clone());

        let response = client.search(&SearchRequest::new("golang")).await.unwrap();
        assert_eq!(response.organic.len(), 1);
        assert_eq!(response.organic[0].title, "Go Programming Language");

        let sent = mock.captured().unwrap();
        assert_eq!(sent.url, "https://api.test/search");
        assert_eq!(sent.api_key, "test-key");
    }

    #[tokio::test]
    async fn test_search_applies_defaults_to_wire_body() {
        let mock = MockTransport::new(200, r#"{"organic":[]}"#);
        let client = client_with(mock.clone());

        client.search(&SearchRequest::new("test")).await.unwrap();

        let sent: SearchRequest =
            serde_json::from_slice(&mock.captured().unwrap().body).unwrap();
        assert_eq!(sent.num, Some(10));
        assert_eq!(sent.country.as_deref(), Some("us"));
        assert_eq!(sent.language.as_deref(), Some("en"));
        assert_eq!(sent.page, Some(1));
    }

    #[tokio::test]
    async fn test_search_preserves_explicit_values_on_wire() {
        let mock = MockTransport::new(200, r#"{"organic":[]}"#);
        let client = client_with(mock.clone());

        let request = SearchRequest::new("test")
            .with_num(50)
            .with_country("de")
            .with_language("de")
            .with_page(3);
        client.search(&request).await.unwrap();

        let sent: SearchRequest =
            serde_json::from_slice(&mock.captured().unwrap().body).unwrap();
        assert_eq!(sent.num, Some(50));
        assert_eq!(sent.country.as_deref(), Some("de"));
        assert_eq!(sent.language.as_deref(), Some("de"));
        assert_eq!(sent.page, Some(3));
    }

    #[tokio::test]
    async fn test_search_does_not_mutate_caller_request() {
        let mock = MockTransport::new(200, r#"{"organic":[]}"#);
        let client = client_with(mock);

        let request = SearchRequest::new("test");
        let before = request.clone();
        client.search(&request).await.unwrap();
        assert_eq!(request, before);
    }

    #[tokio::test]
    async fn test_failed_call_does_not_mutate_caller_request() {
        let mock = MockTransport::new(500, "boom");
        let client = client_with(mock);

        let request = SearchRequest::new("test").with_num(7);
        let before = request.clone();
        let _ = client.search(&request).await;
        assert_eq!(request, before);
    }

    #[tokio::test]
    async fn test_validation_error_skips_dispatch() {
        let mock = MockTransport::new(200, r#"{"organic":[]}"#);
        let client = client_with(mock.clone());

        let err = client.search(&SearchRequest::new("")).await.unwrap_err();
        assert!(matches!(err, SerperError::InvalidRequest(_)));
        assert!(err.to_string().contains("query"));
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_out_of_range_num_skips_dispatch() {
        let mock = MockTransport::new(200, r#"{"organic":[]}"#);
        let client = client_with(mock.clone());

        let err = client
            .search(&SearchRequest::new("test").with_num(101))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("num must be between 1 and 100"));
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_exactly_one_dispatch_per_call() {
        let mock = MockTransport::new(200, r#"{"organic":[]}"#);
        let client = client_with(mock.clone());

        client.search(&SearchRequest::new("test")).await.unwrap();
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_vertical_endpoints() {
        let request = SearchRequest::new("test");

        let mock = MockTransport::new(200, r#"{"images":[]}"#);
        client_with(mock.clone()).images(&request).await.unwrap();
        assert_eq!(mock.captured().unwrap().url, "https://api.test/images");

        let mock = MockTransport::new(200, r#"{"news":[]}"#);
        client_with(mock.clone()).news(&request).await.unwrap();
        assert_eq!(mock.captured().unwrap().url, "https://api.test/news");

        let mock = MockTransport::new(200, r#"{"places":[]}"#);
        client_with(mock.clone()).places(&request).await.unwrap();
        assert_eq!(mock.captured().unwrap().url, "https://api.test/places");

        let mock = MockTransport::new(200, r#"{"organic":[]}"#);
        client_with(mock.clone()).scholar(&request).await.unwrap();
        assert_eq!(mock.captured().unwrap().url, "https://api.test/scholar");
    }

    #[tokio::test]
    async fn test_api_error_classification() {
        let mock = MockTransport::new(401, r#"{"error":"unauthorized"}"#);
        let client = client_with(mock);

        let err = client
            .search(&SearchRequest::new("test"))
            .await
            .unwrap_err();
        match err {
            SerperError::Api {
                kind,
                status,
                ref message,
            } => {
                assert_eq!(kind, ErrorKind::Unauthorized);
                assert_eq!(status, 401);
                assert!(message.contains("unauthorized"));
            }
            other => panic!("expected Api error, got {:?}", other),
        }
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn test_api_error_kind_per_status() {
        for (status, kind) in [
            (400, ErrorKind::Validation),
            (404, ErrorKind::NotFound),
            (429, ErrorKind::RateLimited),
            (502, ErrorKind::UpstreamUnavailable),
            (503, ErrorKind::UpstreamUnavailable),
            (500, ErrorKind::Internal),
        ] {
            let client = client_with(MockTransport::new(status, "nope"));
            let err = client
                .search(&SearchRequest::new("test"))
                .await
                .unwrap_err();
            assert_eq!(err.api_kind(), Some(kind), "status {}", status);
        }
    }

    #[tokio::test]
    async fn test_error_body_truncation() {
        let long_body = "x".repeat(2000);
        let client = client_with(MockTransport::new(500, &long_body));

        let err = client
            .search(&SearchRequest::new("test"))
            .await
            .unwrap_err();
        match err {
            SerperError::Api { ref message, .. } => {
                assert!(message.ends_with(TRUNCATION_MARKER));
                assert_eq!(message.len(), 1024 + TRUNCATION_MARKER.len());
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_short_error_body_not_truncated() {
        let client = client_with(MockTransport::new(500, "short failure"));
        let err = client
            .search(&SearchRequest::new("test"))
            .await
            .unwrap_err();
        match err {
            SerperError::Api { ref message, .. } => {
                assert_eq!(message, "short failure");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let client = client_with(MockTransport::failing("connection refused"));
        let err = client
            .search(&SearchRequest::new("test"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let huge = "x".repeat(MAX_RESPONSE_BYTES + 1);
        let client = client_with(MockTransport::new(200, &huge));
        let err = client
            .search(&SearchRequest::new("test"))
            .await
            .unwrap_err();
        assert!(matches!(err, SerperError::BodyTooLarge { .. }));
    }

    #[tokio::test]
    async fn test_unsafe_body_rejected() {
        let client = client_with(MockTransport::new(
            200,
            r#"{"organic":[],"__proto__":{"polluted":true}}"#,
        ));
        let err = client
            .search(&SearchRequest::new("test"))
            .await
            .unwrap_err();
        assert!(matches!(err, SerperError::UnsafeBody(_)));
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let client = client_with(MockTransport::new(200, "{not json"));
        let err = client
            .search(&SearchRequest::new("test"))
            .await
            .unwrap_err();
        assert!(matches!(err, SerperError::Decode(_)));
    }

    #[tokio::test]
    async fn test_call_options_api_key_override() {
        let mock = MockTransport::new(200, r#"{"organic":[]}"#);
        let client = client_with(mock.clone());

        let options = CallOptions::new().with_api_key("override-key");
        client
            .search_with(&SearchRequest::new("test"), &options)
            .await
            .unwrap();
        assert_eq!(mock.captured().unwrap().api_key, "override-key");
    }

    #[tokio::test]
    async fn test_call_options_empty_key_is_noop() {
        let mock = MockTransport::new(200, r#"{"organic":[]}"#);
        let client = client_with(mock.clone());

        let options = CallOptions::new().with_api_key("");
        client
            .search_with(&SearchRequest::new("test"), &options)
            .await
            .unwrap();
        assert_eq!(mock.captured().unwrap().api_key, "test-key");
    }

    #[tokio::test]
    async fn test_call_options_last_key_wins() {
        let mock = MockTransport::new(200, r#"{"organic":[]}"#);
        let client = client_with(mock.clone());

        let options = CallOptions::new()
            .with_api_key("first-key")
            .with_api_key("second-key");
        client
            .search_with(&SearchRequest::new("test"), &options)
            .await
            .unwrap();
        assert_eq!(mock.captured().unwrap().api_key, "second-key");
    }

    #[tokio::test]
    async fn test_call_options_empty_key_keeps_earlier_override() {
        let mock = MockTransport::new(200, r#"{"organic":[]}"#);
        let client = client_with(mock.clone());

        let options = CallOptions::new().with_api_key("override-key").with_api_key("");
        client
            .search_with(&SearchRequest::new("test"), &options)
            .await
            .unwrap();
        assert_eq!(mock.captured().unwrap().api_key, "override-key");
    }

    #[tokio::test]
    async fn test_already_cancelled_token_skips_dispatch() {
        let mock = MockTransport::new(200, r#"{"organic":[]}"#);
        let client = client_with(mock.clone());

        let token = CancellationToken::new();
        token.cancel();
        let options = CallOptions::new().with_cancellation(token);

        let err = client
            .search_with(&SearchRequest::new("test"), &options)
            .await
            .unwrap_err();
        assert!(matches!(err, SerperError::Cancelled));
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_cancellation_during_dispatch() {
        let client = client_with(Arc::new(PendingTransport));

        let token = CancellationToken::new();
        let options = CallOptions::new().with_cancellation(token.clone());

        let cancel = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            token.cancel();
        });

        let err = client
            .search_with(&SearchRequest::new("test"), &options)
            .await
            .unwrap_err();
        assert!(matches!(err, SerperError::Cancelled));
        cancel.await.unwrap();
    }

    #[tokio::test]
    async fn test_check_connectivity_sends_minimal_search() {
        let mock = MockTransport::new(200, r#"{"organic":[]}"#);
        let client = client_with(mock.clone());

        client.check_connectivity().await.unwrap();

        let sent = mock.captured().unwrap();
        assert_eq!(sent.url, "https://api.test/search");
        let body: SearchRequest = serde_json::from_slice(&sent.body).unwrap();
        assert_eq!(body.num, Some(1));
    }

    #[tokio::test]
    async fn test_check_connectivity_surfaces_auth_failure() {
        let client = client_with(MockTransport::new(401, "bad key"));
        let err = client.check_connectivity().await.unwrap_err();
        assert_eq!(err.api_kind(), Some(ErrorKind::Unauthorized));
    }

    #[test]
    fn test_truncate_error_body_utf8_boundary() {
        // Multi-byte character straddling the cap must not split.
        let mut body = "x".repeat(1023).into_bytes();
        body.extend_from_slice("é".as_bytes());
        let message = truncate_error_body(&body);
        assert!(message.ends_with(TRUNCATION_MARKER));
        assert!(message.len() <= 1024 + TRUNCATION_MARKER.len());
    }
}
