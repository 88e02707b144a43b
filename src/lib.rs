//! # serper
//!
//! A typed client for the [Serper.dev](https://serper.dev) Google Search API.
//!
//! This library wraps the provider's five search verticals (web, images,
//! news, places, scholar) behind one client, with support for:
//!
//! - Default filling and validation of search parameters
//! - Pluggable transports for retry middleware and test doubles
//! - A closed classification of upstream failures by status code
//! - Security-checked JSON decoding of response bodies
//!
//! ## Example
//!
//! ```rust,no_run
//! use serper::{Client, SearchRequest};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = Client::new(std::env::var("SERPER_API_KEY")?)?;
//!
//!     let request = SearchRequest::new("rust programming").with_num(5);
//!     let response = client.search(&request).await?;
//!
//!     for result in &response.organic {
//!         println!("{}: {}", result.title, result.link);
//!     }
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod request;
mod response;
mod safety;
mod transport;
mod transport_http;

pub use client::{CallOptions, Client, ClientBuilder, DEFAULT_BASE_URL};
pub use error::{ErrorKind, Result, SerperError};
pub use request::{
    SearchRequest, DEFAULT_COUNTRY, DEFAULT_LANGUAGE, DEFAULT_NUM, DEFAULT_PAGE,
};
pub use response::{
    ImageResult, ImagesResponse, KnowledgeGraph, NewsResponse, NewsResult, OrganicResult,
    PeopleAlsoAsk, PlaceResult, PlacesResponse, RelatedSearch, ScholarResponse, ScholarResult,
    SearchParameters, SearchResponse, Sitelink,
};
pub use transport::{
    RetryTransport, Transport, TransportRequest, TransportResponse, MAX_RESPONSE_BYTES,
};
pub use transport_http::{HttpTransport, DEFAULT_TIMEOUT};
