//! Typed response shapes for the five search verticals.
//!
//! Field names mirror the provider's JSON schema (camelCase on the wire).
//! Decoding is tolerant: missing lists and scalars fall back to empty
//! defaults, since the provider omits sections that have no content.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Echo of the parameters the provider resolved for a query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchParameters {
    /// The search terms.
    pub q: String,
    /// Country code.
    pub gl: String,
    /// Language code.
    pub hl: String,
    /// Result count.
    pub num: u32,
    /// Search type (e.g., "search", "images").
    #[serde(rename = "type")]
    pub search_type: String,
    /// Backing engine name.
    pub engine: String,
}

/// Response from the web search endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchResponse {
    pub search_parameters: SearchParameters,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub knowledge_graph: Option<KnowledgeGraph>,
    pub organic: Vec<OrganicResult>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub people_also_ask: Vec<PeopleAlsoAsk>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related_searches: Vec<RelatedSearch>,
}

/// Knowledge graph panel data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KnowledgeGraph {
    pub title: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<HashMap<String, String>>,
}

/// A single organic web result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrganicResult {
    pub title: String,
    pub link: String,
    pub snippet: String,
    pub position: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sitelinks: Vec<Sitelink>,
}

/// A sitelink within an organic result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Sitelink {
    pub title: String,
    pub link: String,
}

/// A "People Also Ask" entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PeopleAlsoAsk {
    pub question: String,
    pub snippet: String,
    pub title: String,
    pub link: String,
}

/// A related search suggestion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelatedSearch {
    pub query: String,
}

/// Response from the image search endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImagesResponse {
    pub search_parameters: SearchParameters,
    pub images: Vec<ImageResult>,
}

/// A single image result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageResult {
    pub title: String,
    pub image_url: String,
    pub thumbnail_url: String,
    pub source: String,
    pub link: String,
    pub position: u32,
}

/// Response from the news search endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewsResponse {
    pub search_parameters: SearchParameters,
    pub news: Vec<NewsResult>,
}

/// A single news result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewsResult {
    pub title: String,
    pub link: String,
    pub snippet: String,
    pub source: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub position: u32,
}

/// Response from the places search endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlacesResponse {
    pub search_parameters: SearchParameters,
    pub places: Vec<PlaceResult>,
}

/// A single place result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaceResult {
    pub title: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub rating: f64,
    pub rating_count: u32,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hours: Vec<String>,
    pub position: u32,
}

/// Response from the scholar search endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScholarResponse {
    pub search_parameters: SearchParameters,
    pub organic: Vec<ScholarResult>,
}

/// A single scholar result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScholarResult {
    pub title: String,
    pub link: String,
    pub snippet: String,
    pub publication_info: String,
    pub cited_by: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    pub position: u32,
}
