//! Search request representation and preparation.

use serde::{Deserialize, Serialize};

use crate::{Result, SerperError};

/// Default result count filled in by [`SearchRequest::apply_defaults`].
pub const DEFAULT_NUM: u32 = 10;
/// Default country code (`gl`).
pub const DEFAULT_COUNTRY: &str = "us";
/// Default language code (`hl`).
pub const DEFAULT_LANGUAGE: &str = "en";
/// Default page number.
pub const DEFAULT_PAGE: u32 = 1;

/// A search request with all parameters.
///
/// Fields serialize to the provider's wire names (`q`, `num`, `gl`, `hl`,
/// `location`, `page`); unset fields are omitted from the payload. The
/// client never mutates a caller's request; defaults are applied to a
/// private copy per call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// The search terms.
    #[serde(rename = "q")]
    pub query: String,
    /// Number of results to return (1-100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num: Option<u32>,
    /// Country code (e.g., "us").
    #[serde(rename = "gl", skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Language code (e.g., "en").
    #[serde(rename = "hl", skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Free-text location bias (e.g., "New York").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Page number (1-indexed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl SearchRequest {
    /// Creates a new search request with the given terms.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            num: None,
            country: None,
            language: None,
            location: None,
            page: None,
        }
    }

    /// Sets the result count.
    pub fn with_num(mut self, num: u32) -> Self {
        self.num = Some(num);
        self
    }

    /// Sets the country code.
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Sets the language code.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the location bias.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the page number.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Fills unset fields with the documented defaults.
    ///
    /// Zero counts and empty strings count as unset. Explicit values are
    /// never overridden, so applying twice is the same as applying once.
    pub fn apply_defaults(&mut self) {
        if self.num.map_or(true, |n| n == 0) {
            self.num = Some(DEFAULT_NUM);
        }
        if self.country.as_deref().map_or(true, str::is_empty) {
            self.country = Some(DEFAULT_COUNTRY.to_string());
        }
        if self.language.as_deref().map_or(true, str::is_empty) {
            self.language = Some(DEFAULT_LANGUAGE.to_string());
        }
        if self.location.as_deref().is_some_and(str::is_empty) {
            self.location = None;
        }
        if self.page.map_or(true, |p| p == 0) {
            self.page = Some(DEFAULT_PAGE);
        }
    }

    /// Checks the request against the provider's parameter bounds.
    pub fn validate(&self) -> Result<()> {
        if self.query.is_empty() {
            return Err(SerperError::InvalidRequest(
                "query must not be empty".to_string(),
            ));
        }
        if let Some(num) = self.num {
            if num < 1 || num > 100 {
                return Err(SerperError::InvalidRequest(
                    "num must be between 1 and 100".to_string(),
                ));
            }
        }
        if let Some(page) = self.page {
            if page < 1 {
                return Err(SerperError::InvalidRequest(
                    "page must be at least 1".to_string(),
                ));
            }
        }
        Ok(())
    }
}
