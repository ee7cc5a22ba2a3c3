// Bookshelf - Book search and favorites core
// Copyright (C) 2025 Bookshelf contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! HTTP client for the Google Books volumes endpoint
//!
//! # Request shape
//! `GET {base_url}?q={encoded}&maxResults={n}[&printType=books][&orderBy=relevance]`
//!
//! `q` is the term and filter clause joined with `+` (see
//! [`crate::api::build_query`]) and percent-encoded as a single component, so
//! the joining `+` travels as `%2B` and spaces as `%20`.
//!
//! # Failure classes
//! - transport errors → `NetworkError` (transient for timeouts / connect)
//! - non-2xx → `ApiRequestFailed` with the status code
//! - unreadable or non-volumes body → `InvalidApiResponse`
//!
//! No retries are performed; each call is a single attempt.

use crate::api::{build_query, volumes::parse_volumes, CatalogSource, FEATURED_FILTER};
use crate::error::{LibraryError, Result};
use crate::library::models::Book;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Response};
use std::time::Duration;
use url::Url;

/// Default catalog endpoint
pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/books/v1/volumes";

/// Results requested for a user search
const DEFAULT_MAX_RESULTS: u32 = 20;

/// Results requested for the catalog-sourced featured list
const DEFAULT_FEATURED_MAX_RESULTS: u32 = 12;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Catalog caps `maxResults` at 40
const MAX_RESULTS_LIMIT: u32 = 40;

/// Configuration for GoogleBooksClient
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: Url,
    pub max_results: u32,
    pub featured_max_results: u32,
    pub print_type: Option<String>,
    pub order_by: Option<String>,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL"),
            max_results: DEFAULT_MAX_RESULTS,
            featured_max_results: DEFAULT_FEATURED_MAX_RESULTS,
            print_type: Some("books".to_string()),
            order_by: Some("relevance".to_string()),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: format!("bookshelf-core/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl CatalogConfig {
    pub fn builder() -> CatalogConfigBuilder {
        CatalogConfigBuilder::new()
    }
}

/// Builder for CatalogConfig
#[derive(Debug)]
pub struct CatalogConfigBuilder {
    config: CatalogConfig,
    base_url: Option<String>,
}

impl CatalogConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: CatalogConfig::default(),
            base_url: None,
        }
    }

    pub fn base_url<S: Into<String>>(mut self, url: S) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn max_results(mut self, max_results: u32) -> Self {
        self.config.max_results = max_results;
        self
    }

    pub fn featured_max_results(mut self, max_results: u32) -> Self {
        self.config.featured_max_results = max_results;
        self
    }

    pub fn print_type(mut self, print_type: Option<String>) -> Self {
        self.config.print_type = print_type;
        self
    }

    pub fn order_by(mut self, order_by: Option<String>) -> Self {
        self.config.order_by = order_by;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// # Errors
    /// Returns error if the base URL does not parse or a result count is
    /// outside `1..=40`.
    pub fn build(mut self) -> Result<CatalogConfig> {
        if let Some(url) = self.base_url {
            self.config.base_url = Url::parse(&url)?;
        }
        for (name, value) in [
            ("max_results", self.config.max_results),
            ("featured_max_results", self.config.featured_max_results),
        ] {
            if value == 0 || value > MAX_RESULTS_LIMIT {
                return Err(LibraryError::InvalidConfiguration(format!(
                    "{} must be between 1 and {}, got {}",
                    name, MAX_RESULTS_LIMIT, value
                )));
            }
        }
        Ok(self.config)
    }
}

impl Default for CatalogConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Catalog client backed by reqwest
///
/// # Example
/// ```rust,no_run
/// use bookshelf_core::api::{CatalogSource, GoogleBooksClient};
///
/// # async fn example() -> bookshelf_core::error::Result<()> {
/// let client = GoogleBooksClient::new()?;
/// let books = client.query("dune", Some("subject:fiction")).await?;
/// println!("{} results", books.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GoogleBooksClient {
    client: Client,
    config: CatalogConfig,
}

impl GoogleBooksClient {
    /// Create a client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(CatalogConfig::default())
    }

    /// Create a client with custom configuration
    ///
    /// # Errors
    /// Returns error if the user agent is not a valid header value or the
    /// HTTP client cannot be built
    pub fn with_config(config: CatalogConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| LibraryError::InvalidInput(format!("Invalid user agent: {}", e)))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Full request URL for a combined query
    pub fn request_url(&self, q: &str, max_results: u32) -> String {
        let mut url = format!(
            "{}?q={}&maxResults={}",
            self.config.base_url,
            urlencoding::encode(q),
            max_results
        );
        if let Some(ref print_type) = self.config.print_type {
            url.push_str("&printType=");
            url.push_str(&urlencoding::encode(print_type));
        }
        if let Some(ref order_by) = self.config.order_by {
            url.push_str("&orderBy=");
            url.push_str(&urlencoding::encode(order_by));
        }
        url
    }

    /// Query with an explicit result count
    pub async fn query_with_limit(
        &self,
        term: &str,
        category_filter: Option<&str>,
        max_results: u32,
    ) -> Result<Vec<Book>> {
        let q = build_query(term, category_filter);
        if q.is_empty() {
            return Err(LibraryError::invalid_input("Catalog query must not be empty"));
        }

        let url = self.request_url(&q, max_results);
        tracing::debug!(%q, max_results, "Querying catalog");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LibraryError::network_error(
                format!("Catalog request failed: {}", e),
                e.is_timeout() || e.is_connect(),
            ))?;

        if !response.status().is_success() {
            return Err(Self::error_response(response).await);
        }

        let body = response.text().await.map_err(|e| {
            LibraryError::network_error(format!("Failed to read catalog response: {}", e), true)
        })?;

        parse_volumes(&body)
    }

    async fn error_response(response: Response) -> LibraryError {
        let status = response.status();
        let endpoint = response.url().path().to_string();
        let body = response.text().await.unwrap_or_default();

        LibraryError::api_failed(
            format!("Catalog returned {}: {}", status, truncate(&body, 200)),
            Some(status.as_u16()),
            Some(endpoint),
        )
    }
}

#[async_trait]
impl CatalogSource for GoogleBooksClient {
    async fn query(&self, term: &str, category_filter: Option<&str>) -> Result<Vec<Book>> {
        self.query_with_limit(term, category_filter, self.config.max_results)
            .await
    }

    /// Featured page size instead of the search page size
    async fn featured(&self) -> Result<Vec<Book>> {
        self.query_with_limit("", Some(FEATURED_FILTER), self.config.featured_max_results)
            .await
    }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
