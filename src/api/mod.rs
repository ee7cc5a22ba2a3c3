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


//! Book catalog access
//!
//! The controller only sees the [`CatalogSource`] trait. The production
//! implementation is [`GoogleBooksClient`]; tests substitute scripted sources.

pub mod client;
pub mod volumes;

use crate::error::Result;
use crate::library::models::Book;
use async_trait::async_trait;

// Re-export commonly used types
pub use client::{CatalogConfig, CatalogConfigBuilder, GoogleBooksClient};
pub use volumes::{parse_volumes, VolumesResponse};

/// Remote book catalog
///
/// Implementations may resolve out of order relative to issuance; the
/// controller is responsible for discarding superseded responses.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Search by free text, optionally narrowed by a `subject:` filter clause
    ///
    /// # Errors
    /// Network failures, non-success statuses and malformed payloads are
    /// returned as the matching [`crate::error::LibraryError`] variants.
    async fn query(&self, term: &str, category_filter: Option<&str>) -> Result<Vec<Book>>;

    /// Default list shown before any search
    async fn featured(&self) -> Result<Vec<Book>> {
        self.query("", Some(FEATURED_FILTER)).await
    }
}

/// Filter clause used for the catalog-sourced featured list
pub const FEATURED_FILTER: &str = "subject:fiction";

/// Combine a free-text term and an optional filter clause into one `q` value
///
/// `"dune"` + `subject:fiction` → `"dune+subject:fiction"`. Either side may be
/// empty, in which case the other is used alone.
pub fn build_query(term: &str, category_filter: Option<&str>) -> String {
    let term = term.trim();
    match category_filter.map(str::trim).filter(|f| !f.is_empty()) {
        Some(filter) if term.is_empty() => filter.to_string(),
        Some(filter) => format!("{}+{}", term, filter),
        None => term.to_string(),
    }
}
