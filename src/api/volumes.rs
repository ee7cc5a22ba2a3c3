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


//! Catalog response structures and mapping into [`Book`]
//!
//! The catalog answers `GET /volumes?q=...` with:
//!
//! ```json
//! {
//!   "kind": "books#volumes",
//!   "totalItems": 2,
//!   "items": [
//!     { "id": "abc", "volumeInfo": { "title": "...", "authors": ["..."] } }
//!   ]
//! }
//! ```
//!
//! `items` is omitted entirely when nothing matched. Every `volumeInfo` field
//! is optional; missing fields are replaced by the sentinels in
//! [`crate::library::models`].
//!
//! # Mapping rules
//! - title → "Unknown Title"
//! - authors (absent or empty) → ["Unknown Author"]
//! - categories (absent or empty) → ["Uncategorized"]
//! - description → "No description available."
//! - thumbnail → `imageLinks.thumbnail`, then `imageLinks.smallThumbnail`,
//!   upgraded to https; otherwise the placeholder cover
//! - publishedDate → first four-digit run, otherwise "Unknown"
//! - averageRating → clamped to [0, 5]; absent stays unset

use crate::error::{LibraryError, Result};
use crate::library::models::{
    Book, NO_DESCRIPTION, PLACEHOLDER_THUMBNAIL, UNCATEGORIZED, UNKNOWN_AUTHOR, UNKNOWN_TITLE,
    UNKNOWN_YEAR,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

lazy_static! {
    static ref YEAR_RE: Regex = Regex::new(r"\d{4}").expect("static year pattern");
}

/// Catalog search response container
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumesResponse {
    #[serde(default)]
    pub kind: Option<String>,

    /// Total matches reported by the catalog (not the page size)
    #[serde(default)]
    pub total_items: Option<u64>,

    /// Absent when there are no results
    #[serde(default)]
    pub items: Option<Vec<VolumeItem>>,
}

/// One catalog entry
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeItem {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub volume_info: Option<VolumeInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Option<Vec<String>>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
    /// Possibly partial date: "1965", "1965-08", "1965-08-01"
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub average_rating: Option<f32>,
    #[serde(default)]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub image_links: Option<ImageLinks>,
    #[serde(default)]
    pub preview_link: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    #[serde(default)]
    pub small_thumbnail: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

impl VolumesResponse {
    /// Map every usable item into a `Book`, keeping catalog order
    ///
    /// Items without an id cannot take part in favorites and are dropped.
    pub fn into_books(self) -> Vec<Book> {
        self.items
            .unwrap_or_default()
            .into_iter()
            .filter_map(|item| {
                let book = item.into_book();
                if book.is_none() {
                    tracing::warn!("Skipping catalog item without an id");
                }
                book
            })
            .collect()
    }
}

impl VolumeItem {
    pub fn into_book(self) -> Option<Book> {
        let id = self.id.filter(|id| !id.trim().is_empty())?;
        let info = self.volume_info.unwrap_or_default();

        Some(Book {
            id,
            title: non_blank(info.title).unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            authors: non_empty_list(info.authors, UNKNOWN_AUTHOR),
            categories: non_empty_list(info.categories, UNCATEGORIZED),
            description: non_blank(info.description).unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            thumbnail_url: thumbnail_url(info.image_links.as_ref()),
            published_year: published_year(info.published_date.as_deref()),
            rating: info
                .average_rating
                .filter(|r| r.is_finite())
                .map(|r| r.clamp(0.0, 5.0)),
            page_count: info.page_count.filter(|p| *p > 0),
            preview_link: non_blank(info.preview_link),
        })
    }
}

/// Parse a raw catalog body into books
///
/// # Errors
/// Returns `InvalidApiResponse` when the body is not a volumes object.
pub fn parse_volumes(body: &str) -> Result<Vec<Book>> {
    match serde_json::from_str::<VolumesResponse>(body) {
        Ok(response) => Ok(response.into_books()),
        Err(e) => {
            // Keep a window of the body around the failure for diagnostics
            let mut start = e.column().saturating_sub(200).min(body.len());
            while !body.is_char_boundary(start) {
                start -= 1;
            }
            let mut end = (e.column() + 200).min(body.len());
            while !body.is_char_boundary(end) {
                end += 1;
            }

            Err(LibraryError::invalid_response(
                format!("Parse error: {} at col {}", e, e.column()),
                Some(body[start..end].to_string()),
            ))
        }
    }
}

/// Best-effort four-digit year from a possibly partial date string
pub fn published_year(date: Option<&str>) -> String {
    date.and_then(|d| YEAR_RE.find(d))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN_YEAR.to_string())
}

fn thumbnail_url(links: Option<&ImageLinks>) -> String {
    links
        .and_then(|l| {
            non_blank(l.thumbnail.clone()).or_else(|| non_blank(l.small_thumbnail.clone()))
        })
        .map(|url| match url.strip_prefix("http:") {
            Some(rest) => format!("https:{}", rest),
            None => url,
        })
        .unwrap_or_else(|| PLACEHOLDER_THUMBNAIL.to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn non_empty_list(values: Option<Vec<String>>, sentinel: &str) -> Vec<String> {
    match values {
        Some(v) if !v.is_empty() => v,
        _ => vec![sentinel.to_string()],
    }
}
