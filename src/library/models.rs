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


//! Domain models
//!
//! - `Book`: immutable catalog entry, also the serialized favorites element
//! - `Category`: the fixed category table (id, label, catalog filter clause)
//! - `DisplayMode` / `ColorTheme`: persisted presentation preferences
//! - `Page`: which sequence the presentation layer is showing

use crate::error::{LibraryError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Sentinel title when the catalog omits one
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Sentinel author entry when the catalog omits authors
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// Sentinel category entry when the catalog omits categories
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Sentinel description
pub const NO_DESCRIPTION: &str = "No description available.";

/// Published year when no date is known
pub const UNKNOWN_YEAR: &str = "Unknown";

/// Cover shown whenever a thumbnail is absent or unreachable
pub const PLACEHOLDER_THUMBNAIL: &str =
    "https://via.placeholder.com/200x300/4f46e5/ffffff?text=No+Cover";

/// A single book
///
/// Books are immutable once mapped from the catalog. `id` is stable across
/// queries and is the only identity used for favorites membership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub title: String,
    /// Never empty
    pub authors: Vec<String>,
    /// Never empty
    pub categories: Vec<String>,
    pub description: String,
    pub thumbnail_url: String,
    /// Four-digit year or "Unknown"
    pub published_year: String,
    /// Average rating in [0, 5]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_link: Option<String>,
}

impl Book {
    /// Authors joined for display ("A, B")
    pub fn authors_display(&self) -> String {
        self.authors.join(", ")
    }

    /// First category, used as the card badge
    pub fn primary_category(&self) -> &str {
        self.categories
            .first()
            .map(String::as_str)
            .unwrap_or(UNCATEGORIZED)
    }

    /// Rating if one was provided and is non-zero
    pub fn display_rating(&self) -> Option<f32> {
        self.rating.filter(|r| *r > 0.0)
    }

    /// Thumbnail to render; the placeholder when `reachable` is false or the
    /// stored URL is blank
    pub fn cover_url(&self, reachable: bool) -> &str {
        if reachable && !self.thumbnail_url.trim().is_empty() {
            &self.thumbnail_url
        } else {
            PLACEHOLDER_THUMBNAIL
        }
    }

    /// Description cut to `max_chars` characters with a trailing ellipsis
    pub fn excerpt(&self, max_chars: usize) -> String {
        match self.description.char_indices().nth(max_chars) {
            Some((byte_idx, _)) => format!("{}...", &self.description[..byte_idx]),
            None => self.description.clone(),
        }
    }

    /// Case-insensitive category match used by client-side filtering
    ///
    /// A book matches when any of its categories contains the category label.
    /// Sci-Fi additionally matches "science fiction".
    pub fn matches_category(&self, category: Category) -> bool {
        if category == Category::All {
            return true;
        }
        let label = category.label().to_lowercase();
        self.categories.iter().any(|c| {
            let c = c.to_lowercase();
            c.contains(&label) || (category == Category::SciFi && c.contains("science fiction"))
        })
    }
}

/// Fixed category table
///
/// | id         | label       | catalog filter              |
/// |------------|-------------|-----------------------------|
/// | all        | All         | (none)                      |
/// | fiction    | Fiction     | `subject:fiction`           |
/// | nonfiction | Non-Fiction | `subject:nonfiction`        |
/// | scifi      | Sci-Fi      | `subject:science fiction`   |
/// | mystery    | Mystery     | `subject:mystery`           |
/// | history    | History     | `subject:history`           |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    All,
    Fiction,
    #[serde(rename = "nonfiction")]
    NonFiction,
    #[serde(rename = "scifi")]
    SciFi,
    Mystery,
    History,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::All,
        Category::Fiction,
        Category::NonFiction,
        Category::SciFi,
        Category::Mystery,
        Category::History,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Fiction => "fiction",
            Self::NonFiction => "nonfiction",
            Self::SciFi => "scifi",
            Self::Mystery => "mystery",
            Self::History => "history",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Fiction => "Fiction",
            Self::NonFiction => "Non-Fiction",
            Self::SciFi => "Sci-Fi",
            Self::Mystery => "Mystery",
            Self::History => "History",
        }
    }

    /// Catalog filter clause, `None` for the default category
    pub fn filter(&self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Fiction => Some("subject:fiction"),
            Self::NonFiction => Some("subject:nonfiction"),
            Self::SciFi => Some("subject:science fiction"),
            Self::Mystery => Some("subject:mystery"),
            Self::History => Some("subject:history"),
        }
    }

    pub fn is_default(&self) -> bool {
        *self == Self::All
    }
}

impl FromStr for Category {
    type Err = LibraryError;

    /// Accepts either the id or the label, case-insensitively
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.id() == wanted || c.label().to_lowercase() == wanted)
            .ok_or_else(|| LibraryError::invalid_input(format!("Unknown category: {}", s)))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Light / dark display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisplayMode {
    #[default]
    Light,
    Dark,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }

    pub fn from_dark_flag(dark: bool) -> Self {
        if dark {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

impl FromStr for DisplayMode {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(LibraryError::invalid_input(format!("Unknown display mode: {}", other))),
        }
    }
}

/// Accent color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTheme {
    #[default]
    Blue,
    Purple,
    Emerald,
    Rose,
    Amber,
}

impl ColorTheme {
    pub const ALL: [ColorTheme; 5] = [
        ColorTheme::Blue,
        ColorTheme::Purple,
        ColorTheme::Emerald,
        ColorTheme::Rose,
        ColorTheme::Amber,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Purple => "purple",
            Self::Emerald => "emerald",
            Self::Rose => "rose",
            Self::Amber => "amber",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Blue => "Ocean Blue",
            Self::Purple => "Royal Purple",
            Self::Emerald => "Forest Green",
            Self::Rose => "Rose Garden",
            Self::Amber => "Golden Sunset",
        }
    }
}

impl FromStr for ColorTheme {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        ColorTheme::ALL
            .into_iter()
            .find(|t| t.id() == wanted)
            .ok_or_else(|| LibraryError::invalid_input(format!("Unknown color theme: {}", s)))
    }
}

/// Page the presentation layer is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Browse,
    Favorites,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book_with_categories(categories: &[&str]) -> Book {
        Book {
            id: "b1".to_string(),
            title: "T".to_string(),
            authors: vec![UNKNOWN_AUTHOR.to_string()],
            categories: categories.iter().map(|c| c.to_string()).collect(),
            description: NO_DESCRIPTION.to_string(),
            thumbnail_url: PLACEHOLDER_THUMBNAIL.to_string(),
            published_year: UNKNOWN_YEAR.to_string(),
            rating: None,
            page_count: None,
            preview_link: None,
        }
    }

    #[test]
    fn test_category_from_str_accepts_id_and_label() {
        assert_eq!("scifi".parse::<Category>().unwrap(), Category::SciFi);
        assert_eq!("Sci-Fi".parse::<Category>().unwrap(), Category::SciFi);
        assert_eq!("NON-FICTION".parse::<Category>().unwrap(), Category::NonFiction);
        assert!("romance".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_filters() {
        assert_eq!(Category::All.filter(), None);
        assert_eq!(Category::NonFiction.filter(), Some("subject:nonfiction"));
        assert_eq!(Category::SciFi.filter(), Some("subject:science fiction"));
    }

    #[test]
    fn test_scifi_synonym_matching() {
        assert!(book_with_categories(&["Science Fiction"]).matches_category(Category::SciFi));
        assert!(book_with_categories(&["sci-fi & fantasy"]).matches_category(Category::SciFi));
        assert!(!book_with_categories(&["Mystery"]).matches_category(Category::SciFi));
        assert!(book_with_categories(&["Mystery"]).matches_category(Category::All));
    }

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        let mut book = book_with_categories(&["Fiction"]);
        book.description = "Ünïcödé text".to_string();
        assert_eq!(book.excerpt(5), "Ünïcö...");
        assert_eq!(book.excerpt(100), "Ünïcödé text");
    }

    #[test]
    fn test_cover_url_falls_back_to_placeholder() {
        let mut book = book_with_categories(&["Fiction"]);
        book.thumbnail_url = "https://example.com/cover.jpg".to_string();
        assert_eq!(book.cover_url(true), "https://example.com/cover.jpg");
        assert_eq!(book.cover_url(false), PLACEHOLDER_THUMBNAIL);
        book.thumbnail_url = "  ".to_string();
        assert_eq!(book.cover_url(true), PLACEHOLDER_THUMBNAIL);
    }

    #[test]
    fn test_display_mode_toggle() {
        assert_eq!(DisplayMode::Light.toggled(), DisplayMode::Dark);
        assert_eq!(DisplayMode::Dark.toggled(), DisplayMode::Light);
        assert_eq!(DisplayMode::from_dark_flag(true), DisplayMode::Dark);
    }

    #[test]
    fn test_book_serializes_camel_case() {
        let json = serde_json::to_value(book_with_categories(&["Fiction"])).unwrap();
        assert!(json.get("thumbnailUrl").is_some());
        assert!(json.get("publishedYear").is_some());
        assert!(json.get("rating").is_none());
    }
}
