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


//! Controller configuration

use crate::error::{LibraryError, Result};
use crate::storage::preferences::StorageKeys;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a category change is applied when the search term is empty
///
/// Fixed for the lifetime of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryStrategy {
    /// Filter the featured list locally by category label
    #[default]
    StaticFilter,
    /// Ask the catalog for the category's filter clause alone
    CatalogQuery,
}

impl FromStr for CategoryStrategy {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "static" | "static_filter" => Ok(Self::StaticFilter),
            "query" | "catalog" | "catalog_query" => Ok(Self::CatalogQuery),
            other => Err(LibraryError::InvalidConfiguration(format!(
                "Unknown category strategy: {}",
                other
            ))),
        }
    }
}

/// Where the featured list comes from at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeaturedSource {
    /// The compiled-in list; no catalog call at startup
    #[default]
    BuiltIn,
    /// One catalog call for `subject:fiction`, built-in list on failure
    Catalog,
}

impl FromStr for FeaturedSource {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "builtin" | "built_in" | "built-in" => Ok(Self::BuiltIn),
            "catalog" => Ok(Self::Catalog),
            other => Err(LibraryError::InvalidConfiguration(format!(
                "Unknown featured source: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryConfig {
    pub category_strategy: CategoryStrategy,
    pub featured_source: FeaturedSource,
    pub keys: StorageKeys,
    /// Capacity of the event broadcast channel
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

fn default_event_capacity() -> usize {
    64
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            category_strategy: CategoryStrategy::default(),
            featured_source: FeaturedSource::default(),
            keys: StorageKeys::default(),
            event_capacity: default_event_capacity(),
        }
    }
}

impl LibraryConfig {
    pub fn builder() -> LibraryConfigBuilder {
        LibraryConfigBuilder::new()
    }
}

/// Builder for LibraryConfig
#[derive(Debug)]
pub struct LibraryConfigBuilder {
    config: LibraryConfig,
}

impl LibraryConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: LibraryConfig::default(),
        }
    }

    pub fn category_strategy(mut self, strategy: CategoryStrategy) -> Self {
        self.config.category_strategy = strategy;
        self
    }

    pub fn featured_source(mut self, source: FeaturedSource) -> Self {
        self.config.featured_source = source;
        self
    }

    pub fn keys(mut self, keys: StorageKeys) -> Self {
        self.config.keys = keys;
        self
    }

    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.config.event_capacity = capacity.max(1);
        self
    }

    pub fn build(self) -> LibraryConfig {
        self.config
    }
}

impl Default for LibraryConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = LibraryConfig::builder().build();
        assert_eq!(config.category_strategy, CategoryStrategy::StaticFilter);
        assert_eq!(config.featured_source, FeaturedSource::BuiltIn);
        assert_eq!(config.keys.favorites, "bookFavourites");
        assert_eq!(config.event_capacity, 64);
    }

    #[test]
    fn test_parse_strategy_and_source() {
        assert_eq!("query".parse::<CategoryStrategy>().unwrap(), CategoryStrategy::CatalogQuery);
        assert_eq!("static".parse::<CategoryStrategy>().unwrap(), CategoryStrategy::StaticFilter);
        assert!("both".parse::<CategoryStrategy>().is_err());
        assert_eq!("catalog".parse::<FeaturedSource>().unwrap(), FeaturedSource::Catalog);
    }

    #[test]
    fn test_event_capacity_floor() {
        assert_eq!(LibraryConfig::builder().event_capacity(0).build().event_capacity, 1);
    }
}
