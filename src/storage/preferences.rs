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


//! Persisted preferences: favorites, display mode, color theme
//!
//! Stored formats:
//! - favorites: JSON array of `Book`
//! - display mode: JSON boolean (`true` = dark)
//! - color theme: JSON string theme id (`"blue"`)
//!
//! Reads never fail from the caller's point of view in
//! [`load_preferences`]: a missing key, a malformed value or an unavailable
//! store all yield the default for that field.

use crate::error::{LibraryError, Result};
use crate::library::models::{Book, ColorTheme, DisplayMode};
use crate::storage::store::PersistentStore;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Storage keys used for each preference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageKeys {
    pub favorites: String,
    pub display_mode: String,
    pub color_theme: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            favorites: "bookFavourites".to_string(),
            display_mode: "darkMode".to_string(),
            color_theme: "bookTheme".to_string(),
        }
    }
}

/// Everything restored at startup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preferences {
    pub favorites: Vec<Book>,
    pub display_mode: DisplayMode,
    pub color_theme: ColorTheme,
}

/// Load favorites, keeping the first entry for any repeated id
///
/// # Errors
/// Store failures, or `CorruptStoredValue` when the value is not a JSON array
/// of books.
pub async fn load_favorites<S>(store: &S, key: &str) -> Result<Vec<Book>>
where
    S: PersistentStore + ?Sized,
{
    let Some(raw) = store.get(key).await? else {
        return Ok(Vec::new());
    };

    let books: Vec<Book> = serde_json::from_str(&raw).map_err(|e| corrupt(key, e))?;

    let mut seen = HashSet::new();
    Ok(books
        .into_iter()
        .filter(|b| seen.insert(b.id.clone()))
        .collect())
}

pub async fn save_favorites<S>(store: &S, key: &str, favorites: &[Book]) -> Result<()>
where
    S: PersistentStore + ?Sized,
{
    let json = serde_json::to_string(favorites)?;
    store.set(key, &json).await
}

/// Load the display mode; absent → light
pub async fn load_display_mode<S>(store: &S, key: &str) -> Result<DisplayMode>
where
    S: PersistentStore + ?Sized,
{
    match store.get(key).await? {
        None => Ok(DisplayMode::default()),
        Some(raw) => serde_json::from_str::<bool>(&raw)
            .map(DisplayMode::from_dark_flag)
            .map_err(|e| corrupt(key, e)),
    }
}

pub async fn save_display_mode<S>(store: &S, key: &str, mode: DisplayMode) -> Result<()>
where
    S: PersistentStore + ?Sized,
{
    store.set(key, &serde_json::to_string(&mode.is_dark())?).await
}

/// Load the color theme; absent → blue
pub async fn load_color_theme<S>(store: &S, key: &str) -> Result<ColorTheme>
where
    S: PersistentStore + ?Sized,
{
    match store.get(key).await? {
        None => Ok(ColorTheme::default()),
        Some(raw) => serde_json::from_str::<ColorTheme>(&raw).map_err(|e| corrupt(key, e)),
    }
}

pub async fn save_color_theme<S>(store: &S, key: &str, theme: ColorTheme) -> Result<()>
where
    S: PersistentStore + ?Sized,
{
    store.set(key, &serde_json::to_string(&theme)?).await
}

/// Restore all preferences, substituting defaults for anything unreadable
pub async fn load_preferences<S>(store: &S, keys: &StorageKeys) -> Preferences
where
    S: PersistentStore + ?Sized,
{
    let favorites = load_favorites(store, &keys.favorites)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, key = %keys.favorites, "Using empty favorites");
            Vec::new()
        });

    let display_mode = load_display_mode(store, &keys.display_mode)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, key = %keys.display_mode, "Using light display mode");
            DisplayMode::default()
        });

    let color_theme = load_color_theme(store, &keys.color_theme)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, key = %keys.color_theme, "Using default color theme");
            ColorTheme::default()
        });

    Preferences {
        favorites,
        display_mode,
        color_theme,
    }
}

fn corrupt(key: &str, err: serde_json::Error) -> LibraryError {
    LibraryError::CorruptStoredValue {
        key: key.to_string(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::featured::featured_books;
    use crate::storage::store::MemoryStore;

    #[tokio::test]
    async fn test_defaults_when_empty() {
        let store = MemoryStore::new();
        let prefs = load_preferences(&store, &StorageKeys::default()).await;
        assert_eq!(prefs, Preferences::default());
    }

    #[tokio::test]
    async fn test_defaults_when_store_unavailable() {
        let store = MemoryStore::failing();
        let prefs = load_preferences(&store, &StorageKeys::default()).await;
        assert!(prefs.favorites.is_empty());
        assert_eq!(prefs.display_mode, DisplayMode::Light);
        assert_eq!(prefs.color_theme, ColorTheme::Blue);
    }

    #[tokio::test]
    async fn test_corrupt_values_fall_back_individually() {
        let books = featured_books();
        let store = MemoryStore::with_values([
            ("bookFavourites", "{not json"),
            ("darkMode", "true"),
            ("bookTheme", "\"chartreuse\""),
        ]);

        let err = load_favorites(&store, "bookFavourites").await.unwrap_err();
        assert!(matches!(err, LibraryError::CorruptStoredValue { .. }));

        let prefs = load_preferences(&store, &StorageKeys::default()).await;
        assert!(prefs.favorites.is_empty());
        assert_eq!(prefs.display_mode, DisplayMode::Dark);
        assert_eq!(prefs.color_theme, ColorTheme::Blue);

        save_favorites(&store, "bookFavourites", &books[..2]).await.unwrap();
        let restored = load_favorites(&store, "bookFavourites").await.unwrap();
        assert_eq!(restored, books[..2].to_vec());
    }

    #[tokio::test]
    async fn test_duplicate_ids_are_collapsed_on_load() {
        let books = featured_books();
        let dupes = vec![books[0].clone(), books[1].clone(), books[0].clone()];
        let store = MemoryStore::with_values([(
            "bookFavourites".to_string(),
            serde_json::to_string(&dupes).unwrap(),
        )]);

        let restored = load_favorites(&store, "bookFavourites").await.unwrap();
        assert_eq!(restored.len(), 2);
        assert_eq!(restored[0].id, books[0].id);
        assert_eq!(restored[1].id, books[1].id);
    }

    #[tokio::test]
    async fn test_display_mode_stored_as_bool() {
        let store = MemoryStore::new();
        save_display_mode(&store, "darkMode", DisplayMode::Dark).await.unwrap();
        assert_eq!(store.raw("darkMode").as_deref(), Some("true"));

        save_color_theme(&store, "bookTheme", ColorTheme::Emerald).await.unwrap();
        assert_eq!(store.raw("bookTheme").as_deref(), Some("\"emerald\""));
        assert_eq!(load_color_theme(&store, "bookTheme").await.unwrap(), ColorTheme::Emerald);
    }
}
