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


//! Library state aggregate
//!
//! `LibraryState` holds everything the presentation layer renders. Its
//! mutating methods are pure transitions; persistence, catalog calls and
//! notifications are the controller's job.
//!
//! # Invariants
//! - `favorites` never holds two books with the same id
//! - `is_search_pending` is true only while the latest catalog request is
//!   outstanding
//! - `last_error` is `None` whenever `is_search_pending` is true

use crate::error::{FailureKind, LibraryError};
use crate::library::models::{Book, Category, ColorTheme, DisplayMode, Page};
use serde::{Deserialize, Serialize};

/// Shown when a user search fails
pub const SEARCH_FAILED_MESSAGE: &str = "Failed to search books. Please try again.";

/// Shown when the catalog-sourced featured list cannot be loaded
pub const FEATURED_FAILED_MESSAGE: &str = "Failed to load featured books.";

/// Shown when a search resolved with nothing
pub const NO_RESULTS_MESSAGE: &str = "No books found. Try a different search term.";

/// Descriptor of the most recent failed fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastError {
    pub kind: FailureKind,
    /// User-facing copy
    pub message: String,
    /// Class-specific explanation
    pub detail: String,
}

impl LastError {
    pub fn from_error(err: &LibraryError, message: &str) -> Self {
        Self {
            kind: err.failure_kind().unwrap_or(FailureKind::Network),
            message: message.to_string(),
            detail: err.user_message(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LibraryState {
    /// Current result set, in catalog order
    pub displayed_books: Vec<Book>,
    /// Default list restored by an empty search
    pub featured_books: Vec<Book>,
    /// Favorites in append order
    pub favorites: Vec<Book>,
    pub search_term: String,
    pub active_category: Category,
    pub is_search_pending: bool,
    pub last_error: Option<LastError>,
    pub has_searched_once: bool,
    pub display_mode: DisplayMode,
    pub color_theme: ColorTheme,
}

impl LibraryState {
    /// State at startup before the featured list is known
    pub fn new(favorites: Vec<Book>, display_mode: DisplayMode, color_theme: ColorTheme) -> Self {
        Self {
            favorites,
            display_mode,
            color_theme,
            ..Self::default()
        }
    }

    // ===== Derived views =====

    /// True exactly when the "no results" copy should be shown
    ///
    /// An empty featured list before any search does not count.
    pub fn shows_no_results(&self) -> bool {
        !self.is_search_pending
            && self.displayed_books.is_empty()
            && (self.has_searched_once || !self.search_term.is_empty())
    }

    /// Empty-state copy for the browse page, if any
    pub fn empty_state_message(&self) -> Option<&'static str> {
        if self.shows_no_results() {
            Some(NO_RESULTS_MESSAGE)
        } else {
            None
        }
    }

    /// Heading above the browse grid
    pub fn results_heading(&self) -> &'static str {
        if self.has_searched_once {
            "Search Results"
        } else if self.active_category.is_default() {
            "Featured Books"
        } else {
            self.active_category.label()
        }
    }

    pub fn is_favorite(&self, book_id: &str) -> bool {
        self.favorites.iter().any(|b| b.id == book_id)
    }

    pub fn favorites_count(&self) -> usize {
        self.favorites.len()
    }

    /// Sequence for the given page
    pub fn visible_books(&self, page: Page) -> &[Book] {
        match page {
            Page::Browse => &self.displayed_books,
            Page::Favorites => &self.favorites,
        }
    }

    // ===== Favorites transitions =====

    /// Flip membership of `book`; returns whether it is now a favorite
    pub fn toggle_favorite(&mut self, book: &Book) -> bool {
        if self.remove_favorite(&book.id) {
            false
        } else {
            self.favorites.push(book.clone());
            true
        }
    }

    /// Append `book` unless its id is already present; returns whether it was added
    pub fn add_favorite(&mut self, book: &Book) -> bool {
        if self.is_favorite(&book.id) {
            return false;
        }
        self.favorites.push(book.clone());
        true
    }

    /// Remove by id; returns whether anything was removed
    pub fn remove_favorite(&mut self, book_id: &str) -> bool {
        let before = self.favorites.len();
        self.favorites.retain(|b| b.id != book_id);
        self.favorites.len() != before
    }

    // ===== Search transitions =====

    /// Mark a catalog request as outstanding
    pub fn begin_fetch(&mut self) {
        self.is_search_pending = true;
        self.last_error = None;
    }

    /// Apply a resolved user search
    pub fn finish_search(&mut self, result: Result<Vec<Book>, &LibraryError>) {
        self.is_search_pending = false;
        match result {
            Ok(books) => {
                self.displayed_books = books;
                self.has_searched_once = true;
                self.last_error = None;
            }
            Err(err) => {
                self.displayed_books = Vec::new();
                self.last_error = Some(LastError::from_error(err, SEARCH_FAILED_MESSAGE));
            }
        }
    }

    /// Show a locally computed list (featured, or featured filtered by category)
    ///
    /// Ends any pending fetch from the state's point of view.
    pub fn show_local(&mut self, books: Vec<Book>) {
        self.displayed_books = books;
        self.is_search_pending = false;
        self.last_error = None;
        self.has_searched_once = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::featured::featured_books;

    #[test]
    fn test_toggle_is_strict_flip() {
        let mut state = LibraryState::default();
        let book = featured_books().remove(0);

        for i in 1..=7 {
            let now_favorite = state.toggle_favorite(&book);
            assert_eq!(now_favorite, i % 2 == 1);
            assert_eq!(state.is_favorite(&book.id), i % 2 == 1);
            assert!(state.favorites.len() <= 1);
        }
    }

    #[test]
    fn test_add_with_duplicate_id_keeps_single_entry() {
        let mut state = LibraryState::default();
        let book = featured_books().remove(0);
        let mut same_id = featured_books().remove(1);
        same_id.id = book.id.clone();

        assert!(state.add_favorite(&book));
        assert!(!state.add_favorite(&same_id));
        assert_eq!(state.favorites.len(), 1);
        assert_eq!(state.favorites[0].title, book.title);
    }

    #[test]
    fn test_favorites_keep_append_order() {
        let mut state = LibraryState::default();
        let books = featured_books();
        state.toggle_favorite(&books[2]);
        state.toggle_favorite(&books[0]);
        state.toggle_favorite(&books[1]);
        state.toggle_favorite(&books[0]);
        state.toggle_favorite(&books[0]);

        let ids: Vec<&str> = state.favorites.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["featured3", "featured2", "featured1"]);
        assert_eq!(state.visible_books(Page::Favorites).len(), 3);
    }

    #[test]
    fn test_no_results_not_shown_for_empty_featured_list() {
        let state = LibraryState::default();
        assert!(!state.shows_no_results());
        assert_eq!(state.empty_state_message(), None);
    }

    #[test]
    fn test_no_results_after_empty_search() {
        let mut state = LibraryState::default();
        state.search_term = "zzzz".to_string();
        state.begin_fetch();
        assert!(!state.shows_no_results());

        state.finish_search(Ok(Vec::new()));
        assert!(state.shows_no_results());
        assert_eq!(state.empty_state_message(), Some(NO_RESULTS_MESSAGE));
        assert_eq!(state.results_heading(), "Search Results");
    }

    #[test]
    fn test_no_results_with_term_typed_but_not_submitted() {
        let mut state = LibraryState::default();
        state.search_term = "typed".to_string();
        assert!(state.shows_no_results());

        state.displayed_books = featured_books();
        assert!(!state.shows_no_results());

        // Whitespace still counts as a typed term
        state.displayed_books.clear();
        state.search_term = "   ".to_string();
        assert!(state.shows_no_results());
    }

    #[test]
    fn test_failed_search_records_error_and_clears_books() {
        let mut state = LibraryState::default();
        state.displayed_books = featured_books();
        state.begin_fetch();
        assert!(state.last_error.is_none());

        let err = LibraryError::api_failed("boom", Some(500), None);
        state.finish_search(Err(&err));

        assert!(!state.is_search_pending);
        assert!(state.displayed_books.is_empty());
        let last = state.last_error.clone().unwrap();
        assert_eq!(last.kind, FailureKind::HttpStatus);
        assert_eq!(last.message, SEARCH_FAILED_MESSAGE);
        assert_eq!(last.detail, "The book catalog could not answer this search.");
        assert!(!state.has_searched_once);
    }

    #[test]
    fn test_last_error_detail_depends_on_failure_class() {
        let network = LastError::from_error(
            &LibraryError::network_error("refused", true),
            SEARCH_FAILED_MESSAGE,
        );
        let malformed = LastError::from_error(
            &LibraryError::invalid_response("bad json", None),
            SEARCH_FAILED_MESSAGE,
        );

        assert_eq!(network.kind, FailureKind::Network);
        assert!(network.detail.contains("connection"));
        assert_eq!(malformed.kind, FailureKind::MalformedPayload);
        assert!(malformed.detail.contains("unexpected response"));
    }

    #[test]
    fn test_heading_for_category_filter() {
        let mut state = LibraryState::default();
        assert_eq!(state.results_heading(), "Featured Books");
        state.active_category = Category::Mystery;
        assert_eq!(state.results_heading(), "Mystery");
    }
}
