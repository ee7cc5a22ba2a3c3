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


//! Library controller
//!
//! The single mutator of [`LibraryState`]. It mediates between user actions,
//! the [`CatalogSource`] and the [`PersistentStore`].
//!
//! # Ordering
//! Every catalog request is tagged with a generation number taken when it is
//! issued. A response is applied only if its generation is still the latest;
//! anything older is dropped on arrival. Local list changes (restoring the
//! featured list, client-side category filtering) also advance the
//! generation, so a slow request can never overwrite them either. There is no
//! cancellation and no timeout: a request that never resolves leaves
//! `is_search_pending` set until a newer action replaces it.
//!
//! # Persistence
//! Favorites, display mode and color theme are written to the store right
//! after the mutation, while the state lock is still held, so writes land in
//! mutation order. Write failures are logged and otherwise ignored.
//!
//! # Notifications
//! [`LibraryController::subscribe`] hands out a broadcast receiver of
//! [`LibraryEvent`]s; the presentation layer re-reads whatever it renders
//! when an event arrives.

use crate::api::CatalogSource;
use crate::error::{FailureKind, LibraryError};
use crate::library::config::{CategoryStrategy, FeaturedSource, LibraryConfig};
use crate::library::featured::{featured_books, filter_by_category};
use crate::library::models::{Book, Category, ColorTheme, DisplayMode, Page};
use crate::library::state::{LastError, LibraryState, FEATURED_FAILED_MESSAGE};
use crate::storage::preferences::{
    load_preferences, save_color_theme, save_display_mode, save_favorites,
};
use crate::storage::PersistentStore;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// State change notification
#[derive(Debug, Clone, PartialEq)]
pub enum LibraryEvent {
    /// `displayed_books` was replaced
    BooksChanged,
    SearchTermChanged,
    CategoryChanged(Category),
    /// A catalog request was issued
    SearchStarted { generation: u64 },
    /// The latest catalog request resolved and was applied
    SearchFinished { generation: u64, outcome: SearchOutcome },
    FavoritesChanged { count: usize },
    DisplayModeChanged(DisplayMode),
    ColorThemeChanged(ColorTheme),
}

/// What a search-like action ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Default list shown without a catalog call
    Restored { count: usize },
    /// Featured list filtered locally
    Filtered { count: usize },
    /// Catalog results applied
    Loaded { count: usize },
    /// Catalog failed; `last_error` is set and the list is empty
    Failed(FailureKind),
    /// A newer action replaced this one before it resolved
    Superseded,
}

struct Inner {
    state: LibraryState,
    /// Generation of the most recently issued fetch or local list change
    generation: u64,
}

pub struct LibraryController {
    catalog: Arc<dyn CatalogSource>,
    store: Arc<dyn PersistentStore>,
    config: LibraryConfig,
    inner: Mutex<Inner>,
    events: broadcast::Sender<LibraryEvent>,
}

impl LibraryController {
    /// Create a controller with empty state; call [`Self::initialize`] next
    pub fn new(
        catalog: Arc<dyn CatalogSource>,
        store: Arc<dyn PersistentStore>,
        config: LibraryConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            catalog,
            store,
            config,
            inner: Mutex::new(Inner {
                state: LibraryState::default(),
                generation: 0,
            }),
            events,
        }
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LibraryEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: LibraryEvent) {
        // No receivers is fine
        let _ = self.events.send(event);
    }

    // ===== Lifecycle =====

    /// Restore preferences and populate the featured list
    ///
    /// Unreadable preferences fall back to defaults. With
    /// [`FeaturedSource::Catalog`] this issues one catalog call; on failure
    /// the built-in list is shown and `last_error` is set.
    pub async fn initialize(&self) -> SearchOutcome {
        let prefs = load_preferences(self.store.as_ref(), &self.config.keys).await;
        info!(
            favorites = prefs.favorites.len(),
            dark = prefs.display_mode.is_dark(),
            "Restored preferences"
        );

        let builtin = featured_books();
        let mut inner = self.inner.lock().await;
        inner.state = LibraryState::new(prefs.favorites, prefs.display_mode, prefs.color_theme);
        inner.state.featured_books = builtin.clone();

        match self.config.featured_source {
            FeaturedSource::BuiltIn => {
                inner.generation += 1;
                inner.state.show_local(builtin);
                let count = inner.state.displayed_books.len();
                drop(inner);
                self.emit(LibraryEvent::BooksChanged);
                SearchOutcome::Restored { count }
            }
            FeaturedSource::Catalog => {
                let generation = Self::issue(&mut inner);
                drop(inner);
                self.emit(LibraryEvent::SearchStarted { generation });

                let result = self.catalog.featured().await;
                self.apply_featured(generation, result, builtin).await
            }
        }
    }

    async fn apply_featured(
        &self,
        generation: u64,
        result: crate::error::Result<Vec<Book>>,
        builtin: Vec<Book>,
    ) -> SearchOutcome {
        let mut inner = self.inner.lock().await;

        let (featured, error) = match result {
            Ok(books) => (books, None),
            Err(e) => {
                warn!(error = %e, "Featured list unavailable, using built-in list");
                let last = LastError::from_error(&e, FEATURED_FAILED_MESSAGE);
                (builtin, Some(last))
            }
        };
        inner.state.featured_books = featured.clone();

        if inner.generation != generation {
            debug!(generation, latest = inner.generation, "Discarding superseded featured response");
            return SearchOutcome::Superseded;
        }

        let outcome = match &error {
            Some(last) => SearchOutcome::Failed(last.kind),
            None => SearchOutcome::Loaded { count: featured.len() },
        };
        inner.state.show_local(featured);
        inner.state.last_error = error;
        drop(inner);

        self.emit(LibraryEvent::SearchFinished { generation, outcome });
        self.emit(LibraryEvent::BooksChanged);
        outcome
    }

    // ===== Search =====

    /// Update the in-progress query text; no fetch
    pub async fn set_search_term(&self, text: impl Into<String>) {
        self.inner.lock().await.state.search_term = text.into();
        self.emit(LibraryEvent::SearchTermChanged);
    }

    /// Run the current term and category
    ///
    /// Empty term with the default category restores the featured list
    /// without a catalog call. Empty term with another category follows the
    /// configured [`CategoryStrategy`], exactly as [`Self::select_category`]
    /// does.
    pub async fn submit_search(&self) -> SearchOutcome {
        let inner = self.inner.lock().await;
        let category = inner.state.active_category;
        self.refresh(inner, category).await
    }

    /// Change the active category and refresh the list
    ///
    /// With a non-empty term this searches again. With an empty term the
    /// configured [`CategoryStrategy`] decides between filtering the featured
    /// list locally and asking the catalog for the category alone.
    pub async fn select_category(&self, category: Category) -> SearchOutcome {
        let mut inner = self.inner.lock().await;
        inner.state.active_category = category;
        self.emit(LibraryEvent::CategoryChanged(category));
        self.refresh(inner, category).await
    }

    /// Shared by submit and category selection so both apply one strategy
    async fn refresh(&self, mut inner: MutexGuard<'_, Inner>, category: Category) -> SearchOutcome {
        let term = inner.state.search_term.trim().to_string();
        if !term.is_empty() {
            return self.fetch(inner, term, category).await;
        }
        if category.is_default() {
            return self.restore_featured(inner);
        }

        match self.config.category_strategy {
            CategoryStrategy::StaticFilter => {
                let filtered = filter_by_category(&inner.state.featured_books, category);
                let count = filtered.len();
                inner.generation += 1;
                inner.state.show_local(filtered);
                drop(inner);
                debug!(category = category.id(), count, "Filtered featured list");
                self.emit(LibraryEvent::BooksChanged);
                SearchOutcome::Filtered { count }
            }
            CategoryStrategy::CatalogQuery => self.fetch(inner, term, category).await,
        }
    }

    /// [`Self::select_category`] by id or label
    pub async fn select_category_by_id(&self, id: &str) -> crate::error::Result<SearchOutcome> {
        let category: Category = id.parse()?;
        Ok(self.select_category(category).await)
    }

    fn restore_featured(&self, mut inner: MutexGuard<'_, Inner>) -> SearchOutcome {
        inner.generation += 1;
        let featured = inner.state.featured_books.clone();
        let count = featured.len();
        inner.state.show_local(featured);
        drop(inner);

        self.emit(LibraryEvent::BooksChanged);
        SearchOutcome::Restored { count }
    }

    /// Take a new generation and mark the fetch pending
    fn issue(inner: &mut Inner) -> u64 {
        inner.generation += 1;
        inner.state.begin_fetch();
        inner.generation
    }

    async fn fetch(
        &self,
        mut inner: MutexGuard<'_, Inner>,
        term: String,
        category: Category,
    ) -> SearchOutcome {
        let generation = Self::issue(&mut inner);
        drop(inner);

        debug!(generation, %term, category = category.id(), "Issuing catalog search");
        self.emit(LibraryEvent::SearchStarted { generation });

        let result = self.catalog.query(&term, category.filter()).await;

        let mut inner = self.inner.lock().await;
        if inner.generation != generation {
            debug!(generation, latest = inner.generation, "Discarding superseded search response");
            return SearchOutcome::Superseded;
        }

        let outcome = match result {
            Ok(books) => {
                let count = books.len();
                info!(generation, %term, count, "Search completed");
                inner.state.finish_search(Ok(books));
                SearchOutcome::Loaded { count }
            }
            Err(e) => {
                warn!(generation, %term, error = %e, "Search failed");
                inner.state.finish_search(Err(&e));
                SearchOutcome::Failed(failure_kind(&e))
            }
        };
        drop(inner);

        self.emit(LibraryEvent::SearchFinished { generation, outcome });
        self.emit(LibraryEvent::BooksChanged);
        outcome
    }

    // ===== Favorites =====

    /// Flip favorite membership of `book`; returns whether it is now a favorite
    pub async fn toggle_favorite(&self, book: &Book) -> bool {
        let mut inner = self.inner.lock().await;
        let now_favorite = inner.state.toggle_favorite(book);
        self.persist_favorites(&inner).await;
        let count = inner.state.favorites_count();
        drop(inner);

        self.emit(LibraryEvent::FavoritesChanged { count });
        now_favorite
    }

    /// Add unless already present; returns whether it was added
    pub async fn add_favorite(&self, book: &Book) -> bool {
        let mut inner = self.inner.lock().await;
        if !inner.state.add_favorite(book) {
            return false;
        }
        self.persist_favorites(&inner).await;
        let count = inner.state.favorites_count();
        drop(inner);

        self.emit(LibraryEvent::FavoritesChanged { count });
        true
    }

    /// Remove by id; returns whether anything was removed
    pub async fn remove_favorite(&self, book_id: &str) -> bool {
        let mut inner = self.inner.lock().await;
        if !inner.state.remove_favorite(book_id) {
            return false;
        }
        self.persist_favorites(&inner).await;
        let count = inner.state.favorites_count();
        drop(inner);

        self.emit(LibraryEvent::FavoritesChanged { count });
        true
    }

    pub async fn is_favorite(&self, book_id: &str) -> bool {
        self.inner.lock().await.state.is_favorite(book_id)
    }

    async fn persist_favorites(&self, inner: &Inner) {
        let key = &self.config.keys.favorites;
        if let Err(e) = save_favorites(self.store.as_ref(), key, &inner.state.favorites).await {
            warn!(error = %e, %key, "Failed to persist favorites");
        }
    }

    // ===== Display preferences =====

    /// Flip light/dark and persist; returns the new mode
    pub async fn toggle_display_mode(&self) -> DisplayMode {
        let mut inner = self.inner.lock().await;
        let mode = inner.state.display_mode.toggled();
        self.apply_display_mode(&mut inner, mode).await;
        mode
    }

    pub async fn set_display_mode(&self, mode: DisplayMode) {
        let mut inner = self.inner.lock().await;
        self.apply_display_mode(&mut inner, mode).await;
    }

    async fn apply_display_mode(&self, inner: &mut Inner, mode: DisplayMode) {
        inner.state.display_mode = mode;
        let key = &self.config.keys.display_mode;
        if let Err(e) = save_display_mode(self.store.as_ref(), key, mode).await {
            warn!(error = %e, %key, "Failed to persist display mode");
        }
        self.emit(LibraryEvent::DisplayModeChanged(mode));
    }

    pub async fn set_color_theme(&self, theme: ColorTheme) {
        let mut inner = self.inner.lock().await;
        inner.state.color_theme = theme;
        let key = &self.config.keys.color_theme;
        if let Err(e) = save_color_theme(self.store.as_ref(), key, theme).await {
            warn!(error = %e, %key, "Failed to persist color theme");
        }
        drop(inner);
        self.emit(LibraryEvent::ColorThemeChanged(theme));
    }

    // ===== Views =====

    /// Clone of the whole state
    pub async fn snapshot(&self) -> LibraryState {
        self.inner.lock().await.state.clone()
    }

    pub async fn displayed_books(&self) -> Vec<Book> {
        self.inner.lock().await.state.displayed_books.clone()
    }

    /// Favorites in append order
    pub async fn favorites(&self) -> Vec<Book> {
        self.inner.lock().await.state.favorites.clone()
    }

    pub async fn visible_books(&self, page: Page) -> Vec<Book> {
        self.inner.lock().await.state.visible_books(page).to_vec()
    }

    pub async fn shows_no_results(&self) -> bool {
        self.inner.lock().await.state.shows_no_results()
    }

    pub async fn is_search_pending(&self) -> bool {
        self.inner.lock().await.state.is_search_pending
    }

    pub async fn last_error(&self) -> Option<LastError> {
        self.inner.lock().await.state.last_error.clone()
    }
}

fn failure_kind(err: &LibraryError) -> FailureKind {
    err.failure_kind().unwrap_or(FailureKind::Network)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Catalog answering every query with one book named after the query
    #[derive(Default)]
    struct EchoCatalog {
        calls: AtomicUsize,
        last_filter: std::sync::Mutex<Option<String>>,
    }

    #[async_trait]
    impl CatalogSource for EchoCatalog {
        async fn query(&self, term: &str, category_filter: Option<&str>) -> crate::error::Result<Vec<Book>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_filter.lock().unwrap() = category_filter.map(str::to_string);
            let mut book = featured_books().remove(0);
            book.id = format!("echo-{}", term);
            book.title = term.to_string();
            Ok(vec![book])
        }
    }

    struct FailingCatalog;

    #[async_trait]
    impl CatalogSource for FailingCatalog {
        async fn query(&self, _term: &str, _filter: Option<&str>) -> crate::error::Result<Vec<Book>> {
            Err(LibraryError::network_error("connection refused", true))
        }
    }

    fn controller_with(
        catalog: Arc<dyn CatalogSource>,
        store: Arc<MemoryStore>,
        config: LibraryConfig,
    ) -> LibraryController {
        LibraryController::new(catalog, store, config)
    }

    #[tokio::test]
    async fn test_initialize_builtin_makes_no_catalog_call() {
        let catalog = Arc::new(EchoCatalog::default());
        let controller = controller_with(catalog.clone(), Arc::new(MemoryStore::new()), LibraryConfig::default());

        let outcome = controller.initialize().await;
        assert_eq!(outcome, SearchOutcome::Restored { count: 5 });
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 0);

        let state = controller.snapshot().await;
        assert_eq!(state.displayed_books, featured_books());
        assert!(!state.has_searched_once);
        assert!(!state.shows_no_results());
    }

    #[tokio::test]
    async fn test_initialize_catalog_failure_falls_back_to_builtin() {
        let config = LibraryConfig::builder()
            .featured_source(FeaturedSource::Catalog)
            .build();
        let controller = controller_with(Arc::new(FailingCatalog), Arc::new(MemoryStore::new()), config);

        let outcome = controller.initialize().await;
        assert_eq!(outcome, SearchOutcome::Failed(FailureKind::Network));

        let state = controller.snapshot().await;
        assert_eq!(state.displayed_books, featured_books());
        assert_eq!(state.last_error.unwrap().message, FEATURED_FAILED_MESSAGE);
        assert!(!state.is_search_pending);
    }

    #[tokio::test]
    async fn test_empty_submit_restores_featured_without_call() {
        let catalog = Arc::new(EchoCatalog::default());
        let controller = controller_with(catalog.clone(), Arc::new(MemoryStore::new()), LibraryConfig::default());
        controller.initialize().await;

        controller.set_search_term("dune").await;
        controller.submit_search().await;
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 1);

        controller.set_search_term("   ").await;
        let outcome = controller.submit_search().await;
        assert_eq!(outcome, SearchOutcome::Restored { count: 5 });
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 1);
        assert_eq!(controller.displayed_books().await, featured_books());
    }

    #[tokio::test]
    async fn test_submit_combines_term_and_category_filter() {
        let catalog = Arc::new(EchoCatalog::default());
        let controller = controller_with(catalog.clone(), Arc::new(MemoryStore::new()), LibraryConfig::default());
        controller.initialize().await;

        controller.set_search_term("herbert").await;
        let outcome = controller.select_category(Category::SciFi).await;
        assert_eq!(outcome, SearchOutcome::Loaded { count: 1 });
        assert_eq!(
            catalog.last_filter.lock().unwrap().as_deref(),
            Some("subject:science fiction")
        );

        let state = controller.snapshot().await;
        assert!(state.has_searched_once);
        assert_eq!(state.displayed_books[0].title, "herbert");
    }

    #[tokio::test]
    async fn test_catalog_query_strategy_queries_category_alone() {
        let catalog = Arc::new(EchoCatalog::default());
        let config = LibraryConfig::builder()
            .category_strategy(CategoryStrategy::CatalogQuery)
            .build();
        let controller = controller_with(catalog.clone(), Arc::new(MemoryStore::new()), config);
        controller.initialize().await;

        let outcome = controller.select_category(Category::History).await;
        assert_eq!(outcome, SearchOutcome::Loaded { count: 1 });
        assert_eq!(catalog.last_filter.lock().unwrap().as_deref(), Some("subject:history"));

        // Back to All restores locally
        let outcome = controller.select_category(Category::All).await;
        assert_eq!(outcome, SearchOutcome::Restored { count: 5 });
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_submit_after_category_keeps_static_filter() {
        let catalog = Arc::new(EchoCatalog::default());
        let controller = controller_with(catalog.clone(), Arc::new(MemoryStore::new()), LibraryConfig::default());
        controller.initialize().await;

        let selected = controller.select_category(Category::Mystery).await;
        let submitted = controller.submit_search().await;

        assert_eq!(selected, SearchOutcome::Filtered { count: 1 });
        assert_eq!(submitted, SearchOutcome::Filtered { count: 1 });
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 0);
        let ids: Vec<String> = controller.displayed_books().await.into_iter().map(|b| b.id).collect();
        assert_eq!(ids, vec!["featured3"]);
    }

    #[tokio::test]
    async fn test_submit_after_category_keeps_catalog_query() {
        let catalog = Arc::new(EchoCatalog::default());
        let config = LibraryConfig::builder()
            .category_strategy(CategoryStrategy::CatalogQuery)
            .build();
        let controller = controller_with(catalog.clone(), Arc::new(MemoryStore::new()), config);
        controller.initialize().await;

        assert_eq!(controller.select_category(Category::Mystery).await, SearchOutcome::Loaded { count: 1 });
        assert_eq!(controller.submit_search().await, SearchOutcome::Loaded { count: 1 });
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 2);
        assert_eq!(catalog.last_filter.lock().unwrap().as_deref(), Some("subject:mystery"));
    }

    #[tokio::test]
    async fn test_failed_search_degrades_to_empty_list() {
        let controller = controller_with(Arc::new(FailingCatalog), Arc::new(MemoryStore::new()), LibraryConfig::default());
        controller.initialize().await;

        controller.set_search_term("anything").await;
        let outcome = controller.submit_search().await;
        assert_eq!(outcome, SearchOutcome::Failed(FailureKind::Network));

        let state = controller.snapshot().await;
        assert!(state.displayed_books.is_empty());
        assert!(!state.is_search_pending);
        assert_eq!(state.last_error.as_ref().unwrap().kind, FailureKind::Network);
        assert!(state.shows_no_results());
    }

    #[tokio::test]
    async fn test_toggle_favorite_persists_every_change() {
        let store = Arc::new(MemoryStore::new());
        let controller = controller_with(Arc::new(EchoCatalog::default()), store.clone(), LibraryConfig::default());
        controller.initialize().await;
        let book = featured_books().remove(2);

        assert!(controller.toggle_favorite(&book).await);
        assert!(controller.is_favorite(&book.id).await);
        assert!(!controller.toggle_favorite(&book).await);
        assert!(!controller.is_favorite(&book.id).await);
        assert_eq!(store.write_count(), 2);
        assert_eq!(store.raw("bookFavourites").as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_store_failures_never_block() {
        let store = Arc::new(MemoryStore::failing());
        let controller = controller_with(Arc::new(EchoCatalog::default()), store, LibraryConfig::default());

        controller.initialize().await;
        let book = featured_books().remove(0);
        assert!(controller.toggle_favorite(&book).await);
        assert_eq!(controller.toggle_display_mode().await, DisplayMode::Dark);

        let state = controller.snapshot().await;
        assert_eq!(state.favorites.len(), 1);
        assert_eq!(state.display_mode, DisplayMode::Dark);
    }

    #[tokio::test]
    async fn test_events_are_broadcast() {
        let controller = controller_with(Arc::new(EchoCatalog::default()), Arc::new(MemoryStore::new()), LibraryConfig::default());
        let mut events = controller.subscribe();

        controller.initialize().await;
        controller.set_display_mode(DisplayMode::Dark).await;

        assert_eq!(events.recv().await.unwrap(), LibraryEvent::BooksChanged);
        assert_eq!(
            events.recv().await.unwrap(),
            LibraryEvent::DisplayModeChanged(DisplayMode::Dark)
        );
    }
}
