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


//! Library domain: books, categories, display preferences and the controller
//! that owns them.
//!
//! # Usage Example
//! ```no_run
//! use bookshelf_core::api::GoogleBooksClient;
//! use bookshelf_core::library::{Category, LibraryConfig, LibraryController};
//! use bookshelf_core::storage::{Database, SqliteStore};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::new("./bookshelf.db").await?;
//! let controller = LibraryController::new(
//!     Arc::new(GoogleBooksClient::new()?),
//!     Arc::new(SqliteStore::new(&db)),
//!     LibraryConfig::default(),
//! );
//!
//! controller.initialize().await;
//! controller.set_search_term("dune").await;
//! controller.select_category(Category::SciFi).await;
//! for book in controller.displayed_books().await {
//!     println!("{} by {}", book.title, book.authors_display());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod controller;
pub mod featured;
pub mod models;
pub mod state;

// Re-export commonly used types
pub use config::{CategoryStrategy, FeaturedSource, LibraryConfig, LibraryConfigBuilder};
pub use controller::{LibraryController, LibraryEvent, SearchOutcome};
pub use featured::{featured_books, filter_by_category};
pub use models::{Book, Category, ColorTheme, DisplayMode, Page};
pub use state::{LastError, LibraryState};
