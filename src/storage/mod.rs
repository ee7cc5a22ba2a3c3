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


//! Local persistence
//!
//! Preferences live in a single SQLite key/value table behind the
//! [`PersistentStore`] trait so the controller can be tested with an
//! in-memory map.
//!
//! # Usage Example
//! ```no_run
//! use bookshelf_core::storage::{Database, PersistentStore, SqliteStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::new("./bookshelf.db").await?;
//! let store = SqliteStore::new(&db);
//!
//! store.set("darkMode", "true").await?;
//! let dark = store.get("darkMode").await?;
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod migrations;
pub mod preferences;
pub mod store;

// Re-export commonly used types
pub use database::Database;
pub use preferences::{load_preferences, Preferences, StorageKeys};
pub use store::{MemoryStore, PersistentStore, SqliteStore};
