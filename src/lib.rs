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


//! Bookshelf core
//!
//! Book search against a remote catalog, a persisted favorites list and
//! display preferences, coordinated by [`library::LibraryController`].
//!
//! - [`api`]: catalog trait and the Google Books HTTP client
//! - [`library`]: domain model, state and controller
//! - [`storage`]: SQLite-backed key/value preferences
//! - [`error`]: crate error type

pub mod api;
pub mod error;
pub mod library;
pub mod storage;

pub use error::{LibraryError, Result};
pub use library::{Book, Category, LibraryController};
