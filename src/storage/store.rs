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


//! String key/value persistence
//!
//! Values are opaque strings (JSON in practice). Implementations:
//! - [`SqliteStore`]: `Preferences` table in the app database
//! - [`MemoryStore`]: process-local map, optionally failing every call

use crate::error::{LibraryError, Result};
use crate::storage::database::Database;
use async_trait::async_trait;
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Local persistent key/value storage
#[async_trait]
pub trait PersistentStore: Send + Sync {
    /// Read a value; `Ok(None)` when the key was never written
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or replace a value
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// SQLite-backed store
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    /// Remove a key; used to reset preferences
    pub async fn delete(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM Preferences WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl PersistentStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM Preferences WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO Preferences (key, value) VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// In-process store
///
/// `failing()` builds a store whose every call errors, standing in for an
/// unavailable backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    unavailable: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with raw values
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = values
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            values: Mutex::new(map),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        let store = Self::default();
        store.set_unavailable(true);
        store
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of successful `set` calls
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Raw value without going through the trait
    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(LibraryError::storage("store is unavailable"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PersistentStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.check_available()?;
        let values = self
            .values
            .lock()
            .map_err(|_| LibraryError::storage("store lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check_available()?;
        self.values
            .lock()
            .map_err(|_| LibraryError::storage("store lock poisoned"))?
            .insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sqlite_store_roundtrip_and_overwrite() {
        let db = Database::new_in_memory().await.unwrap();
        let store = SqliteStore::new(&db);

        assert_eq!(store.get("darkMode").await.unwrap(), None);

        store.set("darkMode", "false").await.unwrap();
        store.set("darkMode", "true").await.unwrap();
        assert_eq!(store.get("darkMode").await.unwrap().as_deref(), Some("true"));

        store.delete("darkMode").await.unwrap();
        assert_eq!(store.get("darkMode").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_store_counts_writes() {
        let store = MemoryStore::new();
        store.set("a", "1").await.unwrap();
        store.set("a", "2").await.unwrap();
        assert_eq!(store.write_count(), 2);
        assert_eq!(store.raw("a").as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_failing_memory_store() {
        let store = MemoryStore::failing();
        assert!(store.get("a").await.unwrap_err().is_storage_error());
        assert!(store.set("a", "1").await.is_err());
        assert_eq!(store.write_count(), 0);

        store.set_unavailable(false);
        store.set("a", "1").await.unwrap();
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("1"));
    }
}
