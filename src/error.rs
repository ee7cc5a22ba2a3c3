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


//! Error types for Bookshelf
//!
//! This module defines error types using thiserror for ergonomic error handling.
//! Errors are categorized by domain (catalog, storage, configuration) so the
//! controller can decide which failures become a user-facing message and which
//! are silently replaced by defaults.
//!
//! ## Failure classes
//!
//! - Transport failures (DNS, connect, timeout) → `NetworkError`
//! - Non-2xx catalog responses → `ApiRequestFailed`
//! - Bodies that do not parse as a volumes payload → `InvalidApiResponse`
//! - Preference store read/write problems → `StorageError`, `SqlxError`
//!
//! The first three are reported through [`FailureKind`]; storage problems never
//! reach the presentation layer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using our LibraryError type
pub type Result<T> = std::result::Result<T, LibraryError>;

/// Main error type for Bookshelf
#[derive(Error, Debug)]
pub enum LibraryError {
    // ===== Catalog Errors =====

    /// Network connectivity error (connect, DNS, timeout, body read)
    #[error("Network error: {message}")]
    NetworkError {
        message: String,
        /// Whether this error might be transient
        is_transient: bool,
    },

    /// Catalog answered with a non-success status
    #[error("API request failed: {message}")]
    ApiRequestFailed {
        message: String,
        /// HTTP status code if available
        status_code: Option<u16>,
        /// Endpoint that failed
        endpoint: Option<String>,
    },

    /// Catalog returned invalid or unexpected response format
    #[error("Invalid API response: {message}")]
    InvalidApiResponse {
        message: String,
        /// Response body snippet for debugging
        response_body: Option<String>,
    },

    // ===== Storage Errors =====

    /// Preference store could not be read or written
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Stored value exists but cannot be decoded
    #[error("Corrupt stored value for key '{key}': {message}")]
    CorruptStoredValue { key: String, message: String },

    /// Database schema migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    // ===== Configuration/Input Errors =====

    /// Configuration is invalid or incomplete
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Generic input validation error
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ===== External Library Errors =====

    /// HTTP client error from reqwest
    #[error("HTTP client error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON serialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    /// Database driver error from sqlx
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Malformed URL in configuration
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),
}

/// Failure class of a catalog fetch, as surfaced to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    /// Request never produced a response
    Network,
    /// Response status outside 2xx
    HttpStatus,
    /// Response body could not be decoded
    MalformedPayload,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::HttpStatus => "http_status",
            Self::MalformedPayload => "malformed_payload",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Helper methods for creating common errors
impl LibraryError {
    /// Create a NetworkError
    pub fn network_error<S: Into<String>>(message: S, is_transient: bool) -> Self {
        LibraryError::NetworkError {
            message: message.into(),
            is_transient,
        }
    }

    /// Create an ApiRequestFailed error
    pub fn api_failed<S: Into<String>>(
        message: S,
        status_code: Option<u16>,
        endpoint: Option<String>,
    ) -> Self {
        LibraryError::ApiRequestFailed {
            message: message.into(),
            status_code,
            endpoint,
        }
    }

    /// Create an InvalidApiResponse error
    pub fn invalid_response<S: Into<String>>(message: S, response_body: Option<String>) -> Self {
        LibraryError::InvalidApiResponse {
            message: message.into(),
            response_body,
        }
    }

    /// Create a StorageError with a message
    pub fn storage<S: Into<String>>(message: S) -> Self {
        LibraryError::StorageError(message.into())
    }

    /// Create an InvalidInput error with a message
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        LibraryError::InvalidInput(message.into())
    }

    /// Classify a catalog failure
    ///
    /// Returns `None` for errors that are not produced by a catalog fetch
    /// (storage, configuration, internal).
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            LibraryError::NetworkError { .. } => Some(FailureKind::Network),
            LibraryError::ApiRequestFailed { .. } => Some(FailureKind::HttpStatus),
            LibraryError::InvalidApiResponse { .. } | LibraryError::SerdeJsonError(_) => {
                Some(FailureKind::MalformedPayload)
            }
            LibraryError::ReqwestError(e) if e.is_decode() => Some(FailureKind::MalformedPayload),
            LibraryError::ReqwestError(e) if e.is_status() => Some(FailureKind::HttpStatus),
            LibraryError::ReqwestError(_) => Some(FailureKind::Network),
            _ => None,
        }
    }

    /// Check if error is retryable (transient network errors, 5xx)
    ///
    /// Nothing in this crate retries automatically; the flag is exposed so a
    /// presentation layer can offer a "try again" affordance.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LibraryError::NetworkError { is_transient: true, .. }
                | LibraryError::ApiRequestFailed { status_code: Some(500..=599), .. }
        )
    }

    /// Check if error is related to the preference store
    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            LibraryError::StorageError(_)
                | LibraryError::CorruptStoredValue { .. }
                | LibraryError::MigrationFailed(_)
                | LibraryError::SqlxError(_)
                | LibraryError::IoError(_)
        )
    }

    /// Get user-friendly error message suitable for display
    pub fn user_message(&self) -> String {
        match self.failure_kind() {
            Some(FailureKind::Network) => {
                "Could not reach the book catalog. Check your connection and try again.".to_string()
            }
            Some(FailureKind::HttpStatus) => match self {
                LibraryError::ApiRequestFailed { status_code: Some(429), .. } => {
                    "The book catalog is busy. Please wait a moment and try again.".to_string()
                }
                _ => "The book catalog could not answer this search.".to_string(),
            },
            Some(FailureKind::MalformedPayload) => {
                "The book catalog returned an unexpected response.".to_string()
            }
            None => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kind_classification() {
        assert_eq!(
            LibraryError::network_error("dns", true).failure_kind(),
            Some(FailureKind::Network)
        );
        assert_eq!(
            LibraryError::api_failed("boom", Some(503), None).failure_kind(),
            Some(FailureKind::HttpStatus)
        );
        assert_eq!(
            LibraryError::invalid_response("bad json", None).failure_kind(),
            Some(FailureKind::MalformedPayload)
        );
        assert_eq!(LibraryError::storage("locked").failure_kind(), None);
    }

    #[test]
    fn test_retryable() {
        assert!(LibraryError::network_error("timeout", true).is_retryable());
        assert!(!LibraryError::network_error("tls", false).is_retryable());
        assert!(LibraryError::api_failed("x", Some(502), None).is_retryable());
        assert!(!LibraryError::api_failed("x", Some(404), None).is_retryable());
    }

    #[test]
    fn test_storage_errors() {
        let err = LibraryError::CorruptStoredValue {
            key: "darkMode".to_string(),
            message: "expected bool".to_string(),
        };
        assert!(err.is_storage_error());
        assert!(err.to_string().contains("darkMode"));
        assert!(!LibraryError::network_error("x", true).is_storage_error());
    }

    #[test]
    fn test_user_message_rate_limited() {
        let err = LibraryError::api_failed("slow down", Some(429), None);
        assert!(err.user_message().contains("busy"));
    }
}
