//! Storage traits and error types
//!
//! Defines the trait interface for storage backends and associated error
//! types.

use crate::storage::UrlRecord;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("URL not found: id {0}")]
    UrlNotFound(i64),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Covers the two persisted concerns of the scraper: the set of known
/// sitemap URLs and a small table of named running statistics.
pub trait Storage {
    // ===== URL Management =====

    /// Stores a batch of URLs, ignoring duplicates
    ///
    /// Insertion is idempotent per URL: storing the same URL twice leaves
    /// exactly one row. Duplicates are logged at debug level.
    fn store_urls(&mut self, urls: &[String]) -> StorageResult<()>;

    /// Returns all stored URLs in insertion order
    fn get_all_urls(&self) -> StorageResult<Vec<UrlRecord>>;

    /// Gets a single URL by its row id
    fn get_url(&self, id: i64) -> StorageResult<Option<UrlRecord>>;

    /// Replaces the URL text of an existing row
    ///
    /// Returns [`StorageError::UrlNotFound`] when the id does not exist.
    fn update_url(&mut self, id: i64, new_url: &str) -> StorageResult<()>;

    /// Deletes a URL by its row id
    ///
    /// Returns [`StorageError::UrlNotFound`] when the id does not exist.
    fn delete_url(&mut self, id: i64) -> StorageResult<()>;

    // ===== Statistics =====

    /// Reads a named statistic; `None` when the key has never been written
    fn get_stat(&self, key: &str) -> StorageResult<Option<f64>>;

    /// Writes a named statistic, overwriting any prior value (upsert)
    ///
    /// Write failures propagate to the caller; they indicate a programming
    /// or schema error rather than a transient condition.
    fn set_stat(&mut self, key: &str, value: f64) -> StorageResult<()>;
}
