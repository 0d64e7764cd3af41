//! SQLite storage implementation
//!
//! Provides the SQLite-backed implementation of the [`Storage`] trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::UrlRecord;
use crate::SnapError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (or creates) the database at the given path
    pub fn new(path: &Path) -> Result<Self, SnapError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, SnapError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl Storage for SqliteStorage {
    fn store_urls(&mut self, urls: &[String]) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let mut stmt = self.conn.prepare(
            "INSERT OR IGNORE INTO sitemap_urls (url, discovered_at) VALUES (?1, ?2)",
        )?;

        for url in urls {
            let inserted = stmt.execute(params![url, now])?;
            if inserted == 0 {
                tracing::debug!("Duplicate URL ignored: {}", url);
            }
        }

        Ok(())
    }

    fn get_all_urls(&self) -> StorageResult<Vec<UrlRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, url, discovered_at FROM sitemap_urls ORDER BY id")?;

        let rows = stmt.query_map([], |row| {
            Ok(UrlRecord {
                id: row.get(0)?,
                url: row.get(1)?,
                discovered_at: row.get(2)?,
            })
        })?;

        let mut urls = Vec::new();
        for row in rows {
            urls.push(row?);
        }
        Ok(urls)
    }

    fn get_url(&self, id: i64) -> StorageResult<Option<UrlRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT id, url, discovered_at FROM sitemap_urls WHERE id = ?1",
                params![id],
                |row| {
                    Ok(UrlRecord {
                        id: row.get(0)?,
                        url: row.get(1)?,
                        discovered_at: row.get(2)?,
                    })
                },
            )
            .optional()?;

        Ok(record)
    }

    fn update_url(&mut self, id: i64, new_url: &str) -> StorageResult<()> {
        let changed = self.conn.execute(
            "UPDATE sitemap_urls SET url = ?1 WHERE id = ?2",
            params![new_url, id],
        )?;

        if changed == 0 {
            return Err(StorageError::UrlNotFound(id));
        }
        Ok(())
    }

    fn delete_url(&mut self, id: i64) -> StorageResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM sitemap_urls WHERE id = ?1", params![id])?;

        if changed == 0 {
            return Err(StorageError::UrlNotFound(id));
        }
        Ok(())
    }

    fn get_stat(&self, key: &str) -> StorageResult<Option<f64>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM stats WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        Ok(value)
    }

    fn set_stat(&mut self, key: &str, value: f64) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO stats (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now],
        )?;
        Ok(())
    }
}
