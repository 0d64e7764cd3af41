//! Database schema definitions
//!
//! All SQL schema definitions for the sitesnap database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- URLs discovered from sitemaps
CREATE TABLE IF NOT EXISTS sitemap_urls (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL UNIQUE,
    discovered_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sitemap_urls_url ON sitemap_urls(url);

-- Named running statistics (one row per key, overwritten on update)
CREATE TABLE IF NOT EXISTS stats (
    key TEXT PRIMARY KEY,
    value REAL NOT NULL,
    updated_at TEXT NOT NULL
);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
