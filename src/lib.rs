//! Sitesnap: a rate-limited sitemap snapshot scraper
//!
//! This crate crawls the pages listed in a sitemap, fetching each one under a
//! fixed rate limit, cleaning its textual content, rendering a PDF snapshot,
//! and persisting bookkeeping state (known URLs, average request latency).

pub mod cleaner;
pub mod config;
pub mod estimate;
pub mod naming;
pub mod organize;
pub mod pdf;
pub mod scrape;
pub mod sitemap;
pub mod storage;
pub mod verify;

use thiserror::Error;

/// Main error type for sitesnap operations
#[derive(Debug, Error)]
pub enum SnapError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Sitemap parse error: {0}")]
    SitemapParse(String),

    #[error("Invalid page number: {0}")]
    InvalidPageNumber(String),

    #[error("Page processing failed: {0}")]
    PageProcessing(String),

    #[error("PDF render error: {0}")]
    Render(#[from] pdf::RenderError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for sitesnap operations
pub type Result<T> = std::result::Result<T, SnapError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use cleaner::ContentCleaner;
pub use config::Config;
pub use naming::{sanitize, url_to_slug, SanitizationMode};
pub use scrape::Scraper;
pub use verify::VerificationSummary;
