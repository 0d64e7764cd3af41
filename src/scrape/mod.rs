//! Fetch orchestration
//!
//! The rate-limited sequential pipeline that drives one URL at a time
//! through fetch, clean, render, and persist, isolating failures per URL
//! and updating the statistics store when a batch completes.

mod client;
mod orchestrator;

pub use client::{build_http_client, fetch_document, FetchedDocument};
pub use orchestrator::Scraper;

use std::time::Duration;

/// Minimum spacing between request completions. Fixed contract; the target
/// site blocks crawlers that go faster.
pub const RATE_LIMIT: Duration = Duration::from_secs(10);

/// Per-request timeout for every page fetch
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
