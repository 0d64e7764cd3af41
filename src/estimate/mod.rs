//! Crawl duration estimation
//!
//! Projects how long a full fetch batch will take from the URL count, the
//! fixed rate limit, and the persisted average request time from previous
//! runs.

use crate::scrape::RATE_LIMIT;
use crate::sitemap;
use crate::storage::{get_average_request_time, Storage};
use crate::Result;
use reqwest::Client;

/// Fallback average request time when no batch has ever completed
pub const DEFAULT_AVERAGE_REQUEST_TIME: f64 = 1.0;

/// Fixed startup/teardown overhead added to the projection
pub const DEFAULT_OVERHEAD_SECONDS: f64 = 10.0;

/// A crawl duration projection with every intermediate quantity exposed
#[derive(Debug, Clone, PartialEq)]
pub struct TimeEstimate {
    pub urls_found: usize,
    /// Average observed request time (or the default), seconds
    pub average_request_time: f64,
    /// `max(rate_limit, average_request_time)`, seconds
    pub per_request_time: f64,
    /// `urls_found * per_request_time`, seconds
    pub total_requests_time: f64,
    /// `total_requests_time + overhead`, seconds
    pub total_time_seconds: f64,
}

/// Estimates the total duration of a full fetch of the given sitemap
///
/// Resolves the sitemap (no page limit applies), consults the statistics
/// store for the historical average request time, and logs every
/// intermediate quantity.
pub async fn estimate_time<S: Storage>(
    client: &Client,
    storage: &S,
    sitemap_url: &str,
    directories: Option<&[String]>,
) -> Result<TimeEstimate> {
    tracing::info!("Estimating time for sitemap at: {}", sitemap_url);

    let urls = sitemap::resolve(client, sitemap_url, directories).await?;

    let average_request_time = match get_average_request_time(storage) {
        Some(avg) => {
            tracing::info!("Average request time from DB: {:.2} seconds", avg);
            avg
        }
        None => {
            tracing::info!(
                "No average request time found in DB. Using default: {:.2} seconds",
                DEFAULT_AVERAGE_REQUEST_TIME
            );
            DEFAULT_AVERAGE_REQUEST_TIME
        }
    };

    let estimate = compute_estimate(urls.len(), average_request_time);

    tracing::info!("Number of URLs: {}", estimate.urls_found);
    tracing::info!("Rate limit: {} seconds per request", RATE_LIMIT.as_secs());
    tracing::info!(
        "Average request time: {:.2} seconds",
        estimate.average_request_time
    );
    tracing::info!(
        "Per request time (max): {:.2} seconds",
        estimate.per_request_time
    );
    tracing::info!(
        "Estimated total requests time: {}",
        format_seconds(estimate.total_requests_time)
    );
    tracing::info!(
        "Total estimated time w/ overhead: {}",
        format_seconds(estimate.total_time_seconds)
    );

    Ok(estimate)
}

/// Pure projection arithmetic
///
/// The fetch loop enforces the rate limit between requests, so the time per
/// request is the larger of the rate limit and the observed average.
pub fn compute_estimate(urls_found: usize, average_request_time: f64) -> TimeEstimate {
    let per_request_time = f64::max(RATE_LIMIT.as_secs_f64(), average_request_time);
    let total_requests_time = urls_found as f64 * per_request_time;
    let total_time_seconds = total_requests_time + DEFAULT_OVERHEAD_SECONDS;

    TimeEstimate {
        urls_found,
        average_request_time,
        per_request_time,
        total_requests_time,
        total_time_seconds,
    }
}

/// Formats a duration in seconds as days, hours, minutes, and seconds
pub fn format_seconds(seconds: f64) -> String {
    let days = (seconds / 86400.0).floor();
    let mut remainder = seconds % 86400.0;
    let hours = (remainder / 3600.0).floor();
    remainder %= 3600.0;
    let minutes = (remainder / 60.0).floor();
    let secs = remainder % 60.0;

    let mut parts = Vec::new();
    if days >= 1.0 {
        parts.push(format!(
            "{} day{}",
            days as u64,
            if days > 1.0 { "s" } else { "" }
        ));
    }
    if hours >= 1.0 {
        parts.push(format!(
            "{} hour{}",
            hours as u64,
            if hours > 1.0 { "s" } else { "" }
        ));
    }
    if minutes >= 1.0 {
        parts.push(format!(
            "{} minute{}",
            minutes as u64,
            if minutes > 1.0 { "s" } else { "" }
        ));
    }

    // Seconds are always shown
    parts.push(format!(
        "{:.2} second{}",
        secs,
        if (secs - 1.0).abs() < f64::EPSILON { "" } else { "s" }
    ));

    parts.join(", ")
}
