//! HTTP client construction and single-document fetching

use crate::scrape::REQUEST_TIMEOUT;
use crate::{Result, SnapError};
use reqwest::Client;
use std::time::{Duration, Instant};

/// A fetched page body with its observed request duration
#[derive(Debug)]
pub struct FetchedDocument {
    /// Raw response body
    pub body: String,

    /// Time from request start to body fully received
    pub duration: Duration,
}

/// Builds the HTTP client used for all sitemap and page requests
pub fn build_http_client() -> Result<Client> {
    let client = Client::builder()
        .user_agent(concat!("sitesnap/", env!("CARGO_PKG_VERSION")))
        .timeout(REQUEST_TIMEOUT)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Fetches one URL, returning its body and request duration
///
/// Non-2xx statuses and transport errors both surface as
/// [`SnapError::Http`]. The duration covers request start through full body
/// download, which is what the average-request-time statistic tracks.
pub async fn fetch_document(client: &Client, url: &str) -> Result<FetchedDocument> {
    let started = Instant::now();

    let response = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|source| SnapError::Http {
            url: url.to_string(),
            source,
        })?;

    let body = response.text().await.map_err(|source| SnapError::Http {
        url: url.to_string(),
        source,
    })?;

    Ok(FetchedDocument {
        body,
        duration: started.elapsed(),
    })
}
