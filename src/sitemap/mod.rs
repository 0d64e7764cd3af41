//! Sitemap resolution
//!
//! Fetches a sitemap XML document and flattens it into an ordered list of
//! page URLs, optionally filtered by directory path prefixes. Also supports
//! discovering the unique top-level directories a sitemap covers.

use crate::{Result, SnapError};
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::Client;
use std::collections::BTreeSet;
use url::Url;

/// Fetches and parses a sitemap, returning the listed URLs in document order
///
/// A transport-level failure (timeout, non-2xx status) or an XML parse
/// failure is fatal and propagates to the caller; it is not retried.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `sitemap_url` - The URL of the sitemap document
/// * `directories` - Optional path prefixes (e.g. `/blog/`) to filter by.
///   Each is normalized to start and end with `/`; a URL passes if its path
///   starts with any normalized prefix. `None` or an empty list returns all
///   URLs unfiltered.
pub async fn resolve(
    client: &Client,
    sitemap_url: &str,
    directories: Option<&[String]>,
) -> Result<Vec<String>> {
    let response = client
        .get(sitemap_url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|source| SnapError::Http {
            url: sitemap_url.to_string(),
            source,
        })?;

    let body = response.text().await.map_err(|source| SnapError::Http {
        url: sitemap_url.to_string(),
        source,
    })?;

    let urls = parse_urlset(&body)?;

    match directories {
        Some(dirs) if !dirs.is_empty() => Ok(filter_by_directories(urls, dirs)),
        _ => Ok(urls),
    }
}

/// Discovers the unique top-level directories across all sitemap URLs
///
/// Returns `/segment/`-formatted strings, sorted and deduplicated, or `None`
/// if the sitemap cannot be fetched or parsed (the failure is logged, not
/// raised).
pub async fn discover_directories(client: &Client, sitemap_url: &str) -> Option<Vec<String>> {
    match resolve(client, sitemap_url, None).await {
        Ok(urls) => Some(top_level_directories(&urls)),
        Err(e) => {
            tracing::error!("Failed to list directories for {}: {}", sitemap_url, e);
            None
        }
    }
}

/// Extracts the text of every `<url><loc>` element from sitemap XML
///
/// The sitemaps.org default namespace is handled by matching on local
/// element names. Empty or missing `<loc>` values are skipped; document
/// order is preserved.
pub fn parse_urlset(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut urls = Vec::new();
    let mut in_url = false;
    let mut in_loc = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"url" => in_url = true,
                b"loc" if in_url => in_loc = true,
                _ => {}
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"url" => in_url = false,
                b"loc" => in_loc = false,
                _ => {}
            },
            Ok(Event::Text(t)) if in_loc => {
                let loc = t
                    .unescape()
                    .map_err(|e| SnapError::SitemapParse(e.to_string()))?;
                let loc = loc.trim();
                if !loc.is_empty() {
                    urls.push(loc.to_string());
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(SnapError::SitemapParse(e.to_string())),
            _ => {}
        }
    }

    Ok(urls)
}

/// Filters URLs to those whose path starts with any normalized directory
///
/// Order is preserved and no duplicates are introduced: a URL matching
/// several filters appears once. URLs that fail to parse are excluded.
fn filter_by_directories(urls: Vec<String>, directories: &[String]) -> Vec<String> {
    let normalized: Vec<String> = directories.iter().map(|d| normalize_directory(d)).collect();

    urls.into_iter()
        .filter(|u| match Url::parse(u) {
            Ok(parsed) => normalized.iter().any(|d| parsed.path().starts_with(d.as_str())),
            Err(_) => false,
        })
        .collect()
}

/// Normalizes a directory filter to start and end with `/`
fn normalize_directory(dir: &str) -> String {
    let mut d = dir.to_string();
    if !d.starts_with('/') {
        d.insert(0, '/');
    }
    if !d.ends_with('/') {
        d.push('/');
    }
    d
}

/// Collects the unique first path segments of the given URLs as `/segment/`
fn top_level_directories(urls: &[String]) -> Vec<String> {
    let mut segments = BTreeSet::new();

    for url in urls {
        if let Ok(parsed) = Url::parse(url) {
            if let Some(segment) = parsed.path().split('/').find(|s| !s.is_empty()) {
                segments.insert(format!("/{}/", segment));
            }
        }
    }

    segments.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_SITEMAP: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
    <url>
        <loc>https://example.com/</loc>
        <lastmod>2023-10-10</lastmod>
        <priority>1.0</priority>
    </url>
    <url>
        <loc>https://example.com/blog/first-post</loc>
        <lastmod>2023-10-12</lastmod>
    </url>
    <url>
        <loc>https://example.com/about/team</loc>
    </url>
</urlset>"#;

    #[test]
    fn test_parse_urlset_preserves_order() {
        let urls = parse_urlset(SAMPLE_SITEMAP).unwrap();
        assert_eq!(
            urls,
            vec![
                "https://example.com/",
                "https://example.com/blog/first-post",
                "https://example.com/about/team",
            ]
        );
    }

    #[test]
    fn test_parse_urlset_skips_empty_loc() {
        let xml = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
            <url><loc></loc></url>
            <url><loc>https://example.com/kept</loc></url>
        </urlset>"#;
        let urls = parse_urlset(xml).unwrap();
        assert_eq!(urls, vec!["https://example.com/kept"]);
    }

    #[test]
    fn test_parse_urlset_ignores_loc_outside_url() {
        // A sitemap index nests <loc> inside <sitemap>, not <url>
        let xml = r#"<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
            <sitemap><loc>https://example.com/sitemap-posts.xml</loc></sitemap>
        </sitemapindex>"#;
        let urls = parse_urlset(xml).unwrap();
        assert!(urls.is_empty());
    }

    #[test]
    fn test_parse_urlset_unescapes_entities() {
        let xml = r#"<urlset><url><loc>https://example.com/a?b=1&amp;c=2</loc></url></urlset>"#;
        let urls = parse_urlset(xml).unwrap();
        assert_eq!(urls, vec!["https://example.com/a?b=1&c=2"]);
    }

    #[test]
    fn test_parse_urlset_rejects_malformed_xml() {
        let result = parse_urlset("<urlset><url><loc>https://example.com</url>");
        assert!(result.is_err());
    }

    #[test]
    fn test_filter_by_directories() {
        let urls = vec![
            "https://example.com/".to_string(),
            "https://example.com/blog/a".to_string(),
            "https://example.com/about/team".to_string(),
            "https://example.com/blog/b".to_string(),
        ];

        let filtered = filter_by_directories(urls, &["/blog/".to_string()]);
        assert_eq!(
            filtered,
            vec!["https://example.com/blog/a", "https://example.com/blog/b"]
        );
    }

    #[test]
    fn test_filter_normalizes_missing_slashes() {
        let urls = vec![
            "https://example.com/blog/a".to_string(),
            "https://example.com/other/b".to_string(),
        ];

        // "blog" should behave identically to "/blog/"
        let filtered = filter_by_directories(urls, &["blog".to_string()]);
        assert_eq!(filtered, vec!["https://example.com/blog/a"]);
    }

    #[test]
    fn test_filter_multiple_matches_appear_once() {
        let urls = vec!["https://example.com/blog/a".to_string()];

        // URL path matches both filters; it must not be duplicated
        let filtered =
            filter_by_directories(urls, &["/blog/".to_string(), "blog".to_string()]);
        assert_eq!(filtered, vec!["https://example.com/blog/a"]);
    }

    #[test]
    fn test_filter_prefix_is_path_scoped() {
        // "/blog/" must match the path, not a substring elsewhere in the URL
        let urls = vec!["https://example.com/archive?section=/blog/".to_string()];
        let filtered = filter_by_directories(urls, &["/blog/".to_string()]);
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_top_level_directories_sorted_and_deduplicated() {
        let urls = vec![
            "https://example.com/blog/a".to_string(),
            "https://example.com/about/team".to_string(),
            "https://example.com/blog/b".to_string(),
            "https://example.com/".to_string(),
        ];

        let dirs = top_level_directories(&urls);
        assert_eq!(dirs, vec!["/about/", "/blog/"]);
    }
}
