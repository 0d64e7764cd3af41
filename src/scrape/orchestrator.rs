//! The sequential fetch loop
//!
//! Per iteration: rate-limit wait, request, title extraction, output path
//! derivation, render and clean, then on batch completion a statistics
//! update. Failures are isolated per URL in batch flows; the single-page
//! flow aborts loudly instead.

use crate::cleaner::ContentCleaner;
use crate::naming::{sanitize, url_to_slug, SanitizationMode};
use crate::pdf::PdfRenderer;
use crate::scrape::client::{build_http_client, fetch_document};
use crate::scrape::RATE_LIMIT;
use crate::sitemap;
use crate::storage::{set_average_request_time, Storage};
use crate::{Result, SnapError};
use reqwest::Client;
use scraper::{Html, Selector};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Drives the fetch pipeline against a storage backend and a PDF renderer
pub struct Scraper<S, R> {
    client: Client,
    storage: S,
    renderer: R,
    cleaner: ContentCleaner,
    pages_dir: PathBuf,
}

impl<S: Storage, R: PdfRenderer> Scraper<S, R> {
    pub fn new(
        storage: S,
        renderer: R,
        cleaner: ContentCleaner,
        pages_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        Ok(Self {
            client: build_http_client()?,
            storage,
            renderer,
            cleaner,
            pages_dir: pages_dir.into(),
        })
    }

    /// Consumes the scraper, returning its storage backend
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Resolves the sitemap, stores the URLs, and logs them
    pub async fn list_pages(
        &mut self,
        sitemap_url: &str,
        directories: Option<&[String]>,
    ) -> Result<Vec<String>> {
        tracing::info!("Scraping sitemap at: {}", sitemap_url);

        let urls = sitemap::resolve(&self.client, sitemap_url, directories).await?;
        tracing::info!("Found {} URLs.", urls.len());

        self.storage.store_urls(&urls)?;

        for url in &urls {
            tracing::info!("URL: {}", url);
        }

        Ok(urls)
    }

    /// Fetches every sitemap page, saving a PDF snapshot and cleaned text
    ///
    /// Strictly sequential: at most one request in flight, with at least
    /// [`RATE_LIMIT`] between the completion of one request and the start of
    /// the next. A failing URL is logged and skipped; the batch always runs
    /// to completion. When at least one request succeeded, the mean request
    /// duration is written to the statistics store.
    pub async fn fetch_pages(
        &mut self,
        sitemap_url: &str,
        directories: Option<&[String]>,
        number_of_pages: Option<usize>,
    ) -> Result<()> {
        tracing::info!("Fetching pages from sitemap: {}", sitemap_url);

        let mut urls = sitemap::resolve(&self.client, sitemap_url, directories).await?;
        let total_urls = urls.len();
        tracing::info!("Found {} URLs in the sitemap.", total_urls);

        if let Some(limit) = number_of_pages {
            if limit < total_urls {
                urls.truncate(limit);
                tracing::info!("Limiting to {} pages (per user request).", urls.len());
            }
        }

        std::fs::create_dir_all(&self.pages_dir)?;

        let mut last_request_time: Option<Instant> = None;
        let mut total_request_time = Duration::ZERO;
        let mut successful_requests: u32 = 0;

        for (index, url) in urls.iter().enumerate() {
            let index = index + 1;

            rate_limit_wait(last_request_time).await;

            tracing::info!("Scraping URL #{}: {}", index, url);
            match fetch_document(&self.client, url).await {
                Ok(page) => {
                    total_request_time += page.duration;
                    successful_requests += 1;
                    tracing::debug!(
                        "Request duration for URL #{}: {:.4} seconds",
                        index,
                        page.duration.as_secs_f64()
                    );

                    last_request_time = Some(Instant::now());

                    if let Err(e) = self.save_page(index, url, &page.body) {
                        tracing::error!("Unexpected error for URL #{} ({}): {}", index, url, e);
                    }
                }
                Err(e @ SnapError::Http { .. }) => {
                    tracing::error!("Error scraping URL #{} ({}): {}", index, url, e);
                }
                Err(e) => {
                    tracing::error!("Unexpected error for URL #{} ({}): {}", index, url, e);
                }
            }
        }

        tracing::info!("fetch_pages completed.");

        if successful_requests > 0 {
            let average = total_request_time.as_secs_f64() / f64::from(successful_requests);
            set_average_request_time(&mut self.storage, average)?;
            tracing::info!("Average request time for this run: {:.4} seconds", average);
        } else {
            tracing::warn!("No successful requests to calculate average request time.");
        }

        Ok(())
    }

    /// Renders a PDF snapshot of every sitemap page, skipping text output
    ///
    /// Each page is still fetched once (rate-limited) to discover its title
    /// for the output directory name.
    pub async fn render_pdf_pages(
        &mut self,
        sitemap_url: &str,
        directories: Option<&[String]>,
        number_of_pages: Option<usize>,
    ) -> Result<()> {
        tracing::info!("Rendering PDF snapshots for: {}", sitemap_url);

        let mut urls = sitemap::resolve(&self.client, sitemap_url, directories).await?;
        let total_urls = urls.len();
        tracing::info!("Found {} URLs in the sitemap.", total_urls);

        if let Some(limit) = number_of_pages {
            if limit < total_urls {
                urls.truncate(limit);
                tracing::info!("Limiting to {} pages (per user request).", urls.len());
            }
        }

        std::fs::create_dir_all(&self.pages_dir)?;

        let mut last_request_time: Option<Instant> = None;

        for (index, url) in urls.iter().enumerate() {
            let index = index + 1;

            rate_limit_wait(last_request_time).await;

            tracing::info!("Scraping title for URL #{}: {}", index, url);
            match fetch_document(&self.client, url).await {
                Ok(page) => {
                    last_request_time = Some(Instant::now());

                    if let Err(e) = self.render_snapshot(index, url, &page.body) {
                        tracing::error!(
                            "Error generating PDF for URL #{} ({}): {}",
                            index,
                            url,
                            e
                        );
                    }
                }
                Err(e @ SnapError::Http { .. }) => {
                    tracing::error!("Network error for URL #{} ({}): {}", index, url, e);
                }
                Err(e) => {
                    tracing::error!("Error generating PDF for URL #{} ({}): {}", index, url, e);
                }
            }
        }

        tracing::info!("render_pdf_pages completed.");
        Ok(())
    }

    /// Fetches a single page identified by its 1-based sitemap position
    ///
    /// The index is validated against the resolved URL list before the page
    /// request is made; an out-of-range index is a distinct
    /// [`SnapError::InvalidPageNumber`] error. Every other failure is
    /// normalized into [`SnapError::PageProcessing`]. The observed request
    /// duration overwrites the stored average unconditionally.
    pub async fn fetch_page(
        &mut self,
        sitemap_url: &str,
        directories: Option<&[String]>,
        page_number: usize,
    ) -> Result<()> {
        tracing::info!("Fetching page #{} from sitemap: {}", page_number, sitemap_url);

        match self.fetch_page_inner(sitemap_url, directories, page_number).await {
            Ok(()) => Ok(()),
            Err(e @ SnapError::InvalidPageNumber(_)) => Err(e),
            Err(e @ SnapError::PageProcessing(_)) => Err(e),
            Err(SnapError::Http { url, source }) => Err(SnapError::PageProcessing(format!(
                "Error scraping URL #{page_number} ({url}): {source}"
            ))),
            Err(e) => Err(SnapError::PageProcessing(format!(
                "Unexpected error for URL #{page_number}: {e}"
            ))),
        }
    }

    async fn fetch_page_inner(
        &mut self,
        sitemap_url: &str,
        directories: Option<&[String]>,
        page_number: usize,
    ) -> Result<()> {
        if page_number < 1 {
            return Err(SnapError::InvalidPageNumber(format!(
                "Page number must be between 1 and the number of sitemap URLs; got {page_number}"
            )));
        }

        let urls = sitemap::resolve(&self.client, sitemap_url, directories).await?;
        let total = urls.len();

        if page_number > total {
            return Err(SnapError::InvalidPageNumber(format!(
                "Page number must be between 1 and {total}; got {page_number}"
            )));
        }

        let url = &urls[page_number - 1];

        tracing::info!("Scraping URL #{}: {}", page_number, url);
        let page = fetch_document(&self.client, url).await?;
        tracing::debug!(
            "Request duration for URL #{}: {:.4} seconds",
            page_number,
            page.duration.as_secs_f64()
        );

        // A single observation replaces the stored average outright
        set_average_request_time(&mut self.storage, page.duration.as_secs_f64())?;

        std::fs::create_dir_all(&self.pages_dir)?;

        let document = Html::parse_document(&page.body);
        let page_title = extract_title(&document).unwrap_or_else(|| url_to_slug(url));

        let output_subdir = self.pages_dir.join(subdir_name(&page_title, url));
        std::fs::create_dir_all(&output_subdir)?;

        let base_name = format!("page_{page_number:03}");
        let pdf_path = output_subdir.join(format!("{base_name}.pdf"));
        let txt_path = output_subdir.join(format!("{base_name}.txt"));

        let cleaned_page = self.cleaner.clean(&page_title, document);

        self.save_outputs(url, &pdf_path, &txt_path, &cleaned_page)
            .map_err(|e| {
                SnapError::PageProcessing(format!("Failed to save files for {base_name}: {e}"))
            })?;

        Ok(())
    }

    /// Derives the output location for a fetched page and writes both files
    ///
    /// Render/write failures are caught here and logged; the request already
    /// counted toward the batch statistics by the time this runs.
    fn save_page(&self, index: usize, url: &str, body: &str) -> Result<()> {
        let document = Html::parse_document(body);
        let page_title = extract_title(&document).unwrap_or_else(|| url_to_slug(url));

        let output_subdir = self.pages_dir.join(subdir_name(&page_title, url));
        std::fs::create_dir_all(&output_subdir)?;

        let base_name = format!("page_{index:03}");
        let pdf_path = output_subdir.join(format!("{base_name}.pdf"));
        let txt_path = output_subdir.join(format!("{base_name}.txt"));

        let cleaned_page = self.cleaner.clean(&page_title, document);

        if let Err(e) = self.save_outputs(url, &pdf_path, &txt_path, &cleaned_page) {
            tracing::error!("Failed to save files for {}: {}", base_name, e);
        }

        Ok(())
    }

    /// Renders the PDF for one page of the render-only flow
    fn render_snapshot(&self, index: usize, url: &str, body: &str) -> Result<()> {
        let document = Html::parse_document(body);
        let page_title = extract_title(&document).unwrap_or_else(|| url_to_slug(url));

        let output_subdir = self.pages_dir.join(subdir_name(&page_title, url));
        std::fs::create_dir_all(&output_subdir)?;

        let output_path = output_subdir.join(format!("page_{index:03}.pdf"));

        tracing::info!("Rendering PDF snapshot for: {}", url);
        self.renderer.render(url, &output_path)?;
        tracing::info!("Saved PDF: {}", output_path.display());

        Ok(())
    }

    /// The save step proper: PDF render plus cleaned-text write
    fn save_outputs(
        &self,
        url: &str,
        pdf_path: &Path,
        txt_path: &Path,
        cleaned_page: &str,
    ) -> Result<()> {
        self.renderer.render(url, pdf_path)?;
        tracing::info!("Saved PDF: {}", pdf_path.display());

        std::fs::write(txt_path, cleaned_page)?;
        tracing::info!("Saved TXT: {}", txt_path.display());

        Ok(())
    }
}

/// Sleeps out the remainder of the rate-limit window, if any
///
/// `last_request_time` is the completion instant of the previous successful
/// request; `None` (start of batch) never waits. The gap is therefore
/// measured from completion, not start, so effective spacing is the rate
/// limit plus the prior request's duration.
async fn rate_limit_wait(last_request_time: Option<Instant>) {
    if let Some(last) = last_request_time {
        let elapsed = last.elapsed();
        if elapsed < RATE_LIMIT {
            let sleep_time = RATE_LIMIT - elapsed;
            tracing::info!(
                "Sleeping {:.2}s before the next request ...",
                sleep_time.as_secs_f64()
            );
            tokio::time::sleep(sleep_time).await;
        }
    }
}

/// Extracts the trimmed `<title>` text, if any
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Output subdirectory for a page: sanitized title, else URL slug
fn subdir_name(page_title: &str, url: &str) -> String {
    let safe = sanitize(page_title, SanitizationMode::StorageKey);
    if safe.is_empty() {
        url_to_slug(url)
    } else {
        safe
    }
}
