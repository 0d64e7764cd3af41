//! Sitesnap main entry point
//!
//! Command-line interface for the sitesnap sitemap snapshot scraper.

use anyhow::Context;
use clap::{Parser, Subcommand};
use sitesnap::cleaner::ContentCleaner;
use sitesnap::config::{load_config, Config};
use sitesnap::estimate::estimate_time;
use sitesnap::organize::{merge_text_files, rename_and_organize_files};
use sitesnap::pdf::WkhtmltopdfRenderer;
use sitesnap::scrape::{build_http_client, Scraper};
use sitesnap::sitemap::discover_directories;
use sitesnap::storage::{SqliteStorage, Storage};
use sitesnap::verify::verify_pages;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Sitesnap: a rate-limited sitemap snapshot scraper
///
/// Sitesnap fetches the pages listed in a sitemap one at a time under a
/// fixed rate limit, saving a PDF snapshot and cleaned text for each, and
/// keeps bookkeeping state in a local SQLite database.
#[derive(Parser, Debug)]
#[command(name = "sitesnap")]
#[command(version)]
#[command(about = "A rate-limited sitemap snapshot scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(long, global = true, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sitemap crawling and snapshot operations
    #[command(subcommand)]
    Scraper(ScraperCommand),

    /// Stored URL administration
    #[command(subcommand)]
    Database(DatabaseCommand),

    /// Post-fetch text organization
    #[command(subcommand)]
    Cleaning(CleaningCommand),
}

#[derive(Subcommand, Debug)]
enum ScraperCommand {
    /// List the unique top-level directories in the sitemap
    ListDirectories {
        #[arg(long)]
        sitemap_url: Option<String>,
    },

    /// List sitemap pages and store them in the database
    ListPages {
        #[arg(long)]
        sitemap_url: Option<String>,
        /// Restrict to a single directory filter (e.g. /blog/)
        #[arg(long)]
        directory: Option<String>,
    },

    /// Estimate how long a full fetch would take
    EstimateTime {
        #[arg(long)]
        sitemap_url: Option<String>,
        #[arg(long)]
        directory: Option<String>,
    },

    /// Fetch a single page by its 1-based sitemap position
    FetchPage {
        #[arg(long)]
        page_number: usize,
        #[arg(long)]
        sitemap_url: Option<String>,
        #[arg(long)]
        directory: Option<String>,
    },

    /// Fetch all sitemap pages (PDF snapshot + cleaned text)
    FetchPages {
        #[arg(long)]
        sitemap_url: Option<String>,
        #[arg(long)]
        directory: Option<String>,
        /// Process only the first N pages
        #[arg(long)]
        number_of_pages: Option<usize>,
    },

    /// Render PDF snapshots only (no text output)
    RenderPdf {
        #[arg(long)]
        sitemap_url: Option<String>,
        #[arg(long)]
        directory: Option<String>,
        #[arg(long)]
        number_of_pages: Option<usize>,
    },

    /// Verify saved artifacts (valid PDFs, non-trivial text)
    Verify {
        #[arg(long)]
        pages_dir: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum DatabaseCommand {
    /// Print all stored URLs
    ShowUrls,

    /// Replace the URL text of a stored row
    UpdateUrl {
        #[arg(long)]
        url_id: i64,
        #[arg(long)]
        new_url: String,
    },

    /// Delete a stored URL by id
    DeleteUrl {
        #[arg(long)]
        url_id: i64,
    },
}

#[derive(Subcommand, Debug)]
enum CleaningCommand {
    /// Copy page text files into a flat directory named by page title
    RenameFiles {
        #[arg(long)]
        pages_dir: Option<PathBuf>,
        #[arg(long, default_value = "cleaned_pages")]
        output_dir: String,
    },

    /// Merge all page text files into one file with per-page headers
    MergeFiles {
        #[arg(long)]
        pages_dir: Option<PathBuf>,
        #[arg(long, default_value = "merged_content.txt")]
        output_filename: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path).context("failed to load configuration")?
        }
        None => Config::default(),
    };

    tokio::select! {
        result = run(cli.command, config) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Ctrl-C detected! Exiting gracefully.");
            Ok(())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitesnap=info,warn"),
            1 => EnvFilter::new("sitesnap=debug,info"),
            2 => EnvFilter::new("sitesnap=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

async fn run(command: Command, config: Config) -> anyhow::Result<()> {
    match command {
        Command::Scraper(cmd) => run_scraper(cmd, config).await,
        Command::Database(cmd) => run_database(cmd, config),
        Command::Cleaning(cmd) => run_cleaning(cmd, config),
    }
}

/// Resolves the sitemap URL and directory filters from flags and config
fn resolve_target(
    config: &Config,
    sitemap_url: Option<String>,
    directory: Option<String>,
) -> (String, Vec<String>) {
    let url = sitemap_url.unwrap_or_else(|| config.scraper.sitemap_url.clone());
    let directories = match directory {
        Some(d) => vec![d],
        None => config.scraper.directories.clone(),
    };
    (url, directories)
}

fn open_storage(config: &Config) -> anyhow::Result<SqliteStorage> {
    SqliteStorage::new(Path::new(&config.output.database_path))
        .context("failed to open database")
}

fn build_scraper(config: &Config) -> anyhow::Result<Scraper<SqliteStorage, WkhtmltopdfRenderer>> {
    let storage = open_storage(config)?;
    let cleaner = ContentCleaner::new(&config.cleaning.boilerplate_phrases)
        .context("failed to build content cleaner")?;

    Scraper::new(
        storage,
        WkhtmltopdfRenderer::default(),
        cleaner,
        &config.scraper.pages_dir,
    )
    .context("failed to build scraper")
}

async fn run_scraper(command: ScraperCommand, config: Config) -> anyhow::Result<()> {
    match command {
        ScraperCommand::ListDirectories { sitemap_url } => {
            let url = sitemap_url.unwrap_or_else(|| config.scraper.sitemap_url.clone());
            let client = build_http_client()?;

            match discover_directories(&client, &url).await {
                Some(directories) => {
                    tracing::info!("Found {} directories:", directories.len());
                    for dir in directories {
                        tracing::info!("{}", dir);
                    }
                }
                None => tracing::error!("Could not list directories for {}", url),
            }
        }

        ScraperCommand::ListPages {
            sitemap_url,
            directory,
        } => {
            let (url, directories) = resolve_target(&config, sitemap_url, directory);
            let mut scraper = build_scraper(&config)?;
            scraper.list_pages(&url, Some(&directories)).await?;
        }

        ScraperCommand::EstimateTime {
            sitemap_url,
            directory,
        } => {
            let (url, directories) = resolve_target(&config, sitemap_url, directory);
            let client = build_http_client()?;
            let storage = open_storage(&config)?;
            estimate_time(&client, &storage, &url, Some(&directories)).await?;
        }

        ScraperCommand::FetchPage {
            page_number,
            sitemap_url,
            directory,
        } => {
            let (url, directories) = resolve_target(&config, sitemap_url, directory);
            let mut scraper = build_scraper(&config)?;
            scraper
                .fetch_page(&url, Some(&directories), page_number)
                .await?;
        }

        ScraperCommand::FetchPages {
            sitemap_url,
            directory,
            number_of_pages,
        } => {
            let (url, directories) = resolve_target(&config, sitemap_url, directory);
            let mut scraper = build_scraper(&config)?;
            scraper
                .fetch_pages(&url, Some(&directories), number_of_pages)
                .await?;
        }

        ScraperCommand::RenderPdf {
            sitemap_url,
            directory,
            number_of_pages,
        } => {
            let (url, directories) = resolve_target(&config, sitemap_url, directory);
            let mut scraper = build_scraper(&config)?;
            scraper
                .render_pdf_pages(&url, Some(&directories), number_of_pages)
                .await?;
        }

        ScraperCommand::Verify { pages_dir } => {
            let dir =
                pages_dir.unwrap_or_else(|| PathBuf::from(&config.scraper.pages_dir));
            let _ = verify_pages(&dir);
        }
    }

    Ok(())
}

fn run_database(command: DatabaseCommand, config: Config) -> anyhow::Result<()> {
    let mut storage = open_storage(&config)?;

    match command {
        DatabaseCommand::ShowUrls => {
            let urls = storage.get_all_urls()?;
            tracing::info!("Total URLs stored: {}", urls.len());
            for record in urls {
                tracing::info!("[{}] {}", record.id, record.url);
            }
        }

        DatabaseCommand::UpdateUrl { url_id, new_url } => {
            storage.update_url(url_id, &new_url)?;
            tracing::info!("Updated URL [ID={}] => {}", url_id, new_url);
        }

        DatabaseCommand::DeleteUrl { url_id } => {
            storage.delete_url(url_id)?;
            tracing::info!("Deleted URL [ID={}]", url_id);
        }
    }

    Ok(())
}

fn run_cleaning(command: CleaningCommand, config: Config) -> anyhow::Result<()> {
    match command {
        CleaningCommand::RenameFiles {
            pages_dir,
            output_dir,
        } => {
            let dir = pages_dir.unwrap_or_else(|| PathBuf::from(&config.scraper.pages_dir));
            rename_and_organize_files(&dir, &output_dir)?;
        }

        CleaningCommand::MergeFiles {
            pages_dir,
            output_filename,
        } => {
            let dir = pages_dir.unwrap_or_else(|| PathBuf::from(&config.scraper.pages_dir));
            merge_text_files(&dir, &output_filename)?;
        }
    }

    Ok(())
}
