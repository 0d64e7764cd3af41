//! Configuration loading for sitesnap
//!
//! Configuration is optional: every field has a built-in default, so the
//! scraper runs without a config file. A TOML file can override the sitemap
//! URL, directory filters, output paths, and the boilerplate phrase list.

mod parser;
mod types;

pub use parser::load_config;
pub use types::{CleaningConfig, Config, OutputConfig, ScraperConfig};
