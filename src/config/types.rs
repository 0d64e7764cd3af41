use serde::Deserialize;

/// Main configuration structure for sitesnap
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub cleaning: CleaningConfig,
}

/// Scraper behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScraperConfig {
    /// URL of the sitemap to crawl
    #[serde(rename = "sitemap-url", default = "default_sitemap_url")]
    pub sitemap_url: String,

    /// Directory filters applied to sitemap URLs (path prefixes like "/blog/")
    #[serde(default = "default_directories")]
    pub directories: Vec<String>,

    /// Directory where per-page artifacts are written
    #[serde(rename = "pages-dir", default = "default_pages_dir")]
    pub pages_dir: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path", default = "default_database_path")]
    pub database_path: String,
}

/// Content cleaning configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CleaningConfig {
    /// Site-wide marketing/housekeeping phrases stripped from page text
    #[serde(rename = "boilerplate-phrases", default = "default_boilerplate_phrases")]
    pub boilerplate_phrases: Vec<String>,
}

fn default_sitemap_url() -> String {
    "https://productschool.com/sitemap.xml".to_string()
}

fn default_directories() -> Vec<String> {
    vec!["/blog/".to_string(), "/resources/".to_string()]
}

fn default_pages_dir() -> String {
    "pages".to_string()
}

fn default_database_path() -> String {
    "data.db".to_string()
}

fn default_boilerplate_phrases() -> Vec<String> {
    [
        "For individualsFor teamsResourcesConferencesSee upcoming start dates",
        "Subscribe to The Product Blog",
        "By sharing your email, you agree to our Privacy Policy and Terms of Service",
        "Resources you might like",
        "Enjoyed the article? You might like this too",
        "Share this postYour EmailSubscribe",
        "Discover where Product is heading next",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            sitemap_url: default_sitemap_url(),
            directories: default_directories(),
            pages_dir: default_pages_dir(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            boilerplate_phrases: default_boilerplate_phrases(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scraper: ScraperConfig::default(),
            output: OutputConfig::default(),
            cleaning: CleaningConfig::default(),
        }
    }
}
