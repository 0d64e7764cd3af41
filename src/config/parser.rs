use crate::config::types::Config;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to read, parse, or validate the file
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Validates a parsed configuration
fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.scraper.sitemap_url.trim().is_empty() {
        return Err(ConfigError::Validation(
            "scraper.sitemap-url must not be empty".to_string(),
        ));
    }

    if config.output.database_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output.database-path must not be empty".to_string(),
        ));
    }

    if config
        .cleaning
        .boilerplate_phrases
        .iter()
        .any(|p| p.trim().is_empty())
    {
        return Err(ConfigError::Validation(
            "cleaning.boilerplate-phrases must not contain empty strings".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[scraper]
sitemap-url = "https://example.com/sitemap.xml"
directories = ["/docs/"]
pages-dir = "snapshots"

[output]
database-path = "./test.db"

[cleaning]
boilerplate-phrases = ["Subscribe now"]
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.scraper.sitemap_url, "https://example.com/sitemap.xml");
        assert_eq!(config.scraper.directories, vec!["/docs/"]);
        assert_eq!(config.scraper.pages_dir, "snapshots");
        assert_eq!(config.output.database_path, "./test.db");
        assert_eq!(config.cleaning.boilerplate_phrases, vec!["Subscribe now"]);
    }

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        let file = create_temp_config("[scraper]\nsitemap-url = \"https://example.com/s.xml\"\n");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.scraper.sitemap_url, "https://example.com/s.xml");
        assert_eq!(config.output.database_path, "data.db");
        assert!(!config.cleaning.boilerplate_phrases.is_empty());
    }

    #[test]
    fn test_defaults_match_original_site() {
        let config = Config::default();
        assert_eq!(
            config.scraper.sitemap_url,
            "https://productschool.com/sitemap.xml"
        );
        assert_eq!(config.scraper.directories, vec!["/blog/", "/resources/"]);
        assert_eq!(config.scraper.pages_dir, "pages");
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_sitemap_url_rejected() {
        let file = create_temp_config("[scraper]\nsitemap-url = \"  \"\n");
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_empty_phrase_rejected() {
        let file = create_temp_config("[cleaning]\nboilerplate-phrases = [\"ok\", \"\"]\n");
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }
}
