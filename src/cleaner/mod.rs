//! Content cleaning
//!
//! Strips structural boilerplate (`<nav>`, `<footer>`, `<header>`) from a
//! parsed HTML document, extracts text (preferring a `<main>` element),
//! normalizes whitespace, removes a configured set of site-wide marketing
//! phrases, and repairs run-together sentences.

use crate::ConfigError;
use regex::{Regex, RegexBuilder};
use scraper::{Html, Selector};

/// Cleans page content using a configured boilerplate phrase list
///
/// All patterns are compiled once at construction; `clean` itself never
/// fails. An empty result means the page had no usable content after
/// cleaning.
pub struct ContentCleaner {
    /// Matches structural chrome removed before text extraction
    chrome_selector: Selector,
    main_selector: Selector,
    /// Escaped alternation over the configured phrases, case-insensitive;
    /// `None` when no phrases are configured
    phrase_re: Option<Regex>,
    whitespace_re: Regex,
    period_re: Regex,
}

impl ContentCleaner {
    /// Builds a cleaner from the configured boilerplate phrases
    pub fn new(phrases: &[String]) -> Result<Self, ConfigError> {
        let chrome_selector = Selector::parse("nav, footer, header")
            .map_err(|e| ConfigError::Validation(format!("invalid chrome selector: {e}")))?;
        let main_selector = Selector::parse("main")
            .map_err(|e| ConfigError::Validation(format!("invalid main selector: {e}")))?;

        let phrase_re = if phrases.is_empty() {
            None
        } else {
            let escaped: Vec<String> = phrases.iter().map(|p| regex::escape(p)).collect();
            let pattern = format!(r"\s*({})[.?!]*\s*", escaped.join("|"));
            Some(
                RegexBuilder::new(&pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| {
                        ConfigError::Validation(format!(
                            "failed to compile boilerplate phrase pattern: {e}"
                        ))
                    })?,
            )
        };

        let whitespace_re = Regex::new(r"\s+")
            .map_err(|e| ConfigError::Validation(format!("invalid whitespace pattern: {e}")))?;
        let period_re = Regex::new(r"\.([A-Za-z0-9])")
            .map_err(|e| ConfigError::Validation(format!("invalid period pattern: {e}")))?;

        Ok(Self {
            chrome_selector,
            main_selector,
            phrase_re,
            whitespace_re,
            period_re,
        })
    }

    /// Strips boilerplate and returns the normalized textual content
    ///
    /// Scopes extraction to the first `<main>` element when one exists;
    /// otherwise the whole document is used, head included, so a page
    /// `<title>` can leak into the output.
    pub fn clean(&self, page_title: &str, mut document: Html) -> String {
        tracing::info!("Cleaning page: {}", page_title);

        let chrome: Vec<_> = document
            .select(&self.chrome_selector)
            .map(|el| el.id())
            .collect();
        for id in chrome {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
            }
        }

        let raw_text = match document.select(&self.main_selector).next() {
            Some(main) => main.text().collect::<String>(),
            None => document.root_element().text().collect::<String>(),
        };

        let text = self.whitespace_re.replace_all(&raw_text, " ");
        let text = self.remove_boilerplate_phrases(text.trim());
        self.fix_missing_space_after_period(&text)
    }

    /// Removes configured boilerplate phrases from already-normalized text
    ///
    /// Each match (phrase, trailing `.`/`?`/`!`, surrounding whitespace) is
    /// replaced with a single space, then whitespace is re-collapsed and the
    /// ends trimmed.
    pub fn remove_boilerplate_phrases(&self, text: &str) -> String {
        let cleaned = match &self.phrase_re {
            Some(re) => re.replace_all(text, " "),
            None => text.into(),
        };
        let cleaned = self.whitespace_re.replace_all(&cleaned, " ");
        cleaned.trim().to_string()
    }

    /// Inserts a space after a period immediately followed by a letter or
    /// digit, e.g. `"word.Next"` becomes `"word. Next"`
    pub fn fix_missing_space_after_period(&self, text: &str) -> String {
        self.period_re.replace_all(text, ". ${1}").to_string()
    }
}
