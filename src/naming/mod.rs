//! Filesystem-safe naming
//!
//! Converts page titles and URLs into safe directory/file names. Two
//! sanitization modes exist for two downstream uses and are deliberately not
//! equivalent; downstream naming depends on the exact output of each.

/// Sanitization strategy for a derived name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SanitizationMode {
    /// Lower-cased, with runs of non-alphanumeric characters folded into a
    /// single underscore. Used when organizing already-saved text files.
    Display,
    /// Case-preserving; strips everything except alphanumerics, `-`, `_`
    /// and `.`, including all whitespace. Used for fetch output directories.
    StorageKey,
}

/// Sanitizes a name for filesystem use under the given mode
///
/// Input that reduces to nothing yields an empty string; callers are
/// expected to fall back to [`url_to_slug`] in that case.
pub fn sanitize(name: &str, mode: SanitizationMode) -> String {
    match mode {
        SanitizationMode::Display => sanitize_display(name),
        SanitizationMode::StorageKey => sanitize_storage_key(name),
    }
}

fn sanitize_display(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut gap = false;

    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if gap && !out.is_empty() {
                out.push('_');
            }
            gap = false;
            out.extend(ch.to_lowercase());
        } else {
            gap = true;
        }
    }

    out
}

fn sanitize_storage_key(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect()
}

/// Derives a slug from a URL by dropping the scheme and flattening the path
///
/// `https://example.com/blog/post` becomes `example.com-blog-post`. Used
/// whenever no title is available or sanitization yields an empty string.
pub fn url_to_slug(url: &str) -> String {
    url.replace("http://", "").replace("https://", "").replace('/', "-")
}
