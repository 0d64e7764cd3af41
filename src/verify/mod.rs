//! Post-hoc artifact verification
//!
//! Walks a results directory and checks that every page subdirectory holds
//! a structurally valid PDF (parsable, at least one page) and non-trivial
//! text output. Invalid files are tallied, never fatal.

use crate::pdf::page_count;
use std::path::Path;

/// Minimum stripped length for a text file to count as non-empty
pub const MIN_TEXT_LENGTH: usize = 10;

/// Aggregate verification counts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationSummary {
    pub directories_checked: usize,
    pub pdf_files: usize,
    pub invalid_pdfs: usize,
    pub txt_files: usize,
    pub empty_txt_files: usize,
}

/// Verifies every page subdirectory under `pages_dir`
///
/// Read-only apart from logging. Returns `None` when the directory is
/// missing or not a directory (the condition is logged, not raised).
pub fn verify_pages(pages_dir: &Path) -> Option<VerificationSummary> {
    if !pages_dir.is_dir() {
        tracing::error!(
            "Directory '{}' does not exist or is not a directory.",
            pages_dir.display()
        );
        return None;
    }

    tracing::info!("Starting verification of pages in '{}'...", pages_dir.display());

    let mut summary = VerificationSummary::default();

    let entries = match std::fs::read_dir(pages_dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::error!("Failed to read '{}': {}", pages_dir.display(), e);
            return None;
        }
    };

    for entry in entries.flatten() {
        let item = entry.path();
        if !item.is_dir() {
            continue;
        }

        summary.directories_checked += 1;
        tracing::debug!("Checking directory: {}", item.display());

        let files = match std::fs::read_dir(&item) {
            Ok(files) => files,
            Err(e) => {
                tracing::debug!("Failed to read '{}': {}", item.display(), e);
                continue;
            }
        };

        for file in files.flatten() {
            let path = file.path();
            match path.extension().and_then(|e| e.to_str()) {
                Some("pdf") => {
                    summary.pdf_files += 1;
                    if is_valid_pdf(&path) {
                        tracing::debug!("Valid PDF: {}", path.display());
                    } else {
                        tracing::debug!("Invalid PDF: {}", path.display());
                        summary.invalid_pdfs += 1;
                    }
                }
                Some("txt") => {
                    summary.txt_files += 1;
                    if has_content(&path) {
                        tracing::debug!("Non-empty text file: {}", path.display());
                    } else {
                        tracing::debug!("Empty or very small text file: {}", path.display());
                        summary.empty_txt_files += 1;
                    }
                }
                _ => {}
            }
        }
    }

    tracing::info!("Verification summary:");
    tracing::info!("  Directories checked: {}", summary.directories_checked);
    tracing::info!(
        "  PDF files found: {}, Invalid: {}",
        summary.pdf_files,
        summary.invalid_pdfs
    );
    tracing::info!(
        "  TXT files found: {}, Empty: {}",
        summary.txt_files,
        summary.empty_txt_files
    );
    tracing::info!("Verification complete.");

    Some(summary)
}

/// A PDF is valid when it is non-empty on disk and parses to >= 1 page
fn is_valid_pdf(path: &Path) -> bool {
    match std::fs::metadata(path) {
        Ok(meta) if meta.len() > 0 => {}
        _ => return false,
    }

    match page_count(path) {
        Ok(pages) => pages > 0,
        Err(e) => {
            tracing::debug!("PDF read error on '{}': {}", path.display(), e);
            false
        }
    }
}

/// A text file has content when its stripped length reaches the minimum
fn has_content(path: &Path) -> bool {
    match std::fs::read_to_string(path) {
        Ok(content) => content.trim().chars().count() >= MIN_TEXT_LENGTH,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};
    use tempfile::tempdir;

    fn write_one_page_pdf(path: &Path) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let content = Content {
            operations: vec![Operation::new("BT", vec![]), Operation::new("ET", vec![])],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().unwrap(),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();
        doc.save(path).unwrap();
    }

    #[test]
    fn test_missing_directory_reports_none() {
        assert_eq!(verify_pages(Path::new("/nonexistent/pages")), None);
    }

    #[test]
    fn test_valid_artifacts_count_clean() {
        let root = tempdir().unwrap();
        let page_dir = root.path().join("SomePage");
        std::fs::create_dir(&page_dir).unwrap();

        write_one_page_pdf(&page_dir.join("page_001.pdf"));
        std::fs::write(page_dir.join("page_001.txt"), "long enough content here").unwrap();

        let summary = verify_pages(root.path()).unwrap();
        assert_eq!(summary.directories_checked, 1);
        assert_eq!(summary.pdf_files, 1);
        assert_eq!(summary.invalid_pdfs, 0);
        assert_eq!(summary.txt_files, 1);
        assert_eq!(summary.empty_txt_files, 0);
    }

    #[test]
    fn test_unparsable_pdf_counts_invalid() {
        let root = tempdir().unwrap();
        let page_dir = root.path().join("BadPdf");
        std::fs::create_dir(&page_dir).unwrap();

        std::fs::write(page_dir.join("page_001.pdf"), b"garbage bytes").unwrap();

        let summary = verify_pages(root.path()).unwrap();
        assert_eq!(summary.pdf_files, 1);
        assert_eq!(summary.invalid_pdfs, 1);
    }

    #[test]
    fn test_zero_size_pdf_counts_invalid() {
        let root = tempdir().unwrap();
        let page_dir = root.path().join("EmptyPdf");
        std::fs::create_dir(&page_dir).unwrap();

        std::fs::write(page_dir.join("page_001.pdf"), b"").unwrap();

        let summary = verify_pages(root.path()).unwrap();
        assert_eq!(summary.invalid_pdfs, 1);
    }

    #[test]
    fn test_short_text_counts_empty() {
        let root = tempdir().unwrap();
        let page_dir = root.path().join("ShortTxt");
        std::fs::create_dir(&page_dir).unwrap();

        std::fs::write(page_dir.join("page_001.txt"), "  tiny  ").unwrap();

        let summary = verify_pages(root.path()).unwrap();
        assert_eq!(summary.txt_files, 1);
        assert_eq!(summary.empty_txt_files, 1);
    }

    #[test]
    fn test_boundary_text_length_passes() {
        let root = tempdir().unwrap();
        let page_dir = root.path().join("Boundary");
        std::fs::create_dir(&page_dir).unwrap();

        // Exactly MIN_TEXT_LENGTH stripped characters
        std::fs::write(page_dir.join("page_001.txt"), "  0123456789  ").unwrap();

        let summary = verify_pages(root.path()).unwrap();
        assert_eq!(summary.empty_txt_files, 0);
    }

    #[test]
    fn test_loose_files_in_root_are_ignored() {
        let root = tempdir().unwrap();
        std::fs::write(root.path().join("stray.txt"), "not in a page directory").unwrap();

        let summary = verify_pages(root.path()).unwrap();
        assert_eq!(summary.directories_checked, 0);
        assert_eq!(summary.txt_files, 0);
    }
}
