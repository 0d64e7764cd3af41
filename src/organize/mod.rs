//! Post-fetch text organization
//!
//! Two passes over an existing `pages/` tree: one renames and regroups the
//! per-page text files under a flat output directory, the other merges all
//! text into a single file with per-source headers. Both read only `*.txt`
//! artifacts and traverse in sorted order so output names are
//! deterministic.

use crate::naming::{sanitize, SanitizationMode};
use crate::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Root directory for organized and merged output
pub const RESULT_DIR: &str = "result";

/// Copies every `pages/<dir>/*.txt` into `result/<output_dir>/`
///
/// Each file is renamed after its parent directory, sanitized for display;
/// name collisions get an `_<n>` suffix in encounter order. Returns the
/// number of files written.
pub fn rename_and_organize_files(pages_dir: &Path, output_dir: &str) -> Result<usize> {
    if !pages_dir.is_dir() {
        tracing::error!(
            "Directory '{}' does not exist or is not a directory.",
            pages_dir.display()
        );
        return Ok(0);
    }

    let target_root = Path::new(RESULT_DIR).join(output_dir);
    std::fs::create_dir_all(&target_root)?;

    let mut used_names: HashMap<String, usize> = HashMap::new();
    let mut organized = 0;

    for dir in sorted_subdirectories(pages_dir)? {
        let dir_name = match dir.file_name().and_then(|n| n.to_str()) {
            Some(name) => name.to_string(),
            None => continue,
        };

        let base = sanitize(&dir_name, SanitizationMode::Display);
        if base.is_empty() {
            tracing::warn!("Skipping directory with unusable name: {}", dir.display());
            continue;
        }

        for txt in sorted_text_files(&dir)? {
            let count = used_names.entry(base.clone()).or_insert(0);
            let target_name = if *count == 0 {
                format!("{base}.txt")
            } else {
                format!("{base}_{count}.txt")
            };
            *count += 1;

            let target = target_root.join(&target_name);
            std::fs::copy(&txt, &target)?;
            tracing::debug!("Organized {} -> {}", txt.display(), target.display());
            organized += 1;
        }
    }

    tracing::info!(
        "Organized {} text files into {}",
        organized,
        target_root.display()
    );
    Ok(organized)
}

/// Merges every `pages/<dir>/*.txt` into `result/<output_filename>`
///
/// Each file is preceded by a `=== <directory name> ===` header and
/// contributes its content with exactly one trailing newline. Returns the
/// number of files merged.
pub fn merge_text_files(pages_dir: &Path, output_filename: &str) -> Result<usize> {
    if !pages_dir.is_dir() {
        tracing::error!(
            "Directory '{}' does not exist or is not a directory.",
            pages_dir.display()
        );
        return Ok(0);
    }

    std::fs::create_dir_all(RESULT_DIR)?;
    let output_path = Path::new(RESULT_DIR).join(output_filename);

    let mut merged = String::new();
    let mut merged_count = 0;

    for dir in sorted_subdirectories(pages_dir)? {
        let dir_name = match dir.file_name().and_then(|n| n.to_str()) {
            Some(name) => name.to_string(),
            None => continue,
        };

        for txt in sorted_text_files(&dir)? {
            let content = std::fs::read_to_string(&txt)?;
            merged.push_str(&format!("=== {dir_name} ===\n\n"));
            merged.push_str(content.trim_end());
            merged.push('\n');
            merged_count += 1;
        }
    }

    std::fs::write(&output_path, merged)?;
    tracing::info!(
        "Merged {} text files into {}",
        merged_count,
        output_path.display()
    );
    Ok(merged_count)
}

/// Immediate subdirectories of `dir`, sorted by name
fn sorted_subdirectories(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut subdirs: Vec<PathBuf> = std::fs::read_dir(dir)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    subdirs.sort();
    Ok(subdirs)
}

/// `*.txt` files directly inside `dir`, sorted by name
fn sorted_text_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("txt")
        })
        .collect();
    files.sort();
    Ok(files)
}
