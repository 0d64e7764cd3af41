//! PDF rendering and inspection
//!
//! Rendering is an opaque "URL in, PDF file out" call behind the
//! [`PdfRenderer`] trait; the production implementation shells out to
//! `wkhtmltopdf`. Inspection (used by the verification pass) opens a PDF
//! and reports its page count.

use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Errors from the PDF rendering seam
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to launch '{binary}': {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{binary}' exited with {status}: {stderr}")]
    RendererFailed {
        binary: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
}

/// Renders a URL into a PDF file at a destination path
pub trait PdfRenderer {
    fn render(&self, url: &str, destination: &Path) -> Result<(), RenderError>;
}

/// Renders pages by invoking the `wkhtmltopdf` binary
pub struct WkhtmltopdfRenderer {
    binary: PathBuf,
}

impl WkhtmltopdfRenderer {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for WkhtmltopdfRenderer {
    fn default() -> Self {
        Self::new("wkhtmltopdf")
    }
}

impl PdfRenderer for WkhtmltopdfRenderer {
    fn render(&self, url: &str, destination: &Path) -> Result<(), RenderError> {
        let binary = self.binary.display().to_string();

        let output = Command::new(&self.binary)
            .arg("--quiet")
            .arg(url)
            .arg(destination)
            .output()
            .map_err(|source| RenderError::Spawn {
                binary: binary.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(RenderError::RendererFailed {
                binary,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}

/// Opens a PDF file and returns its page count
pub fn page_count(path: &Path) -> Result<usize, lopdf::Error> {
    let document = lopdf::Document::load(path)?;
    Ok(document.get_pages().len())
}
