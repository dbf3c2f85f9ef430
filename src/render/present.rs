use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{ColesListsError, Result};

/// Shows a rendered document to the user
pub trait Presenter: Send + Sync {
    /// Returns where the document ended up
    fn present(&self, html: &str) -> Result<PathBuf>;
}

/// Writes the document to disk and opens it in the default browser.
///
/// If the browser cannot be launched the file is still written, and the
/// error is [`ColesListsError::PopupBlocked`].
pub struct BrowserTabPresenter {
    output_dir: PathBuf,
}

impl BrowserTabPresenter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl Presenter for BrowserTabPresenter {
    fn present(&self, html: &str) -> Result<PathBuf> {
        let path = self.output_dir.join(document_file_name());
        write_document(&path, html)?;

        open::that(&path).map_err(|e| {
            tracing::error!("Failed to open {}: {}", path.display(), e);
            ColesListsError::PopupBlocked
        })?;

        tracing::info!("Opened {}", path.display());
        Ok(path)
    }
}

/// Writes the document to a fixed path without opening it
pub struct FilePresenter {
    path: PathBuf,
}

impl FilePresenter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A timestamped file inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(document_file_name()))
    }
}

impl Presenter for FilePresenter {
    fn present(&self, html: &str) -> Result<PathBuf> {
        write_document(&self.path, html)?;
        tracing::info!("Wrote {}", self.path.display());
        Ok(self.path.clone())
    }
}

fn document_file_name() -> String {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("coles-shopping-lists-{}.html", stamp)
}

fn write_document(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, html)?;
    Ok(())
}
