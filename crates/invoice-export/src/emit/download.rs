//! File downloads.
//!
//! [`DirectorySink`] stages content in a temporary file inside the target
//! directory and renames it into place. The temporary is removed if any step
//! fails, so a failed export never leaves a partial file behind.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile;

/// Errors raised while emitting a file.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid file name '{0}'")]
    InvalidFileName(String),
}

/// A completed download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// Where the content ended up.
    pub location: PathBuf,
    pub mime_type: String,
    pub bytes: usize,
}

/// A destination for downloaded exports.
pub trait DownloadSink: Send + Sync {
    /// Save `content` under `file_name`.
    fn download(
        &self,
        content: &str,
        file_name: &str,
        mime_type: &str,
    ) -> Result<Download, EmitError>;
}

/// Rejects names that would escape the sink's directory.
pub fn validate_file_name(file_name: &str) -> Result<(), EmitError> {
    let invalid = file_name.trim().is_empty()
        || file_name == "."
        || file_name == ".."
        || file_name.contains(['/', '\\', '\0']);
    if invalid {
        return Err(EmitError::InvalidFileName(file_name.to_string()));
    }
    Ok(())
}

/// Writes downloads into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    fn download(
        &self,
        content: &str,
        file_name: &str,
        mime_type: &str,
    ) -> Result<Download, EmitError> {
        validate_file_name(file_name)?;
        std::fs::create_dir_all(&self.dir)?;

        let target = self.dir.join(file_name);
        let mut staged = NamedTempFile::new_in(&self.dir)?;
        staged.write_all(content.as_bytes())?;
        staged.flush()?;
        staged.persist(&target).map_err(|e| EmitError::Io(e.error))?;

        log::info!(
            "saved {} ({} bytes, {})",
            target.display(),
            content.len(),
            mime_type
        );
        Ok(Download {
            location: target,
            mime_type: mime_type.to_string(),
            bytes: content.len(),
        })
    }
}

/// A download kept in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub file_name: String,
    pub mime_type: String,
    pub content: String,
}

/// Collects downloads in memory instead of touching the filesystem.
#[derive(Debug, Default)]
pub struct MemorySink {
    files: Mutex<Vec<SavedFile>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All downloads so far, oldest first.
    pub fn files(&self) -> Vec<SavedFile> {
        self.files
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl DownloadSink for MemorySink {
    fn download(
        &self,
        content: &str,
        file_name: &str,
        mime_type: &str,
    ) -> Result<Download, EmitError> {
        validate_file_name(file_name)?;
        self.files
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(SavedFile {
                file_name: file_name.to_string(),
                mime_type: mime_type.to_string(),
                content: content.to_string(),
            });
        Ok(Download {
            location: PathBuf::from(file_name),
            mime_type: mime_type.to_string(),
            bytes: content.len(),
        })
    }
}
