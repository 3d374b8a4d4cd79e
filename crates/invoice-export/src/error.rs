//! Error types for export operations.

use crate::emit::{ClipboardError, EmitError};

/// Errors that can occur while exporting records.
///
/// [`ExportError::EmptyInput`] is informational: the caller asked to export
/// nothing, and the action was abandoned before any serialization work.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// No records were given to export.
    #[error("No data to export.")]
    EmptyInput,

    /// The clipboard rejected the write.
    #[error("Failed to copy to clipboard: {0}")]
    Clipboard(#[from] ClipboardError),

    /// The file could not be emitted.
    #[error("Failed to save export: {0}")]
    Emit(#[from] EmitError),

    /// Serialized text could not be read back.
    #[error("Failed to read table: {0}")]
    Read(#[from] csv::Error),

    /// The dialect cannot be used to read text back.
    #[error("Cannot read table: {0}")]
    Unreadable(String),
}

impl ExportError {
    /// Returns `true` for the informational empty-input outcome.
    pub fn is_empty_input(&self) -> bool {
        matches!(self, ExportError::EmptyInput)
    }
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
