//! Clipboard writers.

use std::sync::Mutex;
use std::time::Duration;

use super::shell::{feed_command, ShellError};

/// Errors raised when the clipboard rejects a write.
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    /// No clipboard command is known for this platform.
    #[error("Clipboard not supported on this platform")]
    Unsupported,

    /// The clipboard command failed, timed out or could not be started.
    #[error(transparent)]
    Command(#[from] ShellError),

    /// The clipboard refused the content.
    #[error("Clipboard rejected the write: {0}")]
    Rejected(String),
}

/// Abstraction over clipboard access.
pub trait ClipboardWriter: Send + Sync {
    /// Replace the clipboard contents with `content`.
    fn write(&self, content: &str) -> Result<(), ClipboardError>;
}

/// Returns the clipboard command for macOS (pbcopy).
#[cfg(target_os = "macos")]
pub fn clipboard_command() -> Option<&'static str> {
    Some("pbcopy")
}

/// Returns the clipboard command for Linux (xclip).
#[cfg(target_os = "linux")]
pub fn clipboard_command() -> Option<&'static str> {
    Some("xclip -selection clipboard")
}

/// Returns None on unsupported platforms.
#[cfg(not(any(target_os = "macos", target_os = "linux")))]
pub fn clipboard_command() -> Option<&'static str> {
    None
}

/// Real clipboard writer using platform commands.
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    timeout: Duration,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(5),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardWriter for SystemClipboard {
    fn write(&self, content: &str) -> Result<(), ClipboardError> {
        let command = clipboard_command().ok_or(ClipboardError::Unsupported)?;
        feed_command(command, content, Some(self.timeout))?;
        Ok(())
    }
}

/// Mock clipboard for testing.
///
/// Keeps the last written content, or rejects every write when built with
/// [`MockClipboard::rejecting`].
#[derive(Debug, Default)]
pub struct MockClipboard {
    content: Mutex<Option<String>>,
    reject: Option<String>,
}

impl MockClipboard {
    /// Create an empty clipboard mock that accepts writes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clipboard mock that rejects writes with `reason`.
    pub fn rejecting(reason: impl Into<String>) -> Self {
        Self {
            content: Mutex::new(None),
            reject: Some(reason.into()),
        }
    }

    /// The last successfully written content.
    pub fn content(&self) -> Option<String> {
        self.content
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl ClipboardWriter for MockClipboard {
    fn write(&self, content: &str) -> Result<(), ClipboardError> {
        if let Some(reason) = &self.reject {
            return Err(ClipboardError::Rejected(reason.clone()));
        }
        *self
            .content
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(content.to_string());
        Ok(())
    }
}
