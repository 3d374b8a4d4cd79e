//! Emitting serialized exports: file downloads and clipboard writes.
//!
//! Both destinations sit behind traits so callers can swap in the in-memory
//! [`MemorySink`] and [`MockClipboard`] for tests.

mod clipboard;
mod download;
mod shell;

pub use clipboard::{
    clipboard_command, ClipboardError, ClipboardWriter, MockClipboard, SystemClipboard,
};
pub use download::{
    validate_file_name, DirectorySink, Download, DownloadSink, EmitError, MemorySink, SavedFile,
};
pub use shell::{feed_command, ShellError};
