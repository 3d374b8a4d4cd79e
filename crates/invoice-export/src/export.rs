//! Export actions: the operations behind the "download" and "copy" buttons.
//!
//! Both refuse empty input with [`ExportError::EmptyInput`] before doing any
//! serialization work, and report emitter failures to the caller as-is.

use crate::dialect::Dialect;
use crate::emit::{ClipboardWriter, Download, DownloadSink};
use crate::error::{ExportError, Result};
use crate::flatten::flatten;
use crate::record::Record;
use crate::serialize::serialize;

/// Where an export ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    File(Download),
    Clipboard,
}

/// Summary of a completed export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub dialect: String,
    pub records: usize,
    pub rows: usize,
    pub bytes: usize,
    pub destination: Destination,
}

/// Serialized text plus the counts that go into an [`ExportReport`].
struct Rendered {
    text: String,
    rows: usize,
}

fn render_checked<R: Record>(records: &[R], dialect: &Dialect) -> Result<Rendered> {
    if records.is_empty() {
        return Err(ExportError::EmptyInput);
    }
    let rows = flatten(records, dialect);
    let text = serialize(&dialect.header(), &rows, dialect);
    log::debug!(
        "rendered {} records into {} rows ({} bytes) as {}",
        records.len(),
        rows.len(),
        text.len(),
        dialect.name
    );
    Ok(Rendered {
        rows: rows.len(),
        text,
    })
}

/// Serializes `records` and hands the result to `sink` under the dialect's
/// file name and MIME type.
pub fn export_to_file<R: Record>(
    records: &[R],
    dialect: &Dialect,
    sink: &dyn DownloadSink,
) -> Result<ExportReport> {
    let rendered = render_checked(records, dialect)?;
    let download = sink.download(&rendered.text, &dialect.file_name, &dialect.mime_type)?;
    Ok(ExportReport {
        dialect: dialect.name.clone(),
        records: records.len(),
        rows: rendered.rows,
        bytes: rendered.text.len(),
        destination: Destination::File(download),
    })
}

/// Serializes `records` and writes the result to the clipboard.
pub fn copy_to_clipboard<R: Record>(
    records: &[R],
    dialect: &Dialect,
    clipboard: &dyn ClipboardWriter,
) -> Result<ExportReport> {
    let rendered = render_checked(records, dialect)?;
    if let Err(err) = clipboard.write(&rendered.text) {
        log::warn!("clipboard write failed: {}", err);
        return Err(err.into());
    }
    Ok(ExportReport {
        dialect: dialect.name.clone(),
        records: records.len(),
        rows: rendered.rows,
        bytes: rendered.text.len(),
        destination: Destination::Clipboard,
    })
}
