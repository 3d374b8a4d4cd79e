//! Tabular export of extracted invoice items and enriched product records.
//!
//! `invoice-export` turns in-memory records into delimited text (CSV, TSV and
//! fixed-column import formats) and hands the result to a file sink or the
//! clipboard.
//!
//! # Quick Start
//!
//! ```rust
//! use invoice_export::{export_to_file, Dialect, InvoiceItem, MemorySink};
//!
//! let items = vec![InvoiceItem::new("A1", "Widget", 2.0, 9.5)];
//! let sink = MemorySink::new();
//!
//! export_to_file(&items, &Dialect::invoice_csv(), &sink)?;
//!
//! let files = sink.files();
//! assert_eq!(files[0].file_name, "extracted_invoice_data.csv");
//! assert_eq!(
//!     files[0].content,
//!     "Product Code,Product Name,Quantity,Unit Price\nA1,Widget,2,9.5"
//! );
//! # Ok::<(), invoice_export::ExportError>(())
//! ```
//!
//! # Architecture
//!
//! Data flows one way:
//!
//! ```text
//! records ──► flatten ──► serialize ──► DownloadSink / ClipboardWriter
//!   (Record)   (Row)       (String)
//! ```
//!
//! - [`Record`] exposes base fields and one-to-many sub-collections.
//! - [`Dialect`] declares columns, delimiter, escaping and row expansion.
//! - [`flatten`] expands nested records into rows, base fields on the first
//!   row only.
//! - [`serialize`] joins header and rows; [`parse_table`] reads them back.
//! - [`export_to_file`] and [`copy_to_clipboard`] refuse empty input and
//!   report emitter failures.
//!
//! # Escaping
//!
//! CSV-family dialects quote cells containing `"`, `,`, LF or CR and double
//! inner quotes. The TSV dialect writes cells verbatim.

mod dialect;
mod domain;
pub mod emit;
mod error;
mod escape;
mod export;
mod flatten;
mod record;
mod serialize;
mod value;

pub use dialect::{Column, ColumnSource, Dialect, DialectError, RowExpansion, CSV_MIME, TSV_MIME};
pub use domain::{Availability, EnrichedProduct, InvoiceItem, Specification};
pub use error::{ExportError, Result};
pub use escape::{
    escape, escape_for, escape_str, needs_quoting, needs_quoting_for, quote_for, unescape, Escaping,
};
pub use export::{copy_to_clipboard, export_to_file, Destination, ExportReport};
pub use flatten::{flatten, flatten_record, row_count, Row};
pub use record::{FlatRecord, NestedRecord, Record};
pub use serialize::{parse_table, render, serialize};
pub use value::{Number, OwnedScalar, Scalar};

// Emitters used by most callers
pub use emit::{
    ClipboardError, ClipboardWriter, DirectorySink, Download, DownloadSink, EmitError,
    MemorySink, MockClipboard, SystemClipboard,
};
