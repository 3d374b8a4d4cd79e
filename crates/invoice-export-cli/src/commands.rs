//! Command execution.

use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use invoice_export::{
    copy_to_clipboard, export_to_file, render, Destination, Dialect, DirectorySink, ExportError,
    ExportReport, SystemClipboard,
};

use crate::cli::Command;
use crate::input::{load_records, resolve_dialect};

/// Runs `command`, writing user-facing output to `out`.
pub fn run(command: Command, out: &mut dyn Write) -> Result<()> {
    match command {
        Command::Export {
            source,
            out_dir,
            file_name,
        } => {
            let mut dialect = resolve_dialect(&source)?;
            if let Some(name) = file_name {
                dialect.file_name = name;
            }
            let records = load_records(&source)?;
            let sink = DirectorySink::new(out_dir);
            let report = export_to_file(&records, &dialect, &sink)?;
            writeln!(out, "{}", describe(&report))?;
        }
        Command::Copy {
            source,
            clipboard_timeout_secs,
        } => {
            let dialect = resolve_dialect(&source)?;
            let records = load_records(&source)?;
            let clipboard =
                SystemClipboard::new().with_timeout(Duration::from_secs(clipboard_timeout_secs));
            let report = copy_to_clipboard(&records, &dialect, &clipboard)?;
            writeln!(out, "{}", describe(&report))?;
        }
        Command::Print { source } => {
            let dialect = resolve_dialect(&source)?;
            let records = load_records(&source)?;
            if records.is_empty() {
                return Err(ExportError::EmptyInput.into());
            }
            writeln!(out, "{}", render(&records, &dialect))?;
        }
        Command::Dialects => list_dialects(out)?,
    }
    Ok(())
}

fn list_dialects(out: &mut dyn Write) -> Result<()> {
    for dialect in Dialect::builtins() {
        writeln!(out, "{:<14} {}", dialect.name, dialect.file_name)?;
        writeln!(out, "{:<14} {}", "", dialect.header().join(" | "))?;
    }
    Ok(())
}

/// One-line summary of a finished export.
pub fn describe(report: &ExportReport) -> String {
    let target = match &report.destination {
        Destination::File(download) => download.location.display().to_string(),
        Destination::Clipboard => "clipboard".to_string(),
    };
    format!(
        "Exported {} record(s) as {} ({} rows, {} bytes) to {}",
        report.records, report.dialect, report.rows, report.bytes, target
    )
}

/// Returns the empty-input notice if `err` is one.
pub fn empty_input(err: &anyhow::Error) -> Option<&ExportError> {
    err.downcast_ref::<ExportError>()
        .filter(|e| e.is_empty_input())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::SourceArgs;
    use std::path::{Path, PathBuf};

    fn source(dialect: &str, input: &Path) -> SourceArgs {
        SourceArgs {
            dialect: dialect.to_string(),
            dialect_file: None,
            input: Some(input.to_path_buf()),
        }
    }

    fn write_items(dir: &Path, json: &str) -> PathBuf {
        let path = dir.join("items.json");
        std::fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn export_writes_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_items(
            dir.path(),
            r#"[{"productCode": "A1", "productName": "Widget", "quantity": 2, "unitPrice": 9.5}]"#,
        );
        let out_dir = dir.path().join("out");
        let mut out = Vec::new();

        run(
            Command::Export {
                source: source("invoice-csv", &input),
                out_dir: out_dir.clone(),
                file_name: None,
            },
            &mut out,
        )
        .unwrap();

        assert_eq!(
            std::fs::read_to_string(out_dir.join("extracted_invoice_data.csv")).unwrap(),
            "Product Code,Product Name,Quantity,Unit Price\nA1,Widget,2,9.5"
        );
        assert!(String::from_utf8(out).unwrap().starts_with("Exported 1 record(s)"));
    }

    #[test]
    fn export_honours_file_name_override() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_items(dir.path(), r#"[{"productCode": "A1"}]"#);
        run(
            Command::Export {
                source: source("artikel-csv", &input),
                out_dir: dir.path().to_path_buf(),
                file_name: Some("import.csv".to_string()),
            },
            &mut Vec::new(),
        )
        .unwrap();
        assert!(dir.path().join("import.csv").exists());
    }

    #[test]
    fn empty_export_is_a_notice() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_items(dir.path(), "[]");
        let err = run(
            Command::Export {
                source: source("invoice-csv", &input),
                out_dir: dir.path().join("out"),
                file_name: None,
            },
            &mut Vec::new(),
        )
        .unwrap_err();
        assert!(empty_input(&err).is_some());
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn print_writes_products() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_items(
            dir.path(),
            r#"[{"title": "Lamp", "specifications": [{"key": "Color", "value": "Black"}, {"key": "Height", "value": "40 cm"}]}]"#,
        );
        let mut out = Vec::new();
        run(
            Command::Print {
                source: source("products-csv", &input),
            },
            &mut out,
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], ",Lamp,,,Color,Black,,,,");
        assert_eq!(lines[2], ",,,,Height,40 cm,,,,");
    }

    #[test]
    fn print_refuses_empty_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_items(dir.path(), "[]");
        let err = run(
            Command::Print {
                source: source("invoice-tsv", &input),
            },
            &mut Vec::new(),
        )
        .unwrap_err();
        assert!(empty_input(&err).is_some());
    }

    #[test]
    fn dialects_lists_builtins() {
        let mut out = Vec::new();
        run(Command::Dialects, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        for name in ["invoice-csv", "invoice-tsv", "artikel-csv", "products-csv"] {
            assert!(text.contains(name), "missing {}", name);
        }
    }

    #[test]
    fn other_errors_are_not_notices() {
        let err = anyhow::Error::new(ExportError::Unreadable("x".into()));
        assert!(empty_input(&err).is_none());
    }
}
