//! Loading records and dialects for a command.

use std::io::{self, IsTerminal, Read};
use std::path::Path;

use anyhow::{bail, Context, Result};
use invoice_export::{Dialect, NestedRecord};
use serde_json::Value;

use crate::cli::SourceArgs;

/// Resolves the dialect: a dialect file wins over a built-in name.
pub fn resolve_dialect(args: &SourceArgs) -> Result<Dialect> {
    match &args.dialect_file {
        Some(path) => {
            log::debug!("using dialect file {}", path.display());
            Dialect::from_file(path)
                .with_context(|| format!("loading dialect from {}", path.display()))
        }
        None => Ok(Dialect::builtin(&args.dialect)?),
    }
}

/// Reads the records named by `args`, from a file or from piped stdin.
pub fn load_records(args: &SourceArgs) -> Result<Vec<NestedRecord>> {
    let text = match args.input.as_deref() {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        _ => read_piped_stdin()?,
    };
    let records = parse_records(&text)?;
    log::debug!("loaded {} records", records.len());
    Ok(records)
}

fn read_piped_stdin() -> Result<String> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        bail!("no input: pass --input <file> or pipe JSON records on stdin");
    }
    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(buffer)
}

/// Parses a JSON array of records, or a single record object.
///
/// Blank input parses as no records.
pub fn parse_records(text: &str) -> Result<Vec<NestedRecord>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let value: Value = serde_json::from_str(text).context("input is not valid JSON")?;
    match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(map) => Ok(NestedRecord::from(map)),
                other => bail!("record {} is not an object: {}", i, other),
            })
            .collect(),
        Value::Object(map) => Ok(vec![NestedRecord::from(map)]),
        other => bail!("expected a JSON array of records, got {}", other),
    }
}
