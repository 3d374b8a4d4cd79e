//! Table serialization and its inverse.
//!
//! Output is the header line followed by one line per row, joined by `\n`
//! with no trailing newline. An empty row set serializes to the empty string,
//! not to a lone header.
//!
//! In quoting dialects a line holding a single empty cell is written as `""`
//! so that readers do not mistake it for a blank line.

use std::borrow::Cow;

use crate::dialect::Dialect;
use crate::error::ExportError;
use crate::escape::{quote_for, Escaping};
use crate::flatten::{flatten, Row};
use crate::record::Record;

/// Serializes `rows` under `header` using the dialect's delimiter and
/// escaping policy.
///
/// Header cells follow the same escaping policy as data cells.
pub fn serialize(header: &[&str], rows: &[Row<'_>], dialect: &Dialect) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    write_line(
        &mut out,
        header
            .iter()
            .map(|h| header_cell(h, dialect.escaping, dialect.delimiter)),
        dialect,
    );
    for row in rows {
        out.push('\n');
        write_line(
            &mut out,
            row.iter()
                .map(|cell| dialect.escaping.apply(cell, dialect.delimiter)),
            dialect,
        );
    }
    out
}

/// Flattens and serializes `records` in one step.
///
/// ```
/// use invoice_export::{render, Dialect, InvoiceItem};
///
/// let items = vec![InvoiceItem::new("A1", "Widget", 2.0, 9.5)];
/// assert_eq!(
///     render(&items, &Dialect::invoice_csv()),
///     "Product Code,Product Name,Quantity,Unit Price\nA1,Widget,2,9.5"
/// );
/// ```
pub fn render<R: Record>(records: &[R], dialect: &Dialect) -> String {
    let rows = flatten(records, dialect);
    serialize(&dialect.header(), &rows, dialect)
}

/// Reads serialized output back into cell texts, header row included.
///
/// Quoted cells are unescaped for quoting dialects; raw dialects are split on
/// the delimiter only. Empty text yields no rows.
pub fn parse_table(text: &str, dialect: &Dialect) -> Result<Vec<Vec<String>>, ExportError> {
    if text.is_empty() {
        return Ok(Vec::new());
    }

    if !dialect.delimiter.is_ascii() {
        return Err(ExportError::Unreadable(format!(
            "delimiter {:?} is not an ASCII character",
            dialect.delimiter
        )));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(dialect.delimiter as u8)
        .quoting(dialect.escaping == Escaping::Quote)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

pub(crate) fn header_cell(
    header: &str,
    escaping: Escaping,
    delimiter: char,
) -> Cow<'_, str> {
    match escaping {
        Escaping::Quote => quote_for(header, delimiter),
        Escaping::Raw => Cow::Borrowed(header),
    }
}

pub(crate) fn write_line<S: AsRef<str>>(
    out: &mut String,
    cells: impl Iterator<Item = S>,
    dialect: &Dialect,
) {
    let start = out.len();
    let mut count = 0;
    for cell in cells {
        if count > 0 {
            out.push(dialect.delimiter);
        }
        out.push_str(cell.as_ref());
        count += 1;
    }
    if count == 1 && out.len() == start && dialect.escaping == Escaping::Quote {
        out.push_str("\"\"");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Column;
    use crate::domain::{EnrichedProduct, InvoiceItem, Specification};
    use crate::record::FlatRecord;
    use crate::value::Scalar;

    #[test]
    fn empty_rows_serialize_to_empty_string() {
        for dialect in Dialect::builtins() {
            assert_eq!(serialize(&dialect.header(), &[], &dialect), "");
        }
    }

    #[test]
    fn invoice_csv_scenario() {
        let items = vec![InvoiceItem::new("A1", "Widget", 2.0, 9.5)];
        assert_eq!(
            render(&items, &Dialect::invoice_csv()),
            "Product Code,Product Name,Quantity,Unit Price\nA1,Widget,2,9.5"
        );
    }

    #[test]
    fn quoted_name_scenario() {
        let items = vec![InvoiceItem::new("A1", "Widget, \"Pro\"", 1.0, 1.0)];
        let out = render(&items, &Dialect::invoice_csv());
        assert_eq!(out.lines().nth(1), Some("A1,\"Widget, \"\"Pro\"\"\",1,1"));
    }

    #[test]
    fn tsv_is_not_escaped() {
        let items = vec![InvoiceItem::new("A1", "Widget, \"Pro\"", 1.0, 1.0)];
        let out = render(&items, &Dialect::invoice_tsv());
        assert_eq!(
            out,
            "Product Code\tProduct Name\tQuantity\tUnit Price\nA1\tWidget, \"Pro\"\t1\t1"
        );
    }

    #[test]
    fn artikel_scenario() {
        let items = vec![
            InvoiceItem::new("A1", "Widget", 2.0, 9.5),
            InvoiceItem::new("B2", "Schraube M4", 100.0, 0.05),
        ];
        assert_eq!(
            render(&items, &Dialect::artikel_csv()),
            "Artikel-Code,Artikelname,Artikelgruppe,Standardmaßeinheit\n\
             A1,Widget,Produkte,Stk\n\
             B2,Schraube M4,Produkte,Stk"
        );
    }

    #[test]
    fn absent_cells_are_empty() {
        let dialect = Dialect::invoice_csv();
        let rows = vec![vec![
            Scalar::Text("A1"),
            Scalar::Absent,
            Scalar::Absent,
            Scalar::Absent,
        ]];
        assert_eq!(
            serialize(&dialect.header(), &rows, &dialect),
            "Product Code,Product Name,Quantity,Unit Price\nA1,,,"
        );
    }

    #[test]
    fn products_with_specs_only() {
        let products = vec![EnrichedProduct::new("LAMP", "Desk Lamp")
            .spec(Specification::new("Color", "Black"))
            .spec(Specification::new("Height", "40 cm"))];
        let out = render(&products, &Dialect::products_csv());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "LAMP,Desk Lamp,,,Color,Black,,,,");
        assert_eq!(lines[2], ",,,,Height,40 cm,,,,");
    }

    #[test]
    fn no_trailing_newline() {
        let items = vec![InvoiceItem::new("A1", "Widget", 2.0, 9.5)];
        assert!(!render(&items, &Dialect::invoice_csv()).ends_with('\n'));
    }

    #[test]
    fn parse_recovers_cells() {
        let items = vec![InvoiceItem::new("A1", "multi\nline, \"quoted\"", 3.0, 0.5)];
        let dialect = Dialect::invoice_csv();
        let table = parse_table(&render(&items, &dialect), &dialect).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table[0], dialect.header());
        assert_eq!(table[1], vec!["A1", "multi\nline, \"quoted\"", "3", "0.5"]);
    }

    #[test]
    fn parse_raw_dialect_keeps_quotes() {
        let dialect = Dialect::invoice_tsv();
        let table = parse_table("a\tb\"c\"\td\te", &dialect).unwrap();
        assert_eq!(table, vec![vec!["a", "b\"c\"", "d", "e"]]);
    }

    #[test]
    fn parse_empty_text() {
        assert!(parse_table("", &Dialect::invoice_csv()).unwrap().is_empty());
    }

    #[test]
    fn parse_rejects_ragged_rows() {
        let result = parse_table("a,b\nc", &Dialect::invoice_csv());
        assert!(matches!(result, Err(ExportError::Read(_))));
    }

    #[test]
    fn custom_delimiter_cells_are_quoted() {
        let dialect = Dialect::new("codes", "codes.csv")
            .delimiter(';')
            .column(Column::field("Code", "productCode"))
            .column(Column::literal("Unit", "Stk"));
        let records = vec![FlatRecord::new().with("productCode", "A;1")];
        let out = render(&records, &dialect);
        assert_eq!(out, "Code;Unit\n\"A;1\";Stk");

        let table = parse_table(&out, &dialect).unwrap();
        assert_eq!(table[1], vec!["A;1", "Stk"]);
    }

    #[test]
    fn single_column_keeps_empty_rows() {
        let dialect =
            Dialect::new("codes", "codes.csv").column(Column::field("Code", "productCode"));
        let records = vec![FlatRecord::new(), FlatRecord::new().with("productCode", "B")];
        let out = render(&records, &dialect);
        assert_eq!(out, "Code\n\"\"\nB");

        let table = parse_table(&out, &dialect).unwrap();
        assert_eq!(table, vec![vec!["Code"], vec![""], vec!["B"]]);
    }

    #[test]
    fn multi_column_empty_rows_are_not_quoted() {
        let dialect = Dialect::invoice_csv();
        let rows = vec![vec![Scalar::Absent; 4]];
        assert_eq!(
            serialize(&dialect.header(), &rows, &dialect),
            "Product Code,Product Name,Quantity,Unit Price\n,,,"
        );
    }

    #[test]
    fn parse_rejects_multibyte_delimiter() {
        let dialect = Dialect::invoice_csv().delimiter('§');
        assert!(matches!(
            parse_table("a", &dialect),
            Err(ExportError::Unreadable(_))
        ));
    }
}
