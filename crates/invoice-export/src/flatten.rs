//! Row flattening: records with one-to-many sub-collections become flat rows.
//!
//! Under [`RowExpansion::Nested`] a record expands into
//! `max(1, longest referenced sub-collection)` rows:
//!
//! ```text
//! record: title=Kettle, specifications=[Volume, Power, Color], availability=[Shop]
//!
//! row 0:  Kettle | Volume | Shop
//! row 1:         | Power  |
//! row 2:         | Color  |
//! ```
//!
//! Base columns (fields and literals) are written on the first row only.
//! Shorter sub-collections leave their columns absent once exhausted; the
//! longest one is never truncated.

use crate::dialect::{ColumnSource, Dialect, RowExpansion};
use crate::record::Record;
use crate::value::Scalar;

/// One emitted row: raw cell values in dialect column order.
pub type Row<'a> = Vec<Scalar<'a>>;

/// Flattens records into rows for `dialect`.
///
/// Every returned row has exactly [`Dialect::width`] cells. An empty input
/// yields no rows.
pub fn flatten<'a, R: Record>(records: &'a [R], dialect: &'a Dialect) -> Vec<Row<'a>> {
    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        flatten_record(record, dialect, &mut rows);
    }
    rows
}

/// Appends the rows of a single record to `rows`.
pub fn flatten_record<'a>(record: &'a dyn Record, dialect: &'a Dialect, rows: &mut Vec<Row<'a>>) {
    let collections: Vec<(&str, Vec<&'a dyn Record>)> = dialect
        .collections()
        .into_iter()
        .map(|name| (name, record.collection(name)))
        .collect();

    let row_count = match dialect.expansion {
        RowExpansion::Single => 1,
        RowExpansion::Nested => collections
            .iter()
            .map(|(_, items)| items.len())
            .max()
            .unwrap_or(0)
            .max(1),
    };

    let base: Row<'a> = dialect
        .columns
        .iter()
        .map(|column| column.base_value(record))
        .collect();

    for index in 0..row_count {
        let row = dialect
            .columns
            .iter()
            .zip(&base)
            .map(|(column, base_value)| match &column.source {
                ColumnSource::Nested { collection, field } => collections
                    .iter()
                    .find(|(name, _)| *name == collection.as_str())
                    .and_then(|(_, items)| items.get(index).copied())
                    .map(|item| item.field(field))
                    .unwrap_or(Scalar::Absent),
                _ if index == 0 => *base_value,
                _ => Scalar::Absent,
            })
            .collect();
        rows.push(row);
    }
}

/// Number of rows `record` expands into under `dialect`.
pub fn row_count(record: &dyn Record, dialect: &Dialect) -> usize {
    match dialect.expansion {
        RowExpansion::Single => 1,
        RowExpansion::Nested => dialect
            .collections()
            .into_iter()
            .map(|name| record.collection(name).len())
            .max()
            .unwrap_or(0)
            .max(1),
    }
}
