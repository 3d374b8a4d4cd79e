//! Declarative export formats.
//!
//! A [`Dialect`] is a table of column extractors plus the delimiter, escaping
//! policy and row-expansion policy used to serialize them. Constant columns
//! (such as the Artikel export's `Produkte`/`Stk`) are plain
//! [`ColumnSource::Literal`] entries, so the flattener never special-cases
//! them.
//!
//! # Built-in dialects
//!
//! | Name | Delimiter | Escaping | Expansion | File |
//! |------|-----------|----------|-----------|------|
//! | `invoice-csv` | `,` | quote | single | `extracted_invoice_data.csv` |
//! | `invoice-tsv` | tab | raw | single | `extracted_invoice_data.tsv` |
//! | `artikel-csv` | `,` | quote | single | `artikel_export.csv` |
//! | `products-csv` | `,` | quote | nested | `enriched_products.csv` |
//!
//! # Custom dialects
//!
//! Dialects deserialize from YAML:
//!
//! ```yaml
//! name: codes-only
//! delimiter: ";"
//! file_name: codes.csv
//! columns:
//!   - header: Code
//!     field: productCode
//!   - header: Unit
//!     literal: Stk
//! ```
//!
//! Quoting dialects quote cells containing their own delimiter as well as
//! quotes, commas and line breaks.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::escape::Escaping;
use crate::record::Record;
use crate::serialize::{header_cell, write_line};
use crate::value::Scalar;

/// MIME type attached to CSV-family downloads.
pub const CSV_MIME: &str = "text/csv;charset=utf-8;";

/// MIME type attached to TSV downloads.
pub const TSV_MIME: &str = "text/tab-separated-values;charset=utf-8;";

/// Errors raised while loading or validating a dialect.
#[derive(Debug, Error)]
pub enum DialectError {
    #[error("Failed to read dialect file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid dialect YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid dialect: {0}")]
    Invalid(String),

    #[error("Unknown dialect '{0}'")]
    Unknown(String),
}

/// Where a column's cell value comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnSource {
    /// A nested sub-collection element's field.
    Nested { collection: String, field: String },
    /// A base field of the record.
    Field { field: String },
    /// The same literal text on every row.
    Literal { literal: String },
}

/// One output column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub header: String,
    #[serde(flatten)]
    pub source: ColumnSource,
}

impl Column {
    /// Column reading a base field.
    pub fn field(header: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            source: ColumnSource::Field {
                field: field.into(),
            },
        }
    }

    /// Column that always holds `text`.
    pub fn literal(header: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            source: ColumnSource::Literal {
                literal: text.into(),
            },
        }
    }

    /// Column reading `field` from elements of the `collection` sub-list.
    pub fn nested(
        header: impl Into<String>,
        collection: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self {
            header: header.into(),
            source: ColumnSource::Nested {
                collection: collection.into(),
                field: field.into(),
            },
        }
    }

    /// Returns the collection name for nested columns.
    pub fn collection(&self) -> Option<&str> {
        match &self.source {
            ColumnSource::Nested { collection, .. } => Some(collection.as_str()),
            _ => None,
        }
    }

    /// Reads this column's base value. Nested columns yield `Absent`.
    pub fn base_value<'a>(&'a self, record: &'a dyn Record) -> Scalar<'a> {
        match &self.source {
            ColumnSource::Field { field } => record.field(field),
            ColumnSource::Literal { literal } => Scalar::Text(literal),
            ColumnSource::Nested { .. } => Scalar::Absent,
        }
    }
}

/// How many rows a record expands into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowExpansion {
    /// Exactly one row per record; nested columns read the first element.
    #[default]
    Single,
    /// One row per index of the longest referenced sub-collection, base
    /// columns on the first row only.
    Nested,
}

/// A named tabular export format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dialect {
    pub name: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default)]
    pub escaping: Escaping,
    #[serde(default)]
    pub expansion: RowExpansion,
    pub columns: Vec<Column>,
    pub file_name: String,
    #[serde(default = "default_mime")]
    pub mime_type: String,
}

fn default_delimiter() -> char {
    ','
}

fn default_mime() -> String {
    CSV_MIME.to_string()
}

impl Dialect {
    pub const INVOICE_CSV: &'static str = "invoice-csv";
    pub const INVOICE_TSV: &'static str = "invoice-tsv";
    pub const ARTIKEL_CSV: &'static str = "artikel-csv";
    pub const PRODUCTS_CSV: &'static str = "products-csv";

    /// Creates a comma-delimited, quoted, single-row dialect.
    pub fn new(name: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            delimiter: default_delimiter(),
            escaping: Escaping::Quote,
            expansion: RowExpansion::Single,
            columns: Vec::new(),
            file_name: file_name.into(),
            mime_type: default_mime(),
        }
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn escaping(mut self, escaping: Escaping) -> Self {
        self.escaping = escaping;
        self
    }

    pub fn expansion(mut self, expansion: RowExpansion) -> Self {
        self.expansion = expansion;
        self
    }

    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    /// Plain CSV of invoice items.
    pub fn invoice_csv() -> Self {
        Self::new(Self::INVOICE_CSV, "extracted_invoice_data.csv")
            .column(Column::field("Product Code", "productCode"))
            .column(Column::field("Product Name", "productName"))
            .column(Column::field("Quantity", "quantity"))
            .column(Column::field("Unit Price", "unitPrice"))
    }

    /// Tab-separated invoice items. Cells are written unescaped.
    pub fn invoice_tsv() -> Self {
        let mut dialect = Self::invoice_csv()
            .delimiter('\t')
            .escaping(Escaping::Raw)
            .mime_type(TSV_MIME);
        dialect.name = Self::INVOICE_TSV.to_string();
        dialect.file_name = "extracted_invoice_data.tsv".to_string();
        dialect
    }

    /// Fixed-column article import format.
    pub fn artikel_csv() -> Self {
        Self::new(Self::ARTIKEL_CSV, "artikel_export.csv")
            .column(Column::field("Artikel-Code", "productCode"))
            .column(Column::field("Artikelname", "productName"))
            .column(Column::literal("Artikelgruppe", "Produkte"))
            .column(Column::literal("Standardmaßeinheit", "Stk"))
    }

    /// Enriched products, one row per specification/availability index.
    pub fn products_csv() -> Self {
        Self::new(Self::PRODUCTS_CSV, "enriched_products.csv")
            .expansion(RowExpansion::Nested)
            .column(Column::field("Original Product Name", "originalProductName"))
            .column(Column::field("Enriched Title", "title"))
            .column(Column::field("Description", "description"))
            .column(Column::field("Image URL", "imageUrl"))
            .column(Column::nested("Spec Key", "specifications", "key"))
            .column(Column::nested("Spec Value", "specifications", "value"))
            .column(Column::nested("Store", "availability", "store"))
            .column(Column::nested("Price", "availability", "price"))
            .column(Column::nested("In Stock", "availability", "inStock"))
            .column(Column::nested("URL", "availability", "url"))
    }

    /// All built-in dialects.
    pub fn builtins() -> Vec<Dialect> {
        vec![
            Self::invoice_csv(),
            Self::invoice_tsv(),
            Self::artikel_csv(),
            Self::products_csv(),
        ]
    }

    /// Looks up a built-in dialect by name.
    pub fn builtin(name: &str) -> Result<Dialect, DialectError> {
        match name {
            Self::INVOICE_CSV => Ok(Self::invoice_csv()),
            Self::INVOICE_TSV => Ok(Self::invoice_tsv()),
            Self::ARTIKEL_CSV => Ok(Self::artikel_csv()),
            Self::PRODUCTS_CSV => Ok(Self::products_csv()),
            other => Err(DialectError::Unknown(other.to_string())),
        }
    }

    /// Parses and validates a dialect from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Dialect, DialectError> {
        let dialect: Dialect = serde_yaml::from_str(yaml)?;
        dialect.validate()?;
        Ok(dialect)
    }

    /// Loads a dialect from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Dialect, DialectError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Checks the constraints serialization relies on.
    pub fn validate(&self) -> Result<(), DialectError> {
        if self.name.trim().is_empty() {
            return Err(DialectError::Invalid("name must not be empty".into()));
        }
        if self.file_name.trim().is_empty() {
            return Err(DialectError::Invalid(format!(
                "dialect '{}' has an empty file name",
                self.name
            )));
        }
        if self.columns.is_empty() {
            return Err(DialectError::Invalid(format!(
                "dialect '{}' declares no columns",
                self.name
            )));
        }
        if matches!(self.delimiter, '"' | '\n' | '\r') {
            return Err(DialectError::Invalid(format!(
                "dialect '{}' uses {:?} as delimiter",
                self.name, self.delimiter
            )));
        }
        Ok(())
    }

    /// Column headers in output order.
    pub fn header(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.header.as_str()).collect()
    }

    /// Number of cells on every emitted row.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Distinct sub-collections referenced by nested columns, in column order.
    pub fn collections(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for name in self.columns.iter().filter_map(Column::collection) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Formats the header line.
    pub fn header_line(&self) -> String {
        let mut line = String::new();
        write_line(
            &mut line,
            self.columns
                .iter()
                .map(|c| header_cell(&c.header, self.escaping, self.delimiter)),
            self,
        );
        line
    }
}
