//! Cell escaping for delimited text.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::value::Scalar;

/// How a dialect protects cell text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Escaping {
    /// CSV quoting: cells containing `"`, `,`, LF or CR are wrapped in quotes
    /// with inner quotes doubled.
    #[default]
    Quote,
    /// Cells are written verbatim.
    Raw,
}

impl Escaping {
    /// Applies this policy to a scalar written between `delimiter`s.
    pub fn apply<'a>(self, value: &Scalar<'a>, delimiter: char) -> Cow<'a, str> {
        match self {
            Escaping::Quote => escape_for(value, delimiter),
            Escaping::Raw => value.to_text(),
        }
    }
}

/// Escapes a scalar for a comma-delimited CSV cell.
///
/// ```
/// use invoice_export::{escape, Scalar};
///
/// assert_eq!(escape(&Scalar::Text("Widget")), "Widget");
/// assert_eq!(escape(&Scalar::Text(r#"Widget, "Pro""#)), r#""Widget, ""Pro""""#);
/// assert_eq!(escape(&Scalar::Absent), "");
/// ```
pub fn escape<'a>(value: &Scalar<'a>) -> Cow<'a, str> {
    escape_for(value, ',')
}

/// Escapes a scalar for a cell of a table delimited by `delimiter`.
pub fn escape_for<'a>(value: &Scalar<'a>, delimiter: char) -> Cow<'a, str> {
    match value.to_text() {
        Cow::Borrowed(s) => quote_for(s, delimiter),
        Cow::Owned(s) => match quote_for(&s, delimiter) {
            Cow::Borrowed(_) => Cow::Owned(s),
            Cow::Owned(quoted) => Cow::Owned(quoted),
        },
    }
}

/// Escapes raw cell text for a comma-delimited table; text without special
/// characters is borrowed back.
pub fn escape_str(text: &str) -> Cow<'_, str> {
    quote_for(text, ',')
}

/// Escapes raw cell text for a table delimited by `delimiter`.
pub fn quote_for(text: &str, delimiter: char) -> Cow<'_, str> {
    if !needs_quoting_for(text, delimiter) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
    Cow::Owned(out)
}

/// Returns `true` when the text has to be quoted in a comma-delimited cell.
pub fn needs_quoting(text: &str) -> bool {
    needs_quoting_for(text, ',')
}

/// Returns `true` when the text has to be quoted in a cell delimited by
/// `delimiter`. Quotes, commas and line breaks always force quoting.
pub fn needs_quoting_for(text: &str, delimiter: char) -> bool {
    text.contains(['"', ',', '\n', '\r', delimiter])
}

/// Reverses [`escape_str`] for one cell.
///
/// A cell that is not wrapped in quotes is returned unchanged.
pub fn unescape(cell: &str) -> Cow<'_, str> {
    match cell
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
    {
        Some(inner) if inner.contains('"') => Cow::Owned(inner.replace("\"\"", "\"")),
        Some(inner) => Cow::Borrowed(inner),
        None => Cow::Borrowed(cell),
    }
}
