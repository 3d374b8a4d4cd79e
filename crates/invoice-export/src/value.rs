//! Runtime scalar values for exported cells.
//!
//! The [`Scalar`] enum is what a [`Record`](crate::Record) hands out for a
//! named field. Every scalar has exactly one text form, so projecting a value
//! into a cell can never fail.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Runtime value of a field, borrowed from the source record.
///
/// # Example
///
/// ```
/// use invoice_export::{Number, Scalar};
///
/// assert_eq!(Scalar::Text("A1").to_text(), "A1");
/// assert_eq!(Scalar::Number(Number::F64(9.5)).to_text(), "9.5");
/// assert_eq!(Scalar::Bool(true).to_text(), "true");
/// assert_eq!(Scalar::Absent.to_text(), "");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    /// String value (borrowed).
    Text(&'a str),
    /// Numeric value.
    Number(Number),
    /// Boolean value.
    Bool(bool),
    /// Field not present or null.
    Absent,
}

impl<'a> Scalar<'a> {
    /// Returns `true` if this is an `Absent` value.
    pub fn is_absent(&self) -> bool {
        matches!(self, Scalar::Absent)
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Projects the value to its cell text.
    ///
    /// Text is borrowed as-is; numbers and booleans are formatted. Absent
    /// values project to the empty string.
    pub fn to_text(&self) -> Cow<'a, str> {
        match self {
            Scalar::Text(s) => Cow::Borrowed(*s),
            Scalar::Number(n) => Cow::Owned(n.to_string()),
            Scalar::Bool(true) => Cow::Borrowed("true"),
            Scalar::Bool(false) => Cow::Borrowed("false"),
            Scalar::Absent => Cow::Borrowed(""),
        }
    }
}

impl<'a> From<&'a str> for Scalar<'a> {
    fn from(s: &'a str) -> Self {
        Scalar::Text(s)
    }
}

impl<'a> From<&'a String> for Scalar<'a> {
    fn from(s: &'a String) -> Self {
        Scalar::Text(s)
    }
}

impl From<bool> for Scalar<'_> {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl<'a, T> From<Option<T>> for Scalar<'a>
where
    T: Into<Scalar<'a>>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Scalar::Absent)
    }
}

macro_rules! scalar_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Scalar<'_> {
                fn from(n: $t) -> Self {
                    Scalar::Number(Number::from(n))
                }
            }
        )*
    };
}

scalar_from_number!(i32, i64, u32, u64, usize, f32, f64);

/// Numeric value, kept in its original family so integers never pick up a
/// fractional part on output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl fmt::Display for Number {
    /// Integral floats print without a fraction (`2.0` → `2`), negative zero
    /// prints as `0` and infinities as `Infinity`/`-Infinity`. Magnitudes of
    /// at least `1e21` or below `1e-6` use exponent form with an explicit
    /// sign on positive exponents (`1e+21`, `1.5e-7`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Number::I64(n) => write!(f, "{}", n),
            Number::U64(n) => write!(f, "{}", n),
            Number::F64(n) if n.is_nan() => f.write_str("NaN"),
            Number::F64(n) if n.is_infinite() => {
                f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Number::F64(n) if n == 0.0 => f.write_str("0"),
            Number::F64(n) if n.abs() >= 1e21 || n.abs() < 1e-6 => write_exponent(f, n),
            Number::F64(n) => write!(f, "{}", n),
        }
    }
}

fn write_exponent(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    let sci = format!("{:e}", n);
    match sci.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => write!(f, "{}e+{}", mantissa, exp),
        _ => f.write_str(&sci),
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Number::I64(n as i64)
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::I64(n)
    }
}

impl From<u32> for Number {
    fn from(n: u32) -> Self {
        Number::U64(n as u64)
    }
}

impl From<u64> for Number {
    fn from(n: u64) -> Self {
        Number::U64(n)
    }
}

impl From<usize> for Number {
    fn from(n: usize) -> Self {
        Number::U64(n as u64)
    }
}

impl From<f32> for Number {
    fn from(n: f32) -> Self {
        Number::F64(n as f64)
    }
}

impl From<f64> for Number {
    fn from(n: f64) -> Self {
        Number::F64(n)
    }
}

/// Owned counterpart of [`Scalar`], used by the dynamic record types.
///
/// Deserializes from any JSON scalar; `null` becomes [`OwnedScalar::Absent`].
/// JSON integers land in [`Number::I64`] unless they only fit in `u64`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OwnedScalar {
    Bool(bool),
    Number(Number),
    Text(String),
    #[default]
    Absent,
}

impl OwnedScalar {
    /// Borrows this value as a [`Scalar`].
    pub fn as_scalar(&self) -> Scalar<'_> {
        match self {
            OwnedScalar::Text(s) => Scalar::Text(s),
            OwnedScalar::Number(n) => Scalar::Number(*n),
            OwnedScalar::Bool(b) => Scalar::Bool(*b),
            OwnedScalar::Absent => Scalar::Absent,
        }
    }
}

impl From<Scalar<'_>> for OwnedScalar {
    fn from(value: Scalar<'_>) -> Self {
        match value {
            Scalar::Text(s) => OwnedScalar::Text(s.to_string()),
            Scalar::Number(n) => OwnedScalar::Number(n),
            Scalar::Bool(b) => OwnedScalar::Bool(b),
            Scalar::Absent => OwnedScalar::Absent,
        }
    }
}

impl From<&str> for OwnedScalar {
    fn from(s: &str) -> Self {
        OwnedScalar::Text(s.to_string())
    }
}

impl From<String> for OwnedScalar {
    fn from(s: String) -> Self {
        OwnedScalar::Text(s)
    }
}

impl From<bool> for OwnedScalar {
    fn from(b: bool) -> Self {
        OwnedScalar::Bool(b)
    }
}

impl From<i64> for OwnedScalar {
    fn from(n: i64) -> Self {
        OwnedScalar::Number(Number::I64(n))
    }
}

impl From<f64> for OwnedScalar {
    fn from(n: f64) -> Self {
        OwnedScalar::Number(Number::F64(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_projection() {
        assert_eq!(Scalar::Text("Widget").to_text(), "Widget");
        assert_eq!(Scalar::Bool(false).to_text(), "false");
        assert_eq!(Scalar::Absent.to_text(), "");
    }

    #[test]
    fn integers_print_in_decimal() {
        assert_eq!(Number::I64(-42).to_string(), "-42");
        assert_eq!(Number::U64(7).to_string(), "7");
    }

    #[test]
    fn floats_print_in_natural_form() {
        assert_eq!(Number::F64(9.5).to_string(), "9.5");
        assert_eq!(Number::F64(2.0).to_string(), "2");
        assert_eq!(Number::F64(0.1).to_string(), "0.1");
        assert_eq!(Number::F64(-0.0).to_string(), "0");
    }

    #[test]
    fn extreme_floats_use_exponent_form() {
        assert_eq!(Number::F64(1e21).to_string(), "1e+21");
        assert_eq!(Number::F64(-2.5e25).to_string(), "-2.5e+25");
        assert_eq!(Number::F64(1e-7).to_string(), "1e-7");
        assert_eq!(Number::F64(1.5e-7).to_string(), "1.5e-7");
        assert_eq!(Number::F64(1e20).to_string(), "100000000000000000000");
        assert_eq!(Number::F64(0.000001).to_string(), "0.000001");
    }

    #[test]
    fn non_finite_floats() {
        assert_eq!(Number::F64(f64::NAN).to_string(), "NaN");
        assert_eq!(Number::F64(f64::INFINITY).to_string(), "Infinity");
        assert_eq!(Number::F64(f64::NEG_INFINITY).to_string(), "-Infinity");
    }

    #[test]
    fn option_converts_to_absent() {
        let none: Option<&str> = None;
        assert_eq!(Scalar::from(none), Scalar::Absent);
        assert_eq!(Scalar::from(Some(3i64)), Scalar::Number(Number::I64(3)));
    }

    #[test]
    fn owned_scalar_from_json() {
        let values: Vec<OwnedScalar> =
            serde_json::from_str(r#"["x", 2, 9.5, true, null, -3]"#).unwrap();
        assert_eq!(
            values,
            vec![
                OwnedScalar::Text("x".into()),
                OwnedScalar::Number(Number::I64(2)),
                OwnedScalar::Number(Number::F64(9.5)),
                OwnedScalar::Bool(true),
                OwnedScalar::Absent,
                OwnedScalar::Number(Number::I64(-3)),
            ]
        );
    }

    #[test]
    fn owned_scalar_borrows_back() {
        let owned = OwnedScalar::from("abc");
        assert_eq!(owned.as_scalar(), Scalar::Text("abc"));
        assert_eq!(OwnedScalar::from(Scalar::Bool(true)), OwnedScalar::Bool(true));
    }
}
