//! Record access for export.
//!
//! This module provides the [`Record`] trait through which the flattener
//! reads field values and nested sub-collections, plus two dynamic
//! implementations ([`FlatRecord`], [`NestedRecord`]) for data that arrives
//! as JSON rather than as typed structs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::value::{Number, OwnedScalar, Scalar};

/// Trait for types that can be exported through a [`Dialect`](crate::Dialect).
///
/// # Manual Implementation
///
/// ```
/// use invoice_export::{Record, Scalar};
///
/// struct Line {
///     code: String,
///     qty: u32,
/// }
///
/// impl Record for Line {
///     fn field(&self, name: &str) -> Scalar<'_> {
///         match name {
///             "code" => Scalar::Text(&self.code),
///             "qty" => self.qty.into(),
///             _ => Scalar::Absent,
///         }
///     }
/// }
/// ```
pub trait Record {
    /// Returns the value of a base field, or [`Scalar::Absent`] when the
    /// record has no such field.
    fn field(&self, name: &str) -> Scalar<'_>;

    /// Returns the elements of a named one-to-many sub-collection.
    ///
    /// Records without sub-collections keep the default, which reports every
    /// collection as empty.
    fn collection(&self, _name: &str) -> Vec<&dyn Record> {
        Vec::new()
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn field(&self, name: &str) -> Scalar<'_> {
        (**self).field(name)
    }

    fn collection(&self, name: &str) -> Vec<&dyn Record> {
        (**self).collection(name)
    }
}

/// A single-level field-to-value mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "BTreeMap<String, OwnedScalar>")]
pub struct FlatRecord {
    fields: BTreeMap<String, OwnedScalar>,
}

impl FlatRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<OwnedScalar>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<OwnedScalar>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&OwnedScalar> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OwnedScalar)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Record for FlatRecord {
    fn field(&self, name: &str) -> Scalar<'_> {
        self.fields
            .get(name)
            .map(OwnedScalar::as_scalar)
            .unwrap_or(Scalar::Absent)
    }
}

impl From<Map<String, Value>> for FlatRecord {
    /// Keeps scalar members; arrays and nested objects are dropped.
    fn from(map: Map<String, Value>) -> Self {
        let fields = map
            .into_iter()
            .filter_map(|(k, v)| json_scalar(v).map(|s| (k, s)))
            .collect();
        Self { fields }
    }
}

impl From<FlatRecord> for BTreeMap<String, OwnedScalar> {
    fn from(record: FlatRecord) -> Self {
        record.fields
    }
}

/// A [`FlatRecord`] plus named, ordered sub-collections.
///
/// Deserializes from a JSON object: scalar members become base fields and
/// arrays of objects become sub-collections.
///
/// ```
/// use invoice_export::{NestedRecord, Record, Scalar};
///
/// let product: NestedRecord = serde_json::from_str(
///     r#"{"title": "Kettle", "specifications": [{"key": "Volume", "value": "1.7 l"}]}"#,
/// ).unwrap();
///
/// assert_eq!(product.field("title"), Scalar::Text("Kettle"));
/// assert_eq!(product.collection("specifications").len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct NestedRecord {
    #[serde(flatten)]
    base: FlatRecord,
    #[serde(flatten)]
    collections: BTreeMap<String, Vec<FlatRecord>>,
}

impl NestedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a base field, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<OwnedScalar>) -> Self {
        self.base.insert(name, value);
        self
    }

    /// Replaces a sub-collection, builder style.
    pub fn with_collection(mut self, name: impl Into<String>, items: Vec<FlatRecord>) -> Self {
        self.collections.insert(name.into(), items);
        self
    }

    /// Appends one element to a sub-collection, creating it if needed.
    pub fn push(&mut self, collection: impl Into<String>, item: FlatRecord) {
        self.collections
            .entry(collection.into())
            .or_default()
            .push(item);
    }

    pub fn base(&self) -> &FlatRecord {
        &self.base
    }

    /// Names of the sub-collections this record carries.
    pub fn collection_names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }
}

impl Record for NestedRecord {
    fn field(&self, name: &str) -> Scalar<'_> {
        self.base.field(name)
    }

    fn collection(&self, name: &str) -> Vec<&dyn Record> {
        self.collections
            .get(name)
            .map(|items| items.iter().map(|r| r as &dyn Record).collect())
            .unwrap_or_default()
    }
}

impl From<FlatRecord> for NestedRecord {
    fn from(base: FlatRecord) -> Self {
        Self {
            base,
            collections: BTreeMap::new(),
        }
    }
}

impl From<Map<String, Value>> for NestedRecord {
    fn from(map: Map<String, Value>) -> Self {
        let mut record = NestedRecord::new();
        for (key, value) in map {
            match value {
                Value::Array(items) if items.iter().all(Value::is_object) => {
                    let items = items
                        .into_iter()
                        .filter_map(|item| match item {
                            Value::Object(obj) => Some(FlatRecord::from(obj)),
                            _ => None,
                        })
                        .collect();
                    record.collections.insert(key, items);
                }
                other => {
                    if let Some(scalar) = json_scalar(other) {
                        record.base.fields.insert(key, scalar);
                    }
                }
            }
        }
        record
    }
}

/// Converts a JSON scalar; arrays and objects have no scalar form.
fn json_scalar(value: Value) -> Option<OwnedScalar> {
    match value {
        Value::Null => Some(OwnedScalar::Absent),
        Value::Bool(b) => Some(OwnedScalar::Bool(b)),
        Value::Number(n) => {
            let number = if let Some(i) = n.as_i64() {
                Number::I64(i)
            } else if let Some(u) = n.as_u64() {
                Number::U64(u)
            } else {
                Number::F64(n.as_f64().unwrap_or(f64::NAN))
            };
            Some(OwnedScalar::Number(number))
        }
        Value::String(s) => Some(OwnedScalar::Text(s)),
        Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn flat_record_reads_fields() {
        let record = FlatRecord::new()
            .with("productCode", "A1")
            .with("quantity", 2i64);
        assert_eq!(record.field("productCode"), Scalar::Text("A1"));
        assert_eq!(record.field("quantity"), Scalar::Number(Number::I64(2)));
        assert_eq!(record.field("missing"), Scalar::Absent);
    }

    #[test]
    fn flat_record_has_no_collections() {
        let record = FlatRecord::new().with("a", "b");
        assert!(record.collection("anything").is_empty());
    }

    #[test]
    fn flat_record_from_json_drops_structures() {
        let record = FlatRecord::from(object(json!({
            "name": "Widget",
            "price": 9.5,
            "note": null,
            "tags": ["a", "b"],
            "meta": {"x": 1}
        })));
        assert_eq!(record.len(), 3);
        assert_eq!(record.field("price"), Scalar::Number(Number::F64(9.5)));
        assert_eq!(record.get("note"), Some(&OwnedScalar::Absent));
        assert!(record.get("tags").is_none());
    }

    #[test]
    fn nested_record_from_json_splits_collections() {
        let record = NestedRecord::from(object(json!({
            "title": "Kettle",
            "specifications": [{"key": "Volume"}, {"key": "Power"}],
            "availability": [],
            "keywords": ["steel", "kitchen"]
        })));
        assert_eq!(record.field("title"), Scalar::Text("Kettle"));
        assert_eq!(record.collection("specifications").len(), 2);
        assert!(record.collection("availability").is_empty());
        assert!(record.collection("keywords").is_empty());
        assert_eq!(
            record.collection_names().collect::<Vec<_>>(),
            vec!["availability", "specifications"]
        );
    }

    #[test]
    fn nested_record_builder() {
        let mut record = NestedRecord::new().with("title", "Lamp");
        record.push("specifications", FlatRecord::new().with("key", "Color"));
        record.push("specifications", FlatRecord::new().with("key", "Height"));
        let specs = record.collection("specifications");
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[1].field("key"), Scalar::Text("Height"));
    }

    #[test]
    fn deserializes_through_serde() {
        let records: Vec<NestedRecord> = serde_json::from_str(
            r#"[{"title": "A", "availability": [{"store": "S1", "inStock": true}]}]"#,
        )
        .unwrap();
        let avail = records[0].collection("availability");
        assert_eq!(avail[0].field("inStock"), Scalar::Bool(true));
    }

    #[test]
    fn reference_forwards_record() {
        let record = FlatRecord::new().with("a", "b");
        let by_ref: &FlatRecord = &record;
        assert_eq!(Record::field(&by_ref, "a"), Scalar::Text("b"));
    }
}
