//! Vendor record and record-set types
//!
//! Deputy returns resource records as JSON objects whose fields vary by
//! resource. Rather than passing raw JSON maps around, records are wrapped in
//! [`ResourceRecord`] with capability-checked accessors so that a missing or
//! mistyped field surfaces as a [`RecordError`] at the boundary instead of a
//! panic deep in report logic. [`ResourceSet`] is the insertion-ordered,
//! unique-key collection that paginated fetches merge into.

use crate::domain::errors::RecordError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// The value of a record's designated key field
///
/// Most fetches key by the numeric `Id` field; the email-indexed employee
/// views key by the nested contact email instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordKey {
    /// Numeric key, e.g. `Id` or `Employee`
    Id(i64),
    /// String key, e.g. an email address
    Text(String),
}

impl RecordKey {
    /// Extract a key from a raw JSON field value
    pub fn from_value(field: &str, value: &Value, context: &str) -> Result<Self, RecordError> {
        match value {
            Value::Number(n) => n.as_i64().map(RecordKey::Id).ok_or(RecordError::WrongType {
                field: field.to_string(),
                expected: "integer",
                context: context.to_string(),
            }),
            Value::String(s) => Ok(RecordKey::Text(s.clone())),
            _ => Err(RecordError::WrongType {
                field: field.to_string(),
                expected: "integer or string",
                context: context.to_string(),
            }),
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKey::Id(id) => write!(f, "{id}"),
            RecordKey::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for RecordKey {
    fn from(id: i64) -> Self {
        RecordKey::Id(id)
    }
}

impl From<&str> for RecordKey {
    fn from(s: &str) -> Self {
        RecordKey::Text(s.to_string())
    }
}

impl From<String> for RecordKey {
    fn from(s: String) -> Self {
        RecordKey::Text(s)
    }
}

/// One structured record returned by the vendor
///
/// The fetch layer never interprets fields beyond extracting the designated
/// key; consumers pull out the fields they need through the typed accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceRecord(serde_json::Map<String, Value>);

impl ResourceRecord {
    /// Wrap a raw JSON object
    pub fn new(fields: serde_json::Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Raw access to a field, if present
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// The underlying JSON object
    pub fn as_json(&self) -> &serde_json::Map<String, Value> {
        &self.0
    }

    /// Extract the designated key field as a [`RecordKey`]
    pub fn key_value(&self, field: &str, context: &str) -> Result<RecordKey, RecordError> {
        let value = self.0.get(field).ok_or_else(|| RecordError::MissingField {
            field: field.to_string(),
            context: context.to_string(),
        })?;
        RecordKey::from_value(field, value, context)
    }

    /// A required string field
    pub fn str_field(&self, name: &str, context: &str) -> Result<&str, RecordError> {
        match self.0.get(name) {
            Some(Value::String(s)) => Ok(s),
            Some(_) => Err(RecordError::WrongType {
                field: name.to_string(),
                expected: "string",
                context: context.to_string(),
            }),
            None => Err(RecordError::MissingField {
                field: name.to_string(),
                context: context.to_string(),
            }),
        }
    }

    /// A required integer field
    pub fn int_field(&self, name: &str, context: &str) -> Result<i64, RecordError> {
        match self.0.get(name) {
            Some(Value::Number(n)) => n.as_i64().ok_or(RecordError::WrongType {
                field: name.to_string(),
                expected: "integer",
                context: context.to_string(),
            }),
            Some(_) => Err(RecordError::WrongType {
                field: name.to_string(),
                expected: "integer",
                context: context.to_string(),
            }),
            None => Err(RecordError::MissingField {
                field: name.to_string(),
                context: context.to_string(),
            }),
        }
    }

    /// A required boolean field. Deputy encodes some flags as 0/1, so
    /// integers are accepted and coerced.
    pub fn bool_field(&self, name: &str, context: &str) -> Result<bool, RecordError> {
        match self.0.get(name) {
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::Number(n)) => Ok(n.as_i64().unwrap_or(0) != 0),
            Some(_) => Err(RecordError::WrongType {
                field: name.to_string(),
                expected: "boolean",
                context: context.to_string(),
            }),
            None => Err(RecordError::MissingField {
                field: name.to_string(),
                context: context.to_string(),
            }),
        }
    }

    /// A required string field inside a joined object, e.g.
    /// `ContactObject.Email` or `OperationalUnitObject.CompanyName`
    pub fn nested_str(&self, object: &str, name: &str, context: &str) -> Result<&str, RecordError> {
        match self.0.get(object) {
            Some(Value::Object(inner)) => match inner.get(name) {
                Some(Value::String(s)) => Ok(s),
                Some(_) => Err(RecordError::WrongType {
                    field: format!("{object}.{name}"),
                    expected: "string",
                    context: context.to_string(),
                }),
                None => Err(RecordError::MissingField {
                    field: format!("{object}.{name}"),
                    context: context.to_string(),
                }),
            },
            Some(_) => Err(RecordError::WrongType {
                field: object.to_string(),
                expected: "object",
                context: context.to_string(),
            }),
            None => Err(RecordError::MissingField {
                field: object.to_string(),
                context: context.to_string(),
            }),
        }
    }
}

/// An ordered mapping from key value to [`ResourceRecord`]
///
/// Keys are unique; re-inserting an existing key replaces the record but
/// keeps its original position (last write wins). Iteration order is
/// insertion order, which equals the vendor's declared sort order because
/// each page is appended after the previous.
#[derive(Debug, Clone, Default)]
pub struct ResourceSet {
    order: Vec<RecordKey>,
    records: HashMap<RecordKey, ResourceRecord>,
}

impl ResourceSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record under `key`. Returns the previous record if the key
    /// was already present.
    pub fn insert(&mut self, key: RecordKey, record: ResourceRecord) -> Option<ResourceRecord> {
        let previous = self.records.insert(key.clone(), record);
        if previous.is_none() {
            self.order.push(key);
        }
        previous
    }

    /// Look up a record by key
    pub fn get(&self, key: &RecordKey) -> Option<&ResourceRecord> {
        self.records.get(key)
    }

    /// Whether `key` has been inserted
    pub fn contains_key(&self, key: &RecordKey) -> bool {
        self.records.contains_key(key)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate `(key, record)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&RecordKey, &ResourceRecord)> {
        self.order.iter().map(move |k| (k, &self.records[k]))
    }

    /// Iterate keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &RecordKey> {
        self.order.iter()
    }

    /// Iterate records in insertion order
    pub fn values(&self) -> impl Iterator<Item = &ResourceRecord> {
        self.order.iter().map(move |k| &self.records[k])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> ResourceRecord {
        match value {
            Value::Object(map) => ResourceRecord::new(map),
            _ => panic!("test records must be objects"),
        }
    }

    #[test]
    fn test_key_value_integer() {
        let r = record(json!({"Id": 42, "LastName": "Citizen"}));
        assert_eq!(r.key_value("Id", "Employee").unwrap(), RecordKey::Id(42));
    }

    #[test]
    fn test_key_value_missing() {
        let r = record(json!({"LastName": "Citizen"}));
        let err = r.key_value("Id", "Employee").unwrap_err();
        assert!(matches!(err, RecordError::MissingField { .. }));
    }

    #[test]
    fn test_nested_str() {
        let r = record(json!({"Id": 1, "ContactObject": {"Email": "jo@example.edu"}}));
        assert_eq!(
            r.nested_str("ContactObject", "Email", "Employee").unwrap(),
            "jo@example.edu"
        );
    }

    #[test]
    fn test_nested_str_missing_object() {
        let r = record(json!({"Id": 1}));
        let err = r.nested_str("ContactObject", "Email", "Employee").unwrap_err();
        assert!(err.to_string().contains("ContactObject"));
    }

    #[test]
    fn test_bool_field_coerces_integer_flags() {
        let r = record(json!({"Open": 1, "TimeApproved": true}));
        assert!(r.bool_field("Open", "Roster").unwrap());
        assert!(r.bool_field("TimeApproved", "Roster").unwrap());
    }

    #[test]
    fn test_resource_set_insertion_order() {
        let mut set = ResourceSet::new();
        set.insert(RecordKey::Id(3), record(json!({"Id": 3})));
        set.insert(RecordKey::Id(1), record(json!({"Id": 1})));
        set.insert(RecordKey::Id(2), record(json!({"Id": 2})));

        let keys: Vec<_> = set.keys().cloned().collect();
        assert_eq!(keys, vec![RecordKey::Id(3), RecordKey::Id(1), RecordKey::Id(2)]);
    }

    #[test]
    fn test_resource_set_last_write_wins_keeps_position() {
        let mut set = ResourceSet::new();
        set.insert("a".into(), record(json!({"v": 1})));
        set.insert("b".into(), record(json!({"v": 2})));
        let previous = set.insert("a".into(), record(json!({"v": 3})));

        assert!(previous.is_some());
        assert_eq!(set.len(), 2);
        let keys: Vec<_> = set.keys().cloned().collect();
        assert_eq!(keys, vec![RecordKey::from("a"), RecordKey::from("b")]);
        assert_eq!(
            set.get(&"a".into()).unwrap().field("v"),
            Some(&json!(3))
        );
    }
}
