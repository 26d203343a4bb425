//! Deputy QUERY body model
//!
//! Deputy's `/QUERY` resource calls accept a rich search language; only the
//! minimal predicate subset this tool uses is modeled. The wire shape is
//! fixed by the vendor and reproduced exactly:
//!
//! ```json
//! {
//!     "search": {"f1": {"field": "Id", "type": "is", "data": ""}},
//!     "sort": {"LastName": "asc"},
//!     "join": ["ContactObject"],
//!     "start": 0
//! }
//! ```

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Predicate comparison type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    /// Vendor convention: `is` with empty data selects every record
    Is,
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

/// One search predicate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Predicate {
    pub field: String,
    #[serde(rename = "type")]
    pub comparison: Comparison,
    pub data: Value,
}

impl Predicate {
    pub fn new(field: impl Into<String>, comparison: Comparison, data: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            comparison,
            data: data.into(),
        }
    }

    /// The predicate name used as its key in the `search` mapping.
    ///
    /// Derived from field + value so that several predicates on the same
    /// field (e.g. a `Date ge` / `Date le` window) don't collide.
    pub fn name(&self) -> String {
        let data = match &self.data {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        format!("{}_{}", self.field, data)
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// The vendor encodes sort as a single-entry object `{field: direction}`
#[derive(Debug, Clone, PartialEq)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Serialize for Sort {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.field, &self.direction)?;
        map.end()
    }
}

/// One windowed resource query
///
/// Built fresh for every page request. The baseline `f1` predicate
/// (`{keyField, is, ""}`) selects all records per vendor convention;
/// caller-supplied predicates narrow the selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceQuery {
    predicates: Vec<(String, Predicate)>,
    sort: Sort,
    joins: Vec<String>,
    start: usize,
}

impl ResourceQuery {
    /// Create a query with the baseline select-all predicate on `key_field`,
    /// sorted ascending by `sort_field`.
    pub fn new(key_field: &str, sort_field: &str) -> Self {
        let baseline = Predicate::new(key_field, Comparison::Is, "");
        Self {
            predicates: vec![("f1".to_string(), baseline)],
            sort: Sort {
                field: sort_field.to_string(),
                direction: SortDirection::Asc,
            },
            joins: Vec::new(),
            start: 0,
        }
    }

    /// Add a search predicate, keyed by its derived name. Predicate names
    /// must be unique; a duplicate name replaces the earlier entry.
    pub fn push_predicate(&mut self, predicate: Predicate) {
        let name = predicate.name();
        if let Some(slot) = self.predicates.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = predicate;
        } else {
            self.predicates.push((name, predicate));
        }
    }

    /// Set the related objects to embed inline in returned records
    pub fn set_joins(&mut self, joins: &[&str]) {
        self.joins = joins.iter().map(|j| (*j).to_string()).collect();
    }

    /// Set the window offset
    pub fn set_start(&mut self, start: usize) {
        self.start = start;
    }

    /// The current window offset
    pub fn start(&self) -> usize {
        self.start
    }
}

impl Serialize for ResourceQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Search<'a>(&'a [(String, Predicate)]);

        impl Serialize for Search<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.0.len()))?;
                for (name, predicate) in self.0 {
                    map.serialize_entry(name, predicate)?;
                }
                map.end()
            }
        }

        let mut body = serializer.serialize_struct("ResourceQuery", 4)?;
        body.serialize_field("search", &Search(&self.predicates))?;
        body.serialize_field("sort", &self.sort)?;
        body.serialize_field("join", &self.joins)?;
        body.serialize_field("start", &self.start)?;
        body.end()
    }
}
