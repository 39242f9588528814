//! Case- and format-insensitive records.
//!
//! A [`Record`] stores every key in its canonical form (see [`normalize_key`]) and converts
//! nested mappings into records on construction, so `record["OrderID"]`,
//! `record["orderId"]` and `record["order_id"]` all reach the same value at any depth.

use std::ops::Index;

use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};

use crate::key::normalize_key;
use crate::value::{Mapping, NULL, Value};

/// Read-only mapping from canonical keys to values.
///
/// # Examples
///
/// ```
/// use rustbay_xml::{Record, Value};
///
/// let record = Record::from_iter([("Foo", "Bar")]);
/// assert_eq!(record["foo"], Value::from("Bar"));
/// assert_eq!(record["Foo"], Value::from("Bar"));
/// assert!(record.has("FOO"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    entries: Mapping,
}

impl Record {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical form of a lookup key.
    #[must_use]
    pub fn convert_key(key: &str) -> String {
        normalize_key(key)
    }

    /// Convert a value for storage: mappings become records, sequences are converted
    /// element-wise, everything else is kept.
    #[must_use]
    pub fn convert_value(value: Value) -> Value {
        match value {
            Value::Mapping(mapping) => Value::Record(Self::from(mapping)),
            Value::Sequence(items) => {
                Value::Sequence(items.into_iter().map(Self::convert_value).collect())
            }
            other => other,
        }
    }

    fn assign(&mut self, key: &str, value: Value) {
        self.entries
            .insert(Self::convert_key(key), Self::convert_value(value));
    }

    /// Look up a value by any casing variant of its key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(&Self::convert_key(key))
    }

    /// Returns `true` if a value is stored under the canonical form of `key`.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// One-directional subset comparison.
    ///
    /// Returns `true` when `other` is a mapping or record and every one of its entries,
    /// converted as on construction, equals the value this record holds under the same
    /// key. Entries of `self` that `other` does not mention are ignored. This is not an
    /// equality or ordering relation.
    #[must_use]
    pub fn subset_match(&self, other: &Value) -> bool {
        let Some(entries) = other.as_entries() else {
            return false;
        };
        entries
            .iter()
            .all(|(key, value)| self[key.as_str()] == Self::convert_value(value.clone()))
    }

    /// Canonical keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys()
    }

    /// Values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.values()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.entries.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the record has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The underlying canonical-keyed mapping.
    #[must_use]
    pub fn as_mapping(&self) -> &Mapping {
        &self.entries
    }

    /// Deserialize the record into a typed structure.
    ///
    /// Field names are matched against the canonical keys, so plain snake_case struct
    /// fields line up without renaming.
    pub fn to_struct<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::to_value(self).and_then(serde_json::from_value)
    }
}

impl From<Mapping> for Record {
    fn from(mapping: Mapping) -> Self {
        let mut record = Self::new();
        for (key, value) in mapping {
            record.assign(&key, value);
        }
        record
    }
}

impl<K: AsRef<str>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (key, value) in iter {
            record.assign(key.as_ref(), value.into());
        }
        record
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Index<&str> for Record {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        self.get(key).unwrap_or(&NULL)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}
