//! The structured value tree exchanged with the XML encoder and decoder.
//!
//! [`Value`] is a tagged union over scalars, sequences, raw-keyed [`Mapping`]s and
//! canonical-keyed [`Record`]s. The decoder produces raw [`Mapping`]s; callers normally see
//! them wrapped in a [`Record`].

use std::ops::Index;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::record::Record;
use crate::serialize::format_timestamp;

/// Reserved mapping key holding an element's attributes after decoding.
pub const ATTRIBUTES_KEY: &str = "attributes";

/// Reserved mapping key holding an attributed element's text after decoding, and the
/// element content when encoding an attributed value.
pub const VALUE_KEY: &str = "value";

/// Reserved mapping key holding the attributes of an attributed value when encoding.
pub const ATTR_KEY: &str = "attr";

pub(crate) static NULL: Value = Value::Null;

/// A decoded or caller-composed value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent value. Returned by index lookups that miss.
    #[default]
    Null,
    /// Text content.
    Text(String),
    /// Integer, produced by coercion or supplied by the caller.
    Integer(i64),
    /// Floating-point number.
    Float(f64),
    /// Boolean, rendered as `true`/`false`.
    Boolean(bool),
    /// UTC timestamp, rendered as ISO 8601 with a `Z` suffix.
    Timestamp(DateTime<Utc>),
    /// Ordered sequence of values.
    Sequence(Vec<Value>),
    /// Insertion-ordered mapping with wire-cased keys.
    Mapping(Mapping),
    /// Insertion-ordered mapping with canonical keys.
    Record(Record),
}

impl Value {
    /// Build the attributed shape the encoder renders as `<key name="v">value</key>`.
    ///
    /// ```
    /// use rustbay_xml::{Value, encode_value, mapping};
    ///
    /// let amount = Value::attributed("9.99", mapping! { "currencyID" => "USD" });
    /// let xml = encode_value(&Value::from(mapping! { "Amount" => amount })).unwrap();
    /// assert_eq!(xml, r#"<Amount currencyID="USD">9.99</Amount>"#);
    /// ```
    pub fn attributed(value: impl Into<Value>, attributes: Mapping) -> Self {
        let mut mapping = Mapping::new();
        mapping.insert(VALUE_KEY, value);
        mapping.insert(ATTR_KEY, attributes);
        Self::Mapping(mapping)
    }

    /// Returns `true` if this is the absent value.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if this is a sequence.
    #[must_use]
    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::Sequence(_))
    }

    /// Returns `true` if this is a mapping or a record.
    #[must_use]
    pub fn is_mapping(&self) -> bool {
        matches!(self, Self::Mapping(_) | Self::Record(_))
    }

    /// Returns the text if this is a `Text` variant.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer if this is an `Integer` variant.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the number as `f64` for `Float` and `Integer` variants.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Returns the boolean if this is a `Boolean` variant.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the timestamp if this is a `Timestamp` variant.
    #[must_use]
    pub fn as_timestamp(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }

    /// Returns the elements if this is a `Sequence` variant.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the record if this is a `Record` variant.
    #[must_use]
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Returns the raw mapping if this is a `Mapping` variant.
    #[must_use]
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(mapping) => Some(mapping),
            _ => None,
        }
    }

    /// Returns the key/value entries of either a `Mapping` or a `Record`.
    #[must_use]
    pub fn as_entries(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(mapping) => Some(mapping),
            Self::Record(record) => Some(record.as_mapping()),
            _ => None,
        }
    }

    /// View this value as a list regardless of sequence promotion.
    ///
    /// A repeated element decodes to a sequence while a single occurrence decodes to a bare
    /// value; this yields the elements in both cases, and nothing for `Null`.
    #[must_use]
    pub fn items(&self) -> &[Value] {
        match self {
            Self::Null => &[],
            Self::Sequence(items) => items,
            other => std::slice::from_ref(other),
        }
    }

    /// Look up a key: canonicalized for records, exact for raw mappings.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Record(record) => record.get(key),
            Self::Mapping(mapping) => mapping.get(key),
            _ => None,
        }
    }
}

impl Index<&str> for Value {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        self.get(key).unwrap_or(&NULL)
    }
}

impl Index<usize> for Value {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        self.as_sequence()
            .and_then(|items| items.get(index))
            .unwrap_or(&NULL)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(ts: DateTime<Utc>) -> Self {
        Self::Timestamp(ts)
    }
}

impl From<Mapping> for Value {
    fn from(mapping: Mapping) -> Self {
        Self::Mapping(mapping)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Self::Record(record)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    /// Objects become raw mappings in document order; integers that fit in `i64` become
    /// `Integer`, other numbers `Float` (or `Text` when they only fit in `u64`).
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Boolean(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Integer(i)
                } else if n.is_u64() {
                    Self::Text(n.to_string())
                } else {
                    n.as_f64().map_or(Self::Null, Self::Float)
                }
            }
            serde_json::Value::String(s) => Self::Text(s),
            serde_json::Value::Array(items) => {
                Self::Sequence(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(object) => Self::Mapping(
                object
                    .into_iter()
                    .map(|(k, v)| (k, Self::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Integer(n) => serializer.serialize_i64(*n),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::Boolean(b) => serializer.serialize_bool(*b),
            Self::Timestamp(ts) => serializer.serialize_str(&format_timestamp(ts)),
            Self::Sequence(items) => serializer.collect_seq(items),
            Self::Mapping(mapping) => mapping.serialize(serializer),
            Self::Record(record) => record.serialize(serializer),
        }
    }
}

/// Insertion-ordered mapping from wire-cased keys to values.
///
/// Keys are compared exactly. Inserting an existing key replaces its value in place, so
/// the original position is kept. Equality ignores entry order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping {
    entries: IndexMap<String, Value>,
}

impl Mapping {
    /// Create an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning the previous value stored under `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Look up a value by exact key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Mutable lookup by exact key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Returns `true` if the key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
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

    /// Returns `true` if the mapping has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove and return the value stored under `key`, keeping the order of the rest.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for Mapping {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Mapping {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Index<&str> for Mapping {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        self.get(key).unwrap_or(&NULL)
    }
}

impl Serialize for Mapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(&self.entries)
    }
}

/// Build a [`Mapping`] from `key => value` pairs, keeping their order.
///
/// ```
/// use rustbay_xml::mapping;
///
/// let m = mapping! { "a" => 1, "b" => vec![1, 2] };
/// assert_eq!(m.keys().collect::<Vec<_>>(), ["a", "b"]);
/// ```
#[macro_export]
macro_rules! mapping {
    () => {
        $crate::Mapping::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut mapping = $crate::Mapping::new();
        $( mapping.insert($key, $value); )+
        mapping
    }};
}
