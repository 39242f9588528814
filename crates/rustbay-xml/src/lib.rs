//! XML transcoding for the eBay Trading API.
//!
//! This crate converts between nested [`Value`] trees and the XML the Trading API speaks, and
//! wraps decoded responses in case-insensitive [`Record`]s.
//!
//! # Key components
//!
//! - [`normalize_key`] / [`camelize`]: wire-name canonicalization and outbound call names
//! - [`coerce`]: optional text-to-integer coercion for decoded values
//! - [`Value`], [`Mapping`], [`Record`]: the value tree and its canonical-keyed view
//! - [`encode`] / [`encode_value`]: request fragments, without escaping
//! - [`decode`]: response documents, with attribute/text collapse and sequence promotion
//!
//! # Trading API XML conventions
//!
//! - Namespace: `urn:ebay:apis:eBLBaseComponents`
//! - Attributed values: `{value, attr}` on the way out, `{attributes, value}` on the way in
//! - Repeated elements: sibling tags, never a wrapper
//! - Timestamps: ISO 8601 in UTC with whole seconds (`2010-10-31T03:15:00Z`)

pub mod coerce;
pub mod deserialize;
pub mod error;
pub mod key;
pub mod record;
pub mod serialize;
pub mod value;

pub use coerce::coerce;
pub use deserialize::{MAX_DEPTH, TEXT_KEY, decode};
pub use error::XmlError;
pub use key::{camelize, normalize_key};
pub use record::Record;
pub use serialize::{encode, encode_value};
pub use value::{ATTR_KEY, ATTRIBUTES_KEY, Mapping, VALUE_KEY, Value};
