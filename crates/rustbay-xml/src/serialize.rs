//! XML encoding: turning [`Value`] trees into eBay request fragments.
//!
//! The encoding rules follow the Trading API's request conventions:
//!
//! - A mapping entry `key => value` becomes `<key>value</key>`
//! - A sequence under a key becomes one sibling `<key>` element per item, never a wrapper
//! - A mapping holding both `value` and `attr` becomes `<key a="1" b="2">value</key>`
//! - Timestamps: ISO 8601 in UTC with whole seconds (`2010-10-31T03:15:00Z`)
//!
//! Text and attribute values are written verbatim. No escaping is applied, so callers must
//! supply XML-safe content.

use std::borrow::Cow;
use std::io::{self, Write};

use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::Writer;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesText, Event};
use quick_xml::name::QName;

use crate::error::XmlError;
use crate::value::{ATTR_KEY, Mapping, VALUE_KEY, Value};

/// Encode each value in turn and concatenate the results without a separator.
///
/// ```
/// use rustbay_xml::{Value, encode, mapping};
///
/// let xml = encode(&[
///     Value::from(mapping! { "a" => 1 }),
///     Value::from(mapping! { "a" => mapping! { "b" => vec![1, 2] } }),
/// ])
/// .unwrap();
/// assert_eq!(xml, "<a>1</a><a><b>1</b><b>2</b></a>");
/// ```
pub fn encode(values: &[Value]) -> Result<String, XmlError> {
    let mut buf = Vec::with_capacity(256);
    {
        let mut writer = Writer::new(&mut buf);
        for value in values {
            write_value(&mut writer, value)?;
        }
    }
    Ok(String::from_utf8(buf)?)
}

/// Encode a single value.
pub fn encode_value(value: &Value) -> Result<String, XmlError> {
    encode(std::slice::from_ref(value))
}

/// Format a `DateTime<Utc>` as ISO 8601 with whole seconds and a `Z` suffix.
pub(crate) fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Whole floats keep a `.0` so `2.0` is not written as the integer `2`.
fn format_float(f: f64) -> String {
    let text = f.to_string();
    if f.is_finite() && !text.contains('.') {
        format!("{text}.0")
    } else {
        text
    }
}

fn write_value<W: Write>(writer: &mut Writer<W>, value: &Value) -> io::Result<()> {
    match value {
        Value::Mapping(mapping) => write_entries(writer, mapping),
        Value::Record(record) => write_entries(writer, record.as_mapping()),
        Value::Sequence(items) => items.iter().try_for_each(|item| write_value(writer, item)),
        Value::Null => Ok(()),
        Value::Text(text) => write_raw_text(writer, text),
        Value::Integer(n) => write_raw_text(writer, &n.to_string()),
        Value::Float(f) => write_raw_text(writer, &format_float(*f)),
        Value::Boolean(b) => write_raw_text(writer, if *b { "true" } else { "false" }),
        Value::Timestamp(ts) => write_raw_text(writer, &format_timestamp(ts)),
    }
}

fn write_entries<W: Write>(writer: &mut Writer<W>, entries: &Mapping) -> io::Result<()> {
    for (key, value) in entries {
        if let Some((content, attributes)) = attributed_parts(value) {
            write_attributed_element(writer, key, content, attributes)?;
        } else if let Value::Sequence(items) = value {
            for item in items {
                write_element(writer, key, item)?;
            }
        } else {
            write_element(writer, key, value)?;
        }
    }
    Ok(())
}

/// Write `<key>value</key>`; an empty value still produces both tags.
fn write_element<W: Write>(writer: &mut Writer<W>, key: &str, value: &Value) -> io::Result<()> {
    writer
        .create_element(key)
        .write_inner_content(|w| write_value(w, value))?;
    Ok(())
}

fn write_attributed_element<W: Write>(
    writer: &mut Writer<W>,
    key: &str,
    content: &Value,
    attributes: &Mapping,
) -> io::Result<()> {
    let rendered = attributes
        .iter()
        .map(|(name, value)| Ok((name.as_str(), render(value)?)))
        .collect::<io::Result<Vec<_>>>()?;

    writer
        .create_element(key)
        .with_attributes(rendered.iter().map(|(name, value)| raw_attribute(name, value)))
        .write_inner_content(|w| write_value(w, content))?;
    Ok(())
}

/// The `(value, attr)` pair of an attributed entry, if `value` has that shape.
fn attributed_parts(value: &Value) -> Option<(&Value, &Mapping)> {
    let entries = value.as_entries()?;
    let content = entries.get(VALUE_KEY)?;
    let attributes = entries.get(ATTR_KEY)?.as_entries()?;
    Some((content, attributes))
}

/// An attribute written exactly as given, bypassing quick-xml's escaping.
fn raw_attribute<'a>(name: &'a str, value: &'a str) -> Attribute<'a> {
    Attribute {
        key: QName(name.as_bytes()),
        value: Cow::Borrowed(value.as_bytes()),
    }
}

fn write_raw_text<W: Write>(writer: &mut Writer<W>, text: &str) -> io::Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    writer.write_event(Event::Text(BytesText::from_escaped(text)))?;
    Ok(())
}

fn render(value: &Value) -> io::Result<String> {
    let mut buf = Vec::new();
    write_value(&mut Writer::new(&mut buf), value)?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
