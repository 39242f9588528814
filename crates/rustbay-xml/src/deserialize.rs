//! XML decoding: parsing eBay response documents into [`Mapping`] trees.
//!
//! The document is first read into a transient element tree, then folded depth-first:
//!
//! - Attributes go under the reserved `attributes` key by local name
//! - An element whose only child is text collapses to that text, or to
//!   `{attributes, value}` when it also carries attributes
//! - Repeated sibling tags are promoted to a sequence; a single occurrence stays bare
//! - Text next to sibling elements is kept under the `text` key
//!
//! Keys are left exactly as they appear on the wire; normalization happens when the result is
//! wrapped in a [`Record`](crate::Record).

use quick_xml::Reader;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesRef, BytesStart, Event};
use rustbay_core::DecodeOptions;
use tracing::trace;

use crate::coerce::coerce;
use crate::error::XmlError;
use crate::value::{ATTRIBUTES_KEY, Mapping, VALUE_KEY, Value};

/// Key under which text nodes with element siblings are stored.
pub const TEXT_KEY: &str = "text";

/// Deepest element nesting accepted; deeper documents are rejected as a parse error.
pub const MAX_DEPTH: usize = 256;

#[derive(Debug)]
enum XmlNode {
    Element(XmlElement),
    Text(String),
}

#[derive(Debug)]
struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

/// Decode an XML document into `{root_tag: decoded_root}`.
///
/// # Examples
///
/// ```
/// use rustbay_core::DecodeOptions;
/// use rustbay_xml::{Value, decode};
///
/// let doc = decode(r#"<Amount currency="USD">9.99</Amount>"#, &DecodeOptions::default()).unwrap();
/// assert_eq!(doc["Amount"]["attributes"]["currency"], Value::from("USD"));
/// assert_eq!(doc["Amount"]["value"], Value::from("9.99"));
/// ```
///
/// # Errors
///
/// Returns `XmlError` if the document is malformed, has no root element, or references an
/// unknown entity.
pub fn decode(xml: &str, options: &DecodeOptions) -> Result<Mapping, XmlError> {
    let root = parse_document(xml)?;
    trace!(
        root = %root.name,
        children = root.children.len(),
        convert_integers = options.convert_integers,
        "parsed XML document"
    );

    let value = decode_element(&root, options.convert_integers);
    let mut document = Mapping::new();
    document.insert(root.name, value);
    Ok(document)
}

fn decode_node(node: &XmlNode, convert_integers: bool) -> Value {
    match node {
        XmlNode::Text(text) => coerce(text, convert_integers),
        XmlNode::Element(element) => decode_element(element, convert_integers),
    }
}

fn decode_element(element: &XmlElement, convert_integers: bool) -> Value {
    let mut result = Mapping::new();

    if !element.attributes.is_empty() {
        let attributes: Mapping = element
            .attributes
            .iter()
            .map(|(name, value)| (name.as_str(), coerce(value, convert_integers)))
            .collect();
        result.insert(ATTRIBUTES_KEY, attributes);
    }

    if let [XmlNode::Text(text)] = element.children.as_slice() {
        let value = coerce(text, convert_integers);
        if result.is_empty() {
            return value;
        }
        result.insert(VALUE_KEY, value);
        return Value::Mapping(result);
    }

    for child in &element.children {
        let key = match child {
            XmlNode::Element(child) => child.name.as_str(),
            XmlNode::Text(_) => TEXT_KEY,
        };
        merge_child(&mut result, key, decode_node(child, convert_integers));
    }

    Value::Mapping(result)
}

/// Store `value` under `key`, promoting repeated keys to a sequence.
fn merge_child(result: &mut Mapping, key: &str, value: Value) {
    match result.get_mut(key) {
        None => {
            result.insert(key, value);
        }
        Some(Value::Sequence(items)) => items.push(value),
        Some(existing) => {
            let previous = std::mem::take(existing);
            *existing = Value::Sequence(vec![previous, value]);
        }
    }
}

fn parse_document(xml: &str) -> Result<XmlElement, XmlError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                check_depth(stack.len() + 1)?;
                stack.push(XmlElement::from_start(&e)?);
            }
            Event::Empty(e) => {
                check_depth(stack.len() + 1)?;
                let element = XmlElement::from_start(&e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(e) => {
                let element = stack.pop().ok_or_else(|| {
                    XmlError::UnexpectedElement(format!(
                        "closing tag </{}> without an open element",
                        String::from_utf8_lossy(e.name().as_ref())
                    ))
                })?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(e) => {
                let text = e
                    .decode()
                    .map_err(|err| XmlError::ParseError(err.to_string()))?;
                push_text(&mut stack, &text)?;
            }
            Event::CData(e) => {
                let text = e
                    .decode()
                    .map_err(|err| XmlError::ParseError(err.to_string()))?;
                push_text(&mut stack, &text)?;
            }
            Event::GeneralRef(e) => {
                let text = resolve_reference(&e)?;
                push_text(&mut stack, &text)?;
            }
            Event::Eof => break,
            // Declaration, comments, processing instructions, doctype.
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(XmlError::UnexpectedElement(format!(
            "unexpected EOF inside <{}>",
            open.name
        )));
    }
    root.ok_or_else(|| XmlError::MissingElement("root element".to_owned()))
}

fn check_depth(depth: usize) -> Result<(), XmlError> {
    if depth > MAX_DEPTH {
        return Err(XmlError::ParseError(format!(
            "elements nested deeper than {MAX_DEPTH} levels"
        )));
    }
    Ok(())
}

/// Attach a completed element to its parent, or make it the document root.
fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), XmlError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(XmlNode::Element(element));
        return Ok(());
    }
    if root.is_some() {
        return Err(XmlError::UnexpectedElement(format!(
            "second root element <{}>",
            element.name
        )));
    }
    *root = Some(element);
    Ok(())
}

/// Append text to the open element, merging with a preceding text node.
fn push_text(stack: &mut [XmlElement], text: &str) -> Result<(), XmlError> {
    if text.is_empty() {
        return Ok(());
    }
    let Some(parent) = stack.last_mut() else {
        if text.trim().is_empty() {
            return Ok(());
        }
        return Err(XmlError::ParseError(format!(
            "text outside the root element: {text:?}"
        )));
    };
    match parent.children.last_mut() {
        Some(XmlNode::Text(existing)) => existing.push_str(text),
        _ => parent.children.push(XmlNode::Text(text.to_owned())),
    }
    Ok(())
}

fn resolve_reference(reference: &BytesRef<'_>) -> Result<String, XmlError> {
    if let Some(ch) = reference.resolve_char_ref()? {
        return Ok(ch.to_string());
    }
    let name = reference
        .decode()
        .map_err(|err| XmlError::ParseError(err.to_string()))?;
    resolve_predefined_entity(&name)
        .map(str::to_owned)
        .ok_or_else(|| XmlError::UnknownEntity(name.into_owned()))
}

impl XmlElement {
    fn from_start(start: &BytesStart<'_>) -> Result<Self, XmlError> {
        let name = std::str::from_utf8(start.local_name().as_ref())
            .map_err(|e| XmlError::ParseError(e.to_string()))?
            .to_owned();

        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            if attr.key.as_namespace_binding().is_some() {
                continue;
            }
            let key = std::str::from_utf8(attr.key.local_name().into_inner())
                .map_err(|e| XmlError::ParseError(e.to_string()))?;
            let raw = std::str::from_utf8(&attr.value)
                .map_err(|e| XmlError::ParseError(e.to_string()))?;
            let value = unescape(raw).map_err(|e| XmlError::ParseError(e.to_string()))?;
            attributes.push((key.to_owned(), value.into_owned()));
        }

        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
        })
    }
}
