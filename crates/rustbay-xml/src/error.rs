//! Error types for XML encoding and decoding.

use std::io;
use std::string::FromUtf8Error;

/// Errors that can occur while encoding a [`Value`](crate::Value) tree or decoding a response
/// document.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// An I/O error during XML writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An error from the underlying quick-xml library.
    #[error("XML processing error: {0}")]
    QuickXml(#[from] quick_xml::Error),

    /// An error from quick-xml attribute handling.
    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// Encoded output was not valid UTF-8.
    #[error("invalid UTF-8 in encoded XML: {0}")]
    Encoding(#[from] FromUtf8Error),

    /// A required XML element was missing.
    #[error("missing required XML element: {0}")]
    MissingElement(String),

    /// An unexpected XML element or end of input was encountered.
    #[error("unexpected XML element: {0}")]
    UnexpectedElement(String),

    /// Text or a name could not be decoded.
    #[error("failed to parse value: {0}")]
    ParseError(String),

    /// An entity reference that is neither predefined nor a character reference.
    #[error("unknown entity reference: &{0};")]
    UnknownEntity(String),
}
