//! Trading API response parsing.

use std::ops::Deref;

use rustbay_core::DecodeOptions;
use rustbay_xml::{Record, Value, XmlError, camelize, decode};
use tracing::debug;

/// A decoded Trading API response.
///
/// Dereferences to the [`Record`] found under the document's `{Command}Response` element, so
/// fields are read with any casing: `response["Timestamp"]`, `response["timestamp"]`.
#[derive(Debug, Clone)]
pub struct Response {
    command: String,
    body: String,
    record: Record,
}

impl Response {
    /// Decode a response body for `command`.
    ///
    /// A document without a `{Command}Response` root yields an empty record rather than an
    /// error; callers check for the fields they need.
    ///
    /// ```
    /// use rustbay_client::Response;
    /// use rustbay_core::DecodeOptions;
    /// use rustbay_xml::Value;
    ///
    /// let xml = "<GetSomethingResponse><Foo>Bar</Foo></GetSomethingResponse>";
    /// let response = Response::parse("GetSomething", xml, &DecodeOptions::default()).unwrap();
    /// assert_eq!(response["Foo"], Value::from("Bar"));
    /// assert_eq!(response["foo"], Value::from("Bar"));
    /// ```
    pub fn parse(
        command: &str,
        body: impl Into<String>,
        options: &DecodeOptions,
    ) -> Result<Self, XmlError> {
        let body = body.into();
        let command = camelize(command);
        let mut document = decode(&body, options)?;

        let key = format!("{command}Response");
        let record = match document.remove(&key) {
            Some(Value::Mapping(mapping)) => Record::from(mapping),
            Some(other) => {
                debug!(%command, value = ?other, "response element has no fields");
                Record::new()
            }
            None => {
                debug!(%command, root = ?document.keys().next(), "response element missing");
                Record::new()
            }
        };

        Ok(Self {
            command,
            body,
            record,
        })
    }

    /// Wire-cased command the response belongs to.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Raw response body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// The decoded response fields.
    #[must_use]
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Consume the response, keeping only its fields.
    #[must_use]
    pub fn into_record(self) -> Record {
        self.record
    }

    /// The `Ack` field: `Success`, `Warning`, `Failure` or `PartialFailure`.
    #[must_use]
    pub fn ack(&self) -> Option<&str> {
        self.record.get("ack").and_then(Value::as_str)
    }

    /// Returns `true` when eBay acknowledged the call with `Success` or `Warning`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.ack(), Some("Success" | "Warning"))
    }
}

impl Deref for Response {
    type Target = Record;

    fn deref(&self) -> &Record {
        &self.record
    }
}
