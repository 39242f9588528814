//! The transport seam between request building and the network.
//!
//! The library never opens connections itself. A [`Transport`] receives a fully prepared
//! [`HttpRequest`] and returns the raw response body; TLS, retries and connection pooling are
//! the implementor's concern. [`StaticTransport`] serves canned bodies for tests and offline
//! development.
//!
//! # Object safety
//!
//! [`Transport`] uses `#[async_trait]` so clients can hold it as `Arc<dyn Transport>`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use http::Uri;
use parking_lot::Mutex;
use rustbay_xml::{Value, XmlError, camelize, encode_value, mapping};
use tracing::debug;

/// A Trading API call as it goes over the wire.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Endpoint to post to.
    pub uri: Uri,
    /// Headers in send order.
    pub headers: Vec<(&'static str, String)>,
    /// XML request document.
    pub body: String,
    /// Read timeout.
    pub timeout: Duration,
    /// Whether TLS certificates should be verified.
    pub verify_tls_cert: bool,
}

impl HttpRequest {
    /// Convert into an [`http::Request`] for transports built on the `http` ecosystem.
    pub fn to_http(&self) -> Result<http::Request<String>, http::Error> {
        let mut builder = http::Request::post(self.uri.clone());
        for (name, value) in &self.headers {
            builder = builder.header(*name, value.as_str());
        }
        builder.body(self.body.clone())
    }
}

/// Posts prepared requests and returns response bodies.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Post `request` and return the response body.
    ///
    /// # Errors
    ///
    /// Any failure to deliver the request or read the body.
    async fn post(&self, request: &HttpRequest) -> anyhow::Result<String>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn post(&self, request: &HttpRequest) -> anyhow::Result<String> {
        (**self).post(request).await
    }
}

/// A transport answering every request with the same body.
///
/// Sent requests are recorded so tests can inspect headers and bodies afterwards.
///
/// # Examples
///
/// ```
/// use rustbay_client::{StaticTransport, stub_response_body};
/// use rustbay_xml::{Value, mapping};
///
/// let body = stub_response_body("GeteBayOfficialTime", &Value::from(mapping! {
///     "Timestamp" => "2010-10-10T10:00:00.000Z",
/// }))
/// .unwrap();
/// let transport = StaticTransport::new(body);
/// assert!(transport.last_request().is_none());
/// ```
#[derive(Debug, Default)]
pub struct StaticTransport {
    body: String,
    requests: Mutex<Vec<HttpRequest>>,
}

impl StaticTransport {
    /// Create a transport returning `body` for every request.
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a transport answering `command` successfully with `content`.
    pub fn stub(command: &str, content: &Value) -> Result<Self, XmlError> {
        Ok(Self::new(stub_response_body(command, content)?))
    }

    /// The body returned for every request.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// The most recently posted request.
    #[must_use]
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().last().cloned()
    }

    /// Every posted request, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Transport for StaticTransport {
    async fn post(&self, request: &HttpRequest) -> anyhow::Result<String> {
        debug!(uri = %request.uri, bytes = request.body.len(), "serving canned response");
        self.requests.lock().push(request.clone());
        Ok(self.body.clone())
    }
}

/// A successful response document for `command` carrying `content`.
///
/// `content` is encoded like request input, so a [`Value::Text`] holding ready-made XML is
/// inserted as is.
///
/// ```
/// use rustbay_client::stub_response_body;
/// use rustbay_xml::Value;
///
/// let body = stub_response_body("get_item", &Value::from("<Title>Lamp</Title>")).unwrap();
/// assert_eq!(
///     body,
///     "<GetItemResponse><Ack>Success</Ack><Title>Lamp</Title></GetItemResponse>"
/// );
/// ```
pub fn stub_response_body(command: &str, content: &Value) -> Result<String, XmlError> {
    let command = camelize(command);
    let ack = encode_value(&Value::from(mapping! { "Ack" => "Success" }))?;
    let content = encode_value(content)?;
    Ok(format!(
        "<{command}Response>{ack}{content}</{command}Response>"
    ))
}
