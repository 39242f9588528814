//! The Trading API client facade.

use rustbay_core::{EbayConfig, default_config};
use rustbay_xml::Value;
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};
use crate::request::{Request, RequestOptions};
use crate::response::Response;
use crate::transport::Transport;

/// Makes Trading API calls: builds the request, posts it through the transport and decodes
/// the response.
///
/// # Examples
///
/// ```
/// use rustbay_client::{Client, StaticTransport};
/// use rustbay_core::EbayConfig;
/// use rustbay_xml::{Value, mapping};
///
/// # tokio_test::block_on(async {
/// let transport = StaticTransport::stub("GeteBayOfficialTime", &Value::from(mapping! {
///     "Timestamp" => "2010-10-10T10:00:00.000Z",
/// }))
/// .unwrap();
/// let client = Client::new(EbayConfig::default(), transport);
///
/// let response = client.call("get_ebay_official_time", Value::Null).await.unwrap();
/// assert!(response.is_success());
/// assert_eq!(response["timestamp"], Value::from("2010-10-10T10:00:00.000Z"));
/// # });
/// ```
#[derive(Debug)]
pub struct Client<T> {
    config: EbayConfig,
    transport: T,
}

impl<T: Transport> Client<T> {
    /// Create a client with an explicit configuration.
    pub fn new(config: EbayConfig, transport: T) -> Self {
        Self { config, transport }
    }

    /// Create a client from a snapshot of the process-wide default configuration.
    pub fn with_default_config(transport: T) -> Self {
        Self::new(default_config(), transport)
    }

    /// The configuration calls are made with.
    #[must_use]
    pub fn config(&self) -> &EbayConfig {
        &self.config
    }

    /// The underlying transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build a request without sending it.
    pub fn request(
        &self,
        command: &str,
        input: impl Into<Value>,
        options: RequestOptions,
    ) -> ClientResult<Request> {
        Request::with_options(command, input, &self.config, options)
    }

    /// Make a call with the configured settings.
    pub async fn call(&self, command: &str, input: impl Into<Value>) -> ClientResult<Response> {
        self.call_with(command, input, RequestOptions::default())
            .await
    }

    /// Make a call, overriding individual settings for this call only.
    pub async fn call_with(
        &self,
        command: &str,
        input: impl Into<Value>,
        options: RequestOptions,
    ) -> ClientResult<Response> {
        let request = self.request(command, input, options)?;
        self.send(&request).await
    }

    /// Post a prepared request and decode its response.
    pub async fn send(&self, request: &Request) -> ClientResult<Response> {
        let http_request = request.to_http_request()?;
        debug!(command = %request.command(), uri = %request.uri(), "sending Trading API call");
        if self.config.debug {
            debug!(body = %http_request.body, "request body");
        }

        let body = tokio::time::timeout(http_request.timeout, self.transport.post(&http_request))
            .await
            .map_err(|_| ClientError::Timeout(http_request.timeout))?
            .map_err(ClientError::Transport)?;
        if self.config.debug {
            debug!(%body, "response body");
        }

        let response = Response::parse(request.command(), body, &self.config.decode_options())?;
        if !response.is_success() {
            warn!(command = %response.command(), ack = ?response.ack(), "call not acknowledged");
        }
        Ok(response)
    }
}
