//! Trading API request building.
//!
//! A [`Request`] pins down everything needed to post one call: the wire-cased command name,
//! the endpoint, the credentials and the encoded input. Settings come from an
//! [`EbayConfig`] snapshot, and each of them can be overridden for a single call through
//! [`RequestOptions`].

use std::fmt;
use std::time::Duration;

use http::Uri;
use rustbay_core::{EbayConfig, SiteId};
use rustbay_xml::{Value, camelize, encode_value};
use typed_builder::TypedBuilder;

use crate::error::ClientResult;
use crate::transport::HttpRequest;

/// Namespace of every Trading API request document.
pub const EBAY_NAMESPACE: &str = "urn:ebay:apis:eBLBaseComponents";

/// Per-call overrides for the configured settings.
///
/// # Examples
///
/// ```
/// use rustbay_client::RequestOptions;
///
/// let options = RequestOptions::builder().auth_token("user-token").build();
/// assert_eq!(options.auth_token.as_deref(), Some("user-token"));
/// assert!(options.site_id.is_none());
/// ```
#[derive(Debug, Clone, Default, TypedBuilder)]
pub struct RequestOptions {
    /// Endpoint to post to instead of [`EbayConfig::uri`].
    #[builder(default, setter(strip_option, into))]
    pub uri: Option<String>,

    /// Auth'n'Auth token to use instead of the configured one.
    #[builder(default, setter(strip_option, into))]
    pub auth_token: Option<String>,

    /// OAuth token to use instead of the configured one.
    #[builder(default, setter(strip_option, into))]
    pub oauth_token: Option<String>,

    /// eBay site to address.
    #[builder(default, setter(strip_option))]
    pub site_id: Option<SiteId>,

    /// Trading API schema version to declare.
    #[builder(default, setter(strip_option))]
    pub compatibility_level: Option<u32>,

    /// Read timeout for this call.
    #[builder(default, setter(strip_option))]
    pub http_timeout: Option<Duration>,
}

/// A single Trading API call, ready to be posted.
#[derive(Debug, Clone)]
pub struct Request {
    command: String,
    input: Value,
    uri: Uri,
    dev_id: String,
    app_id: String,
    cert_id: String,
    auth_token: String,
    oauth_token: String,
    site_id: SiteId,
    compatibility_level: u32,
    http_timeout: Duration,
    verify_tls_cert: bool,
}

impl Request {
    /// Build a request from the configuration alone.
    ///
    /// `command` may be wire-cased (`GeteBayOfficialTime`) or snake_case
    /// (`get_ebay_official_time`).
    pub fn new(command: &str, input: impl Into<Value>, config: &EbayConfig) -> ClientResult<Self> {
        Self::with_options(command, input, config, RequestOptions::default())
    }

    /// Build a request, letting `options` override individual configured settings.
    pub fn with_options(
        command: &str,
        input: impl Into<Value>,
        config: &EbayConfig,
        options: RequestOptions,
    ) -> ClientResult<Self> {
        let uri = options.uri.unwrap_or_else(|| config.uri()).parse::<Uri>()?;
        let oauth_token = options
            .oauth_token
            .or_else(|| config.oauth_token_with_refresh())
            .unwrap_or_default();
        let auth_token = options
            .auth_token
            .or_else(|| config.auth_token.clone())
            .unwrap_or_default();

        Ok(Self {
            command: camelize(command),
            input: input.into(),
            uri,
            dev_id: config.dev_id.clone().unwrap_or_default(),
            app_id: config.app_id.clone().unwrap_or_default(),
            cert_id: config.cert_id.clone().unwrap_or_default(),
            auth_token,
            oauth_token,
            site_id: options.site_id.unwrap_or(config.site_id),
            compatibility_level: options
                .compatibility_level
                .unwrap_or(config.compatibility_level),
            http_timeout: options
                .http_timeout
                .unwrap_or(Duration::from_secs(config.http_timeout_secs)),
            verify_tls_cert: config.verify_tls_cert,
        })
    }

    /// Wire-cased command name, e.g. `GeteBayOfficialTime`.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// The call input.
    #[must_use]
    pub fn input(&self) -> &Value {
        &self.input
    }

    /// Endpoint the request is posted to.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Path component of the endpoint.
    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Read timeout for the call.
    #[must_use]
    pub fn http_timeout(&self) -> Duration {
        self.http_timeout
    }

    /// The encoded call input.
    pub fn input_xml(&self) -> ClientResult<String> {
        Ok(encode_value(&self.input)?)
    }

    /// Auth'n'Auth credentials block, or an empty string when an OAuth token is present or
    /// no auth token is set.
    #[must_use]
    pub fn requester_credentials_xml(&self) -> String {
        if !self.oauth_token.is_empty() || self.auth_token.is_empty() {
            return String::new();
        }
        format!(
            "<RequesterCredentials><eBayAuthToken>{}</eBayAuthToken></RequesterCredentials>",
            self.auth_token
        )
    }

    /// The full request document.
    pub fn body(&self) -> ClientResult<String> {
        Ok(format!(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<{command}Request xmlns=\"{EBAY_NAMESPACE}\">{credentials}{input}</{command}Request>",
            command = self.command,
            credentials = self.requester_credentials_xml(),
            input = self.input_xml()?,
        ))
    }

    /// Trading API headers in send order. Headers with empty values are left out.
    #[must_use]
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        [
            (
                "X-EBAY-API-COMPATIBILITY-LEVEL",
                self.compatibility_level.to_string(),
            ),
            ("X-EBAY-API-DEV-NAME", self.dev_id.clone()),
            ("X-EBAY-API-APP-NAME", self.app_id.clone()),
            ("X-EBAY-API-CERT-NAME", self.cert_id.clone()),
            ("X-EBAY-API-CALL-NAME", self.command.clone()),
            ("X-EBAY-API-SITEID", self.site_id.to_string()),
            ("X-EBAY-API-IAF-TOKEN", self.oauth_token.clone()),
            ("Content-Type", "text/xml".to_owned()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .collect()
    }

    /// Look up a single header value.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers()
            .into_iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    /// Everything a [`Transport`](crate::Transport) needs to post this request.
    pub fn to_http_request(&self) -> ClientResult<HttpRequest> {
        Ok(HttpRequest {
            uri: self.uri.clone(),
            headers: self.headers(),
            body: self.body()?,
            timeout: self.http_timeout,
            verify_tls_cert: self.verify_tls_cert,
        })
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let input = serde_json::to_string(&self.input).map_err(|_| fmt::Error)?;
        write!(f, "{}[{input}] <{}>", self.command, self.uri)
    }
}

#[cfg(test)]
mod tests {
    use rustbay_core::TokenGetter;
    use rustbay_xml::mapping;

    use super::*;

    const TOKEN: &str = "auth-token-123xyz";

    fn config() -> EbayConfig {
        EbayConfig::builder()
            .dev_id("dev")
            .app_id("app")
            .cert_id("cert")
            .build()
    }

    fn request(options: RequestOptions) -> Request {
        Request::with_options("Blah", Value::Null, &config(), options).expect("test request")
    }

    #[test]
    fn test_should_camelize_command() {
        let request = Request::new("get_ebay_official_time", Value::Null, &config())
            .expect("test request");
        assert_eq!(request.command(), "GeteBayOfficialTime");

        let request = Request::new("GeteBayOfficialTime", Value::Null, &config())
            .expect("test request");
        assert_eq!(request.command(), "GeteBayOfficialTime");
    }

    #[test]
    fn test_should_use_configured_uri() {
        let configured = request(RequestOptions::default());
        assert_eq!(
            configured.uri().to_string(),
            "https://api.sandbox.ebay.com/ws/api.dll"
        );
        assert_eq!(configured.path(), "/ws/api.dll");

        let overridden = request(
            RequestOptions::builder()
                .uri("http://localhost:8080/ws/other.dll")
                .build(),
        );
        assert_eq!(overridden.path(), "/ws/other.dll");
    }

    #[test]
    fn test_should_reject_invalid_uri() {
        let options = RequestOptions::builder().uri("not a uri").build();
        assert!(Request::with_options("Blah", Value::Null, &config(), options).is_err());
    }

    #[test]
    fn test_should_encode_multiple_inputs() {
        let input = vec![
            Value::from(mapping! { "a" => 1 }),
            Value::from(mapping! { "a" => mapping! { "b" => vec![1, 2] } }),
        ];
        let request = Request::new("Blah", input, &config()).expect("test request");
        assert_eq!(
            request.input_xml().expect("test encoding"),
            "<a>1</a><a><b>1</b><b>2</b></a>"
        );
    }

    #[test]
    fn test_should_include_credentials_when_auth_token_present() {
        let request = request(RequestOptions::builder().auth_token(TOKEN).build());
        let body = request.body().expect("test body");
        assert!(body.contains("<RequesterCredentials>"));
        assert!(body.contains(&format!("<eBayAuthToken>{TOKEN}</eBayAuthToken>")));
        assert!(body.contains("</RequesterCredentials>"));
    }

    #[test]
    fn test_should_exclude_credentials_without_auth_token() {
        let body = request(RequestOptions::default()).body().expect("test body");
        assert!(!body.contains("<RequesterCredentials>"));
        assert!(!body.contains("<eBayAuthToken>"));
    }

    #[test]
    fn test_should_send_oauth_token_header() {
        let request = request(RequestOptions::builder().oauth_token(TOKEN).build());
        assert_eq!(
            request.header("X-EBAY-API-IAF-TOKEN").as_deref(),
            Some(TOKEN)
        );
    }

    #[test]
    fn test_should_prefer_oauth_over_auth_token() {
        let request = request(
            RequestOptions::builder()
                .oauth_token(TOKEN)
                .auth_token(TOKEN)
                .build(),
        );
        assert_eq!(
            request.header("X-EBAY-API-IAF-TOKEN").as_deref(),
            Some(TOKEN)
        );
        let body = request.body().expect("test body");
        assert!(!body.contains("<RequesterCredentials>"));
        assert!(!body.contains("<eBayAuthToken>"));
    }

    #[test]
    fn test_should_use_oauth_token_getter() {
        let config = EbayConfig::builder()
            .oauth_token("stale")
            .oauth_token_getter(TokenGetter::new(|| "fresh".to_owned()))
            .build();
        let request = Request::new("Blah", Value::Null, &config).expect("test request");
        assert_eq!(
            request.header("X-EBAY-API-IAF-TOKEN").as_deref(),
            Some("fresh")
        );
    }

    #[test]
    fn test_should_list_headers_in_order_without_empty_values() {
        let request = request(RequestOptions::builder().site_id(SiteId::new(3)).build());
        assert_eq!(
            request.headers(),
            vec![
                ("X-EBAY-API-COMPATIBILITY-LEVEL", "1325".to_owned()),
                ("X-EBAY-API-DEV-NAME", "dev".to_owned()),
                ("X-EBAY-API-APP-NAME", "app".to_owned()),
                ("X-EBAY-API-CERT-NAME", "cert".to_owned()),
                ("X-EBAY-API-CALL-NAME", "Blah".to_owned()),
                ("X-EBAY-API-SITEID", "3".to_owned()),
                ("Content-Type", "text/xml".to_owned()),
            ]
        );
    }

    #[test]
    fn test_should_build_body_envelope() {
        let request = Request::new(
            "get_ebay_official_time",
            mapping! { "DetailLevel" => "ReturnAll" },
            &config(),
        )
        .expect("test request");
        assert_eq!(
            request.body().expect("test body"),
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<GeteBayOfficialTimeRequest xmlns=\"urn:ebay:apis:eBLBaseComponents\"><DetailLevel>ReturnAll</DetailLevel></GeteBayOfficialTimeRequest>"
        );
    }

    #[test]
    fn test_should_apply_overrides() {
        let request = request(
            RequestOptions::builder()
                .compatibility_level(967)
                .http_timeout(Duration::from_secs(5))
                .build(),
        );
        assert_eq!(
            request.header("x-ebay-api-compatibility-level").as_deref(),
            Some("967")
        );
        assert_eq!(request.http_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_should_display_command_input_and_uri() {
        let request = Request::new("GetItem", mapping! { "ItemID" => "1" }, &config())
            .expect("test request");
        assert_eq!(
            request.to_string(),
            r#"GetItem[{"ItemID":"1"}] <https://api.sandbox.ebay.com/ws/api.dll>"#
        );
    }
}
