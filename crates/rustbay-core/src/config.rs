//! Client configuration for the eBay Trading API.
//!
//! Provides [`EbayConfig`], the immutable settings snapshot handed to request building and
//! response decoding. Values can be assembled with the typed builder or loaded from
//! environment variables via [`EbayConfig::from_env`].

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::types::SiteId;

/// Default eBay Trading API schema version.
pub const DEFAULT_COMPATIBILITY_LEVEL: u32 = 1325;

/// Callback used to fetch (or refresh) an OAuth bearer token on demand.
///
/// When configured it takes precedence over the static `oauth_token`.
#[derive(Clone)]
pub struct TokenGetter(Arc<dyn Fn() -> String + Send + Sync>);

impl TokenGetter {
    /// Wrap a closure producing the current access token.
    pub fn new(getter: impl Fn() -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(getter))
    }

    /// Invoke the getter.
    #[must_use]
    pub fn fetch(&self) -> String {
        (self.0)()
    }
}

impl fmt::Debug for TokenGetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenGetter(..)")
    }
}

/// Settings consumed by the XML decoder.
///
/// A cheap, copyable snapshot taken from [`EbayConfig`] so the transcoder never reads
/// shared state while walking a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Convert text that is exactly the decimal rendering of an integer into an integer.
    pub convert_integers: bool,
}

/// eBay Trading API client configuration.
///
/// To make a call you need a registered developer account and application: fill in the
/// `dev_id`, `app_id`, `cert_id` and `ru_name`, plus either an `auth_token` (Auth'n'Auth)
/// or an `oauth_token`.
///
/// # Examples
///
/// ```
/// use rustbay_core::EbayConfig;
///
/// let config = EbayConfig::default();
/// assert!(config.sandbox);
/// assert_eq!(config.uri(), "https://api.sandbox.ebay.com/ws/api.dll");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase", default)]
pub struct EbayConfig {
    /// Developer ID (`X-EBAY-API-DEV-NAME`).
    #[builder(default, setter(strip_option, into))]
    pub dev_id: Option<String>,

    /// Application ID (`X-EBAY-API-APP-NAME`).
    #[builder(default, setter(strip_option, into))]
    pub app_id: Option<String>,

    /// Certificate ID (`X-EBAY-API-CERT-NAME`).
    #[builder(default, setter(strip_option, into))]
    pub cert_id: Option<String>,

    /// RuName used for the sign-in redirect.
    #[builder(default, setter(strip_option, into))]
    pub ru_name: Option<String>,

    /// Auth'n'Auth user token, sent as `RequesterCredentials` in the body.
    #[builder(default, setter(strip_option, into))]
    pub auth_token: Option<String>,

    /// OAuth bearer token, sent as `X-EBAY-API-IAF-TOKEN`.
    #[builder(default, setter(strip_option, into))]
    pub oauth_token: Option<String>,

    /// Fetches a fresh OAuth token; overrides `oauth_token` when set.
    #[serde(skip)]
    #[builder(default, setter(strip_option))]
    pub oauth_token_getter: Option<TokenGetter>,

    /// eBay site to address (0 is the US site).
    #[builder(default)]
    pub site_id: SiteId,

    /// Trading API schema version.
    #[builder(default = DEFAULT_COMPATIBILITY_LEVEL)]
    pub compatibility_level: u32,

    /// HTTP read timeout in seconds, honored by the transport.
    #[builder(default = 60)]
    pub http_timeout_secs: u64,

    /// Whether the transport should verify TLS certificates.
    #[builder(default = true)]
    pub verify_tls_cert: bool,

    /// Use the eBay sandbox instead of production.
    #[builder(default = true)]
    pub sandbox: bool,

    /// Convert integer-looking response text into integers.
    #[builder(default = false)]
    pub convert_integers: bool,

    /// Log full request and response bodies at `debug` level.
    #[builder(default = false)]
    pub debug: bool,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl Default for EbayConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl EbayConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables (falling back to defaults):
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `EBAY_DEV_ID` | *(unset)* |
    /// | `EBAY_APP_ID` | *(unset)* |
    /// | `EBAY_CERT_ID` | *(unset)* |
    /// | `EBAY_RU_NAME` | *(unset)* |
    /// | `EBAY_AUTH_TOKEN` | *(unset)* |
    /// | `EBAY_OAUTH_TOKEN` | *(unset)* |
    /// | `EBAY_SITE_ID` | `0` |
    /// | `EBAY_COMPATIBILITY_LEVEL` | `1325` |
    /// | `EBAY_HTTP_TIMEOUT` | `60` |
    /// | `EBAY_VERIFY_TLS_CERT` | `true` |
    /// | `EBAY_SANDBOX` | `true` |
    /// | `EBAY_CONVERT_INTEGERS` | `false` |
    /// | `EBAY_DEBUG` | `false` |
    /// | `LOG_LEVEL` | `info` |
    ///
    /// Unparseable numeric values are ignored with a warning.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("EBAY_DEV_ID") {
            config.dev_id = Some(v);
        }
        if let Ok(v) = std::env::var("EBAY_APP_ID") {
            config.app_id = Some(v);
        }
        if let Ok(v) = std::env::var("EBAY_CERT_ID") {
            config.cert_id = Some(v);
        }
        if let Ok(v) = std::env::var("EBAY_RU_NAME") {
            config.ru_name = Some(v);
        }
        if let Ok(v) = std::env::var("EBAY_AUTH_TOKEN") {
            config.auth_token = Some(v);
        }
        if let Ok(v) = std::env::var("EBAY_OAUTH_TOKEN") {
            config.oauth_token = Some(v);
        }
        if let Ok(v) = std::env::var("EBAY_SITE_ID") {
            match v.parse::<SiteId>() {
                Ok(site) => config.site_id = site,
                Err(e) => tracing::warn!(error = %e, "ignoring EBAY_SITE_ID"),
            }
        }
        if let Ok(v) = std::env::var("EBAY_COMPATIBILITY_LEVEL") {
            match v.parse::<u32>() {
                Ok(level) => config.compatibility_level = level,
                Err(e) => tracing::warn!(value = %v, error = %e, "ignoring EBAY_COMPATIBILITY_LEVEL"),
            }
        }
        if let Ok(v) = std::env::var("EBAY_HTTP_TIMEOUT") {
            if let Ok(secs) = v.parse::<u64>() {
                config.http_timeout_secs = secs;
            }
        }
        if let Ok(v) = std::env::var("EBAY_VERIFY_TLS_CERT") {
            config.verify_tls_cert = parse_bool(&v);
        }
        if let Ok(v) = std::env::var("EBAY_SANDBOX") {
            config.sandbox = parse_bool(&v);
        }
        if let Ok(v) = std::env::var("EBAY_CONVERT_INTEGERS") {
            config.convert_integers = parse_bool(&v);
        }
        if let Ok(v) = std::env::var("EBAY_DEBUG") {
            config.debug = parse_bool(&v);
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }

    /// The OAuth token to send: the getter's result when one is configured, otherwise the
    /// static `oauth_token`.
    #[must_use]
    pub fn oauth_token_with_refresh(&self) -> Option<String> {
        match &self.oauth_token_getter {
            Some(getter) => Some(getter.fetch()),
            None => self.oauth_token.clone(),
        }
    }

    /// Base web-service URL for the given eBay service host.
    ///
    /// ```
    /// use rustbay_core::EbayConfig;
    ///
    /// let config = EbayConfig::builder().sandbox(false).build();
    /// assert_eq!(config.uri_prefix("signin"), "https://signin.ebay.com/ws");
    /// ```
    #[must_use]
    pub fn uri_prefix(&self, service: &str) -> String {
        let sandbox = if self.sandbox { ".sandbox" } else { "" };
        format!("https://{service}{sandbox}.ebay.com/ws")
    }

    /// Endpoint that Trading API calls are posted to.
    #[must_use]
    pub fn uri(&self) -> String {
        format!("{}/api.dll", self.uri_prefix("api"))
    }

    /// Sign-in URL for eBay user authorization.
    ///
    /// `session_id` comes from a `GetSessionID` call; `ru_params` are handed back to the
    /// application on the redirect after a successful sign-in.
    #[must_use]
    pub fn authorization_uri(&self, session_id: &str, ru_params: &[(&str, &str)]) -> String {
        let joined = ru_params
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        let escaped: String = form_urlencoded::byte_serialize(joined.as_bytes()).collect();
        format!(
            "{}/eBayISAPI.dll?SignIn&RuName={}&SessId={session_id}&ruparams={escaped}",
            self.uri_prefix("signin"),
            self.ru_name.as_deref().unwrap_or_default(),
        )
    }

    /// Snapshot of the settings the XML decoder needs.
    #[must_use]
    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            convert_integers: self.convert_integers,
        }
    }
}

/// Parse a string as a boolean, accepting `"1"` and `"true"` (case-insensitive).
fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
