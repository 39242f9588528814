//! End-to-end tests for RustBay.
//!
//! Calls go through the real [`Client`] with a [`StaticTransport`] standing in for eBay, so
//! no network access is needed:
//! ```text
//! cargo test -p rustbay-integration
//! ```

use std::sync::Once;

use rustbay_client::{Client, StaticTransport};
use rustbay_core::EbayConfig;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Configuration with application keys and an Auth'n'Auth token.
#[must_use]
pub fn test_config() -> EbayConfig {
    EbayConfig::builder()
        .dev_id("test-dev")
        .app_id("test-app")
        .cert_id("test-cert")
        .auth_token("test-token")
        .build()
}

/// A client answering every call with `body`.
#[must_use]
pub fn client_returning(config: EbayConfig, body: &str) -> Client<StaticTransport> {
    init_tracing();
    Client::new(config, StaticTransport::new(body))
}

mod test_call;
mod test_default_config;
mod test_transcode;
