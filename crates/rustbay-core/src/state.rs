//! Process-wide default configuration.
//!
//! Request building and decoding always take an explicit [`EbayConfig`]. This module only
//! provides an ergonomic default for callers that do not thread one through: readers get a
//! cloned snapshot, writers replace the whole value, and the last write wins. A decode that
//! started before a write keeps using the snapshot it was given.

use std::sync::LazyLock;

use parking_lot::RwLock;

use crate::EbayConfig;

static DEFAULT_CONFIG: LazyLock<RwLock<EbayConfig>> =
    LazyLock::new(|| RwLock::new(EbayConfig::default()));

/// Snapshot of the current process-wide default configuration.
#[must_use]
pub fn default_config() -> EbayConfig {
    DEFAULT_CONFIG.read().clone()
}

/// Replace the process-wide default configuration.
pub fn set_default_config(config: EbayConfig) {
    *DEFAULT_CONFIG.write() = config;
    tracing::debug!("replaced default eBay configuration");
}

/// Mutate the process-wide default configuration in place and return the new snapshot.
///
/// ```
/// let config = rustbay_core::configure(|c| c.site_id = rustbay_core::SiteId::new(3));
/// assert_eq!(config.site_id.get(), 3);
/// # rustbay_core::configure(|c| c.site_id = rustbay_core::SiteId::US);
/// ```
pub fn configure(f: impl FnOnce(&mut EbayConfig)) -> EbayConfig {
    let mut guard = DEFAULT_CONFIG.write();
    f(&mut guard);
    guard.clone()
}
