//! Core configuration and shared types for RustBay, an eBay Trading API client.
//!
//! This crate provides the configuration snapshot consumed by request building and
//! response decoding, the process-wide default configuration, and common eBay type
//! definitions.

mod config;
mod error;
mod state;
mod types;

pub use config::{DEFAULT_COMPATIBILITY_LEVEL, DecodeOptions, EbayConfig, TokenGetter};
pub use error::RustBayError;
pub use state::{configure, default_config, set_default_config};
pub use types::SiteId;
