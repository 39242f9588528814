//! Error types for the RustBay core.

/// Core error type for RustBay configuration and shared types.
#[derive(Debug, thiserror::Error)]
pub enum RustBayError {
    /// Invalid eBay site ID.
    #[error("invalid eBay site ID: {0} (must be a non-negative integer)")]
    InvalidSiteId(String),
}
