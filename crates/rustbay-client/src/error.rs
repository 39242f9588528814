//! Client error types.

use rustbay_xml::XmlError;

/// Errors returned while building, sending or parsing a Trading API call.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request input could not be encoded or the response body could not be decoded.
    #[error("XML error: {0}")]
    Xml(#[from] XmlError),

    /// The endpoint URI is not a valid URI.
    #[error("invalid endpoint URI: {0}")]
    InvalidUri(#[from] http::uri::InvalidUri),

    /// The transport failed to deliver the request or read the response.
    #[error("transport error: {0}")]
    Transport(anyhow::Error),

    /// The call did not complete within the configured HTTP timeout.
    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// Convenience result alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
