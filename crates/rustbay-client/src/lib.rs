//! Request building, response parsing and the transport seam for the eBay Trading API.
//!
//! # Key components
//!
//! - [`Request`]: command name, endpoint, credentials, headers and the XML request document
//! - [`Response`]: the decoded `{Command}Response` element as a case-insensitive record
//! - [`Transport`]: the async boundary to whatever HTTP stack the application uses
//! - [`Client`]: builds, posts and decodes in one call
//! - [`StaticTransport`] and [`stub_response_body`]: canned responses for tests

mod client;
mod error;
mod request;
mod response;
mod transport;

pub use client::Client;
pub use error::{ClientError, ClientResult};
pub use request::{EBAY_NAMESPACE, Request, RequestOptions};
pub use response::Response;
pub use transport::{HttpRequest, StaticTransport, Transport, stub_response_body};
