//! Shared eBay type definitions.

use std::fmt;
use std::str::FromStr;

use crate::RustBayError;

/// eBay site identifier (`X-EBAY-API-SITEID`).
///
/// The full list of sites can be retrieved with
/// `GeteBayDetails(DetailName = "SiteDetails")`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct SiteId(u32);

impl SiteId {
    /// The US site (ebay.com).
    pub const US: Self = Self(0);

    /// Create a site ID from its numeric value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Numeric value of the site ID.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl FromStr for SiteId {
    type Err = RustBayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(Self)
            .map_err(|_| RustBayError::InvalidSiteId(s.to_owned()))
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
