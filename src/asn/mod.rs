//! ASN identifiers, company-to-ASN discovery, and originated-prefix lookup

pub mod discovery;
pub mod origin;

use serde::Serialize;
use std::fmt;

/// An autonomous system identifier as reported by the search service,
/// e.g. `AS13335`.
///
/// Ordering and equality follow the raw string so that sets of ASNs
/// iterate deterministically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Asn(String);

impl Asn {
    /// Wrap a raw identifier string
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The identifier as written, e.g. `AS13335`
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The numeric part of the identifier, e.g. `13335`
    ///
    /// The origin-prefixes endpoint is keyed by the bare number, so any
    /// leading non-digit characters are stripped.
    pub fn number(&self) -> &str {
        self.0.trim_start_matches(|c: char| !c.is_ascii_digit())
    }
}

impl fmt::Display for Asn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Asn {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}
