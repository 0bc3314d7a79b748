//! Route lookup for a single address
//!
//! Joins the looking-glass route query with the originating ASN's
//! metadata from the same response. An address with no matching prefix
//! is a normal outcome, reported as unrouted.

use crate::asn::Asn;
use crate::client::{HttpClient, HttpError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::Ipv4Addr;
use tabled::Tabled;

/// Route-by-address endpoint
pub const ROUTE_URL: &str = "https://bgp.he.net/super-lg/api/v1/show/bgp/route";

/// Error type for single-address route lookups
#[derive(Debug, thiserror::Error)]
pub enum RouteLookupError {
    /// The route query could not be completed
    #[error("route lookup failed: {0}")]
    Http(#[from] HttpError),

    /// The response did not carry the expected join data
    #[error("unexpected route response: {0}")]
    Malformed(&'static str),
}

/// Originating-ASN detail for a routed address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct RouteDetail {
    /// Originating ASN
    #[tabled(rename = "ASN")]
    pub asn: String,
    /// Registry country
    #[tabled(rename = "COUNTRY")]
    pub country: String,
    /// AS description
    #[tabled(rename = "DESC")]
    pub description: String,
    /// Owning organization
    #[tabled(rename = "ORG")]
    pub org: String,
    /// The covering route
    #[tabled(rename = "ROUTE")]
    pub route: String,
}

/// Outcome of a route lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteLookup {
    /// The address is covered by an announced prefix
    Routed(RouteDetail),
    /// No prefix covers the address
    Unrouted(Ipv4Addr),
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
    #[serde(default)]
    prefixes: Vec<String>,
    #[serde(default)]
    response: Vec<RouteEntry>,
}

#[derive(Debug, Deserialize)]
struct RouteEntry {
    rpki: RpkiSection,
    #[serde(default)]
    asnmap: HashMap<String, AsnMapEntry>,
}

#[derive(Debug, Deserialize)]
struct RpkiSection {
    response: RpkiResponse,
}

#[derive(Debug, Deserialize)]
struct RpkiResponse {
    validated_route: ValidatedRoute,
}

#[derive(Debug, Deserialize)]
struct ValidatedRoute {
    route: ValidatedRouteInner,
}

#[derive(Debug, Deserialize)]
struct ValidatedRouteInner {
    origin_asn: String,
}

// Upstream does not document the asnmap value schema; fields are
// optional and case-tolerant.
#[derive(Debug, Default, Deserialize)]
struct AsnMapEntry {
    #[serde(default, alias = "ASN", alias = "Asn")]
    asn: Option<String>,
    #[serde(default, alias = "COUNTRY", alias = "Country")]
    country: Option<String>,
    #[serde(default, alias = "DESC", alias = "desc", alias = "Description")]
    description: Option<String>,
    #[serde(default, alias = "ORG", alias = "Org")]
    org: Option<String>,
}

/// Look up the BGP route covering a single IPv4 address.
///
/// Zero matching prefixes means the address is unrouted, not an error.
/// For a routed address the originating ASN is taken from the RPKI
/// validated route and joined against the response's ASN map; the
/// covering route is the first matched prefix.
pub async fn lookup(
    client: &HttpClient,
    address: Ipv4Addr,
) -> Result<RouteLookup, RouteLookupError> {
    let url = format!("{ROUTE_URL}/{address}");
    let response: RouteResponse = client
        .json(client.get(&url).query(&[
            ("match-asn", ""),
            ("match-type", "all"),
            ("search-type", "exact"),
            ("match-neighbor", ""),
        ]))
        .await?;

    let Some(route) = response.prefixes.first() else {
        return Ok(RouteLookup::Unrouted(address));
    };

    let entry = response
        .response
        .first()
        .ok_or(RouteLookupError::Malformed(
            "matched prefix without a response entry",
        ))?;

    let origin = Asn::new(entry.rpki.response.validated_route.route.origin_asn.as_str());
    let detail = entry
        .asnmap
        .get(origin.number())
        .ok_or(RouteLookupError::Malformed(
            "origin ASN missing from ASN map",
        ))?;

    Ok(RouteLookup::Routed(RouteDetail {
        asn: detail.asn.clone().unwrap_or_else(|| origin.to_string()),
        country: detail.country.clone().unwrap_or_default(),
        description: detail.description.clone().unwrap_or_default(),
        org: detail.org.clone().unwrap_or_default(),
        route: route.clone(),
    }))
}
