//! Route enrichment via the bulk whois report
//!
//! One POST carries the full prefix list, keeping the request count O(1)
//! per ASN instead of one round trip per prefix. Entries that are not
//! strict IPv4 CIDR (IPv6, malformed) are dropped silently; that is the
//! filtering policy, not an oversight.

use crate::client::{HttpClient, HttpError};
use crate::prefix::is_ipv4_cidr;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Bulk whois endpoint
pub const WHOIS_URL: &str = "https://bgp.he.net/super-lg/report/api/v1/whois/prefixes";

/// Error type for route enrichment
#[derive(Debug, thiserror::Error)]
pub enum EnrichError {
    /// The bulk whois request could not be completed
    #[error("whois batch request failed: {0}")]
    Http(#[from] HttpError),
}

/// One enriched route, as printed in the `prefixes`/`routes` tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct RouteRecord {
    /// IPv4 network in CIDR notation
    #[tabled(rename = "Route")]
    pub prefix: String,
    /// ISO 3166 country name from the registry data
    #[tabled(rename = "Country")]
    pub country: String,
    /// Owning organization; empty when the registry has none on file
    #[tabled(rename = "Org")]
    pub org: String,
    /// Bogon status label from the bogon dataset
    #[tabled(rename = "Status")]
    pub status: String,
    /// Whether the prefix is announceable, i.e. not a bogon
    #[tabled(rename = "isValid")]
    pub is_valid: bool,
}

#[derive(Debug, Serialize)]
struct WhoisRequest<'a> {
    prefixes: &'a [String],
}

#[derive(Debug, Deserialize)]
struct WhoisResponse {
    #[serde(default)]
    response: Vec<WhoisEntry>,
}

#[derive(Debug, Deserialize)]
struct WhoisEntry {
    #[serde(rename = "Prefix")]
    prefix: String,
    #[serde(rename = "Org")]
    org: Option<String>,
    bogondata: BogonData,
    countrydata: CountryData,
}

#[derive(Debug, Deserialize)]
struct BogonData {
    isbogon: bool,
    status: String,
}

#[derive(Debug, Deserialize)]
struct CountryData {
    #[serde(rename = "Iso3166_Name")]
    iso3166_name: String,
}

impl From<WhoisEntry> for RouteRecord {
    fn from(entry: WhoisEntry) -> Self {
        Self {
            prefix: entry.prefix,
            country: entry.countrydata.iso3166_name,
            org: entry.org.unwrap_or_default(),
            status: entry.bogondata.status,
            is_valid: !entry.bogondata.isbogon,
        }
    }
}

/// Enrich a list of prefixes in a single batch lookup.
///
/// An empty input returns an empty result without touching the network.
/// Output keeps the order the whois report returned; entries failing the
/// IPv4 CIDR check never become records.
pub async fn enrich(
    client: &HttpClient,
    prefixes: &[String],
) -> Result<Vec<RouteRecord>, EnrichError> {
    if prefixes.is_empty() {
        return Ok(Vec::new());
    }

    let response: WhoisResponse = client
        .json(client.post(WHOIS_URL).json(&WhoisRequest { prefixes }))
        .await?;

    Ok(response
        .response
        .into_iter()
        .filter(|entry| is_ipv4_cidr(&entry.prefix))
        .map(RouteRecord::from)
        .collect())
}
