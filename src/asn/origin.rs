//! Originated-prefix lookup for a single ASN

use crate::asn::Asn;
use crate::client::{HttpClient, HttpError};
use serde::Deserialize;

/// Origin-prefixes endpoint, keyed by the numeric ASN
pub const ORIGIN_URL: &str = "https://bgp.he.net/super-lg/report/api/v1/prefixes/originated";

/// Error type for originated-prefix fetches
#[derive(Debug, thiserror::Error)]
pub enum OriginError {
    /// The fetch for this ASN failed
    #[error("originated-prefix fetch for {asn} failed: {source}")]
    Http {
        /// The ASN whose fetch failed
        asn: Asn,
        /// Underlying HTTP failure
        source: HttpError,
    },
}

#[derive(Debug, Deserialize)]
struct OriginResponse {
    #[serde(default)]
    prefixes: Vec<OriginPrefix>,
}

#[derive(Debug, Deserialize)]
struct OriginPrefix {
    #[serde(rename = "Prefix")]
    prefix: String,
}

/// Fetch every prefix an ASN originates.
///
/// Returns the raw prefix strings from the report, unfiltered; callers
/// run them through enrichment, which applies the IPv4 CIDR filter.
pub async fn originated_prefixes(
    client: &HttpClient,
    asn: &Asn,
) -> Result<Vec<String>, OriginError> {
    let url = format!("{ORIGIN_URL}/{}", asn.number());
    let response: OriginResponse =
        client
            .json(client.get(&url))
            .await
            .map_err(|source| OriginError::Http {
                asn: asn.clone(),
                source,
            })?;
    Ok(response
        .prefixes
        .into_iter()
        .map(|p| p.prefix)
        .collect())
}
