//! AWS cloud IP-range classification
//!
//! Loads Amazon's published ip-ranges document once into an immutable
//! longest-prefix lookup table. The published table repeats a prefix
//! once per service, so entries merge their service lists on load.

use crate::client::{HttpClient, HttpError};
use ipnet::Ipv4Net;
use serde::Deserialize;
use std::collections::{btree_map::Entry, BTreeMap, BTreeSet};
use std::net::Ipv4Addr;

/// Amazon's published IP range document
pub const AWS_IP_RANGES_URL: &str = "https://ip-ranges.amazonaws.com/ip-ranges.json";

/// Error type for range-table loading
#[derive(Debug, thiserror::Error)]
pub enum CloudError {
    /// The range document could not be fetched
    #[error("failed to load AWS IP ranges: {0}")]
    Http(#[from] HttpError),
}

/// One published range with its merged service list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudRange {
    /// The advertised IPv4 network
    pub prefix: Ipv4Net,
    /// AWS region the range belongs to
    pub region: String,
    /// Services announced over the range, deduplicated and sorted
    pub services: BTreeSet<String>,
}

#[derive(Debug, Deserialize)]
struct JsonIpRanges {
    #[serde(default)]
    prefixes: Vec<JsonIpPrefix>,
}

#[derive(Debug, Deserialize)]
struct JsonIpPrefix {
    ip_prefix: String,
    region: String,
    service: String,
}

/// Immutable lookup table over Amazon's published IPv4 ranges
///
/// Constructed once at startup and queried read-only afterwards.
#[derive(Debug)]
pub struct AwsIpRanges {
    prefixes: BTreeMap<Ipv4Net, CloudRange>,
}

impl AwsIpRanges {
    /// Fetch and index the current range document
    pub async fn load(client: &HttpClient) -> Result<Self, CloudError> {
        let document: JsonIpRanges = client.json(client.get(AWS_IP_RANGES_URL)).await?;
        Ok(Self::from_entries(document.prefixes))
    }

    fn from_entries(entries: Vec<JsonIpPrefix>) -> Self {
        let mut prefixes: BTreeMap<Ipv4Net, CloudRange> = BTreeMap::new();
        for entry in entries {
            // The document also lists IPv6 under a separate key; any
            // prefix that is not IPv4 CIDR is out of scope here
            let Ok(net) = entry.ip_prefix.parse::<Ipv4Net>() else {
                continue;
            };
            match prefixes.entry(net) {
                Entry::Occupied(mut occupied) => {
                    occupied.get_mut().services.insert(entry.service);
                }
                Entry::Vacant(vacant) => {
                    vacant.insert(CloudRange {
                        prefix: net,
                        region: entry.region,
                        services: BTreeSet::from([entry.service]),
                    });
                }
            }
        }
        Self { prefixes }
    }

    /// Find the most specific published range containing an address
    pub fn find(&self, addr: Ipv4Addr) -> Option<&CloudRange> {
        self.prefixes
            .values()
            .filter(|range| range.prefix.contains(&addr))
            .max_by_key(|range| range.prefix.prefix_len())
    }

    /// Number of distinct prefixes in the table
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> AwsIpRanges {
        let json = r#"{
            "prefixes": [
                {"ip_prefix": "3.5.140.0/22", "region": "ap-northeast-2", "service": "AMAZON", "network_border_group": "ap-northeast-2"},
                {"ip_prefix": "3.5.140.0/22", "region": "ap-northeast-2", "service": "S3", "network_border_group": "ap-northeast-2"},
                {"ip_prefix": "3.5.0.0/16", "region": "ap-northeast-2", "service": "EC2", "network_border_group": "ap-northeast-2"},
                {"ip_prefix": "52.93.178.234/32", "region": "us-west-2", "service": "AMAZON", "network_border_group": "us-west-2"}
            ]
        }"#;
        let document: JsonIpRanges = serde_json::from_str(json).unwrap();
        AwsIpRanges::from_entries(document.prefixes)
    }

    #[test]
    fn test_duplicate_prefixes_merge_services() {
        let table = sample_table();
        assert_eq!(table.len(), 3);
        let range = table.find("3.5.140.77".parse().unwrap()).unwrap();
        assert_eq!(
            range.services.iter().cloned().collect::<Vec<_>>(),
            vec!["AMAZON", "S3"]
        );
    }

    #[test]
    fn test_most_specific_prefix_wins() {
        let table = sample_table();
        // Both 3.5.0.0/16 and 3.5.140.0/22 contain this address
        let range = table.find("3.5.140.1".parse().unwrap()).unwrap();
        assert_eq!(range.prefix, "3.5.140.0/22".parse::<Ipv4Net>().unwrap());

        // Only the /16 contains this one
        let range = table.find("3.5.1.1".parse().unwrap()).unwrap();
        assert_eq!(range.prefix, "3.5.0.0/16".parse::<Ipv4Net>().unwrap());
    }

    #[test]
    fn test_address_outside_every_range() {
        let table = sample_table();
        assert!(table.find("192.0.2.1".parse().unwrap()).is_none());
    }

    #[test]
    fn test_host_route_match() {
        let table = sample_table();
        let range = table.find("52.93.178.234".parse().unwrap()).unwrap();
        assert_eq!(range.region, "us-west-2");
        assert!(!range.services.is_empty());
    }

    #[test]
    fn test_non_ipv4_entries_are_skipped() {
        let json = r#"{"prefixes": [{"ip_prefix": "2600:1f00::/24", "region": "us-east-1", "service": "AMAZON"}]}"#;
        let document: JsonIpRanges = serde_json::from_str(json).unwrap();
        let table = AwsIpRanges::from_entries(document.prefixes);
        assert!(table.is_empty());
    }
}
