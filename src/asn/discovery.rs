//! Company-to-ASN discovery
//!
//! Searches the BGP looking-glass for a company name, pulls candidate
//! ASNs out of the first results table, and filters out ASNs whose
//! summary page reports no announced path data.

use crate::asn::Asn;
use crate::client::{HttpClient, HttpError};
use crate::config;
use futures::stream::{self, StreamExt};
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Search page queried with the company name
pub const SEARCH_URL: &str = "https://bgp.he.net/search";

/// Base URL of the per-ASN summary page used by the validity probe
pub const SUMMARY_BASE_URL: &str = "https://bgp.he.net";

/// Summary-page marker for an ASN with no announced path data.
///
/// The upstream service exposes no structured path-count field, so the
/// probe matches this literal page text. An ASN whose summary carries it
/// is treated as de-peered and dropped.
const STALE_PATH_MARKER: &str = "Average AS Path Length (all): 0.000";

static TABLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("static selector parses"));
static ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("static selector parses"));
static CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("static selector parses"));

/// Error type for ASN discovery
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    /// The search request could not be completed
    #[error("search request failed: {0}")]
    Http(#[from] HttpError),
}

/// Discover the valid ASNs registered under a company name.
///
/// Candidates come from the search results table; each one is then
/// probed for announced path data on a bounded worker pool. A candidate
/// whose probe fails outright is dropped with a warning rather than
/// assumed valid. A company matching no rows yields an empty set.
pub async fn discover(client: &HttpClient, company: &str) -> Result<BTreeSet<Asn>, DiscoveryError> {
    let body = client
        .text(
            client
                .get(SEARCH_URL)
                .query(&[("search[search]", company), ("commit", "Search")]),
        )
        .await?;

    let candidates = collect_candidates(&body);

    let checked: Vec<Option<Asn>> = stream::iter(candidates.into_iter().map(|asn| {
        let client = client.clone();
        async move {
            match probe_is_active(&client, &asn).await {
                Ok(true) => Some(asn),
                Ok(false) => None,
                Err(e) => {
                    eprintln!("Warning: validity probe for {asn} failed, dropping it: {e}");
                    None
                }
            }
        }
    }))
    .buffered(config::lookup_concurrency())
    .collect()
    .await;

    Ok(checked.into_iter().flatten().collect())
}

/// Probe an ASN's summary page for announced path data.
///
/// Returns false when the page carries the zero-path-length marker.
pub async fn probe_is_active(client: &HttpClient, asn: &Asn) -> Result<bool, HttpError> {
    let url = format!("{SUMMARY_BASE_URL}/{}", asn.as_str());
    let body = client.text(client.get(&url)).await?;
    Ok(!body.contains(STALE_PATH_MARKER))
}

/// Extract candidate ASN ids from the first table of a search results page.
///
/// Only rows whose second data cell is labeled exactly "ASN" count; rows
/// labeled "Route" carry raw prefixes the search surface also matches,
/// which are not part of the discovery result.
fn collect_candidates(body: &str) -> BTreeSet<Asn> {
    let document = Html::parse_document(body);
    let mut candidates = BTreeSet::new();

    let Some(table) = document.select(&TABLE_SELECTOR).next() else {
        return candidates;
    };

    for row in table.select(&ROW_SELECTOR) {
        let cells: Vec<ElementRef> = row.select(&CELL_SELECTOR).collect();
        if cells.len() < 2 {
            continue;
        }
        if cell_text(&cells[1]) == "ASN" {
            candidates.insert(Asn::new(cell_text(&cells[0])));
        }
    }

    candidates
}

fn cell_text(cell: &ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_PAGE: &str = r#"
        <html><body>
        <table>
          <tr><th>Result</th><th>Type</th><th>Description</th></tr>
          <tr><td><a href="/AS111">AS111</a></td><td>ASN</td><td>Acme backbone</td></tr>
          <tr><td><a href="/AS222">AS222</a></td><td>ASN</td><td>Acme edge</td></tr>
          <tr><td><a href="/net/10.0.0.0/8">10.0.0.0/8</a></td><td>Route</td><td>Acme block</td></tr>
          <tr><td>AS111</td><td>ASN</td><td>duplicate row</td></tr>
        </table>
        <table>
          <tr><td>AS999</td><td>ASN</td><td>second table is ignored</td></tr>
        </table>
        </body></html>
    "#;

    #[test]
    fn test_collects_asn_rows_only() {
        let candidates = collect_candidates(SEARCH_PAGE);
        assert_eq!(
            candidates.iter().map(Asn::as_str).collect::<Vec<_>>(),
            vec!["AS111", "AS222"]
        );
    }

    #[test]
    fn test_duplicate_rows_dedupe() {
        let candidates = collect_candidates(SEARCH_PAGE);
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn test_no_table_yields_empty_set() {
        assert!(collect_candidates("<html><body><p>no results</p></body></html>").is_empty());
        assert!(collect_candidates("").is_empty());
    }

    #[test]
    fn test_empty_table_yields_empty_set() {
        let page = "<table><tr><th>Result</th><th>Type</th></tr></table>";
        assert!(collect_candidates(page).is_empty());
    }

    #[test]
    fn test_short_rows_are_skipped() {
        let page = r#"
            <table>
              <tr><td>AS333</td></tr>
              <tr><td>AS444</td><td>ASN</td></tr>
            </table>
        "#;
        let candidates = collect_candidates(page);
        assert_eq!(
            candidates.iter().map(Asn::as_str).collect::<Vec<_>>(),
            vec!["AS444"]
        );
    }

    #[test]
    fn test_cell_text_flattens_nested_markup() {
        let page = r#"<table><tr><td><a href="/AS555"> AS555 </a></td><td>ASN</td></tr></table>"#;
        let candidates = collect_candidates(page);
        assert_eq!(
            candidates.iter().map(Asn::as_str).collect::<Vec<_>>(),
            vec!["AS555"]
        );
    }

    #[test]
    fn test_stale_marker_detection() {
        let stale = "<html>Average AS Path Length (all): 0.000</html>";
        let active = "<html>Average AS Path Length (all): 3.714</html>";
        assert!(stale.contains(STALE_PATH_MARKER));
        assert!(!active.contains(STALE_PATH_MARKER));
    }
}
