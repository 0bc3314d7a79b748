//! IPv4 CIDR validation
//!
//! Enrichment output only ever contains prefixes that pass this check;
//! anything else (IPv6, malformed input) is dropped rather than errored.

use regex::Regex;
use std::sync::LazyLock;

/// Strict dotted-quad + prefix-length grammar: octets 0-255, length 1-32.
static IPV4_CIDR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)/(?:[1-9]|1[0-9]|2[0-9]|3[0-2])$",
    )
    .expect("static CIDR pattern compiles")
});

/// Returns true iff `s` is an IPv4 network in CIDR notation.
///
/// A prefix length of 0 is rejected along with anything above 32.
pub fn is_ipv4_cidr(s: &str) -> bool {
    IPV4_CIDR.is_match(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_valid_cidrs() {
        assert!(is_ipv4_cidr("10.0.0.0/8"));
        assert!(is_ipv4_cidr("192.168.1.0/24"));
        assert!(is_ipv4_cidr("0.0.0.0/1"));
        assert!(is_ipv4_cidr("255.255.255.255/32"));
        assert!(is_ipv4_cidr("104.16.0.0/12"));
    }

    #[test]
    fn test_rejects_bad_prefix_lengths() {
        assert!(!is_ipv4_cidr("10.0.0.0/0"));
        assert!(!is_ipv4_cidr("10.0.0.0/33"));
        assert!(!is_ipv4_cidr("10.0.0.0/"));
        assert!(!is_ipv4_cidr("10.0.0.0"));
    }

    #[test]
    fn test_rejects_bad_octets() {
        assert!(!is_ipv4_cidr("256.0.0.0/8"));
        assert!(!is_ipv4_cidr("1.2.3/24"));
        assert!(!is_ipv4_cidr("1.2.3.4.5/24"));
        assert!(!is_ipv4_cidr("a.b.c.d/24"));
    }

    #[test]
    fn test_rejects_ipv6() {
        assert!(!is_ipv4_cidr("2001:db8::/32"));
        assert!(!is_ipv4_cidr("::1/128"));
    }

    #[test]
    fn test_rejects_whitespace_and_garbage() {
        assert!(!is_ipv4_cidr(" 10.0.0.0/8"));
        assert!(!is_ipv4_cidr("10.0.0.0/8 "));
        assert!(!is_ipv4_cidr("10.0.0.0/8x"));
        assert!(!is_ipv4_cidr(""));
    }
}
