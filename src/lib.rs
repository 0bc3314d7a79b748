//! routemap - BGP route discovery for an organization
//!
//! This library maps a company name to its Autonomous System Numbers,
//! fetches the IPv4 prefixes each ASN originates, enriches them with
//! registry and bogon metadata, and classifies single addresses against
//! BGP routes or Amazon's published cloud ranges.

pub mod asn;
pub mod client;
pub mod cloud;
pub mod config;
pub mod dns;
pub mod enrich;
pub mod pipeline;
pub mod prefix;
pub mod route;
pub mod services;

// Re-export core types for library users
pub use asn::Asn;
pub use client::{HttpClient, HttpError};
pub use cloud::{AwsIpRanges, CloudRange};
pub use config::TimingConfig;
pub use dns::DnsResolver;
pub use enrich::RouteRecord;
pub use prefix::is_ipv4_cidr;
pub use route::{RouteDetail, RouteLookup};
pub use services::Services;
