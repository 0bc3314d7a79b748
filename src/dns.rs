//! Forward DNS resolution service
//!
//! Thin wrapper over hickory's A-record lookup; the resolver is the
//! external collaborator and nothing here enriches the result.

use hickory_resolver::config::ResolverConfig;
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::TokioResolver;
use std::net::Ipv4Addr;
use std::sync::Arc;

/// Error type for forward DNS resolution
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// DNS resolution failed
    #[error("DNS resolution failed: {0}")]
    ResolutionError(String),

    /// The name resolved to no A records
    #[error("no A records found")]
    NotFound,
}

/// Forward DNS lookup service
///
/// Resolves domain names to their IPv4 addresses using a shared
/// resolver, by default configured against Cloudflare.
#[derive(Clone, Debug)]
pub struct DnsResolver {
    resolver: Arc<TokioResolver>,
}

impl DnsResolver {
    /// Create a resolver service with the default configuration
    pub fn new() -> Self {
        Self {
            resolver: Arc::new(create_default_resolver()),
        }
    }

    /// Create a resolver service around a specific resolver
    pub fn with_resolver(resolver: Arc<TokioResolver>) -> Self {
        Self { resolver }
    }

    /// Resolve a domain name's A records.
    ///
    /// # Arguments
    ///
    /// * `domain` - The name to resolve
    ///
    /// # Returns
    ///
    /// The IPv4 addresses the name resolves to, in answer order.
    pub async fn resolve(&self, domain: &str) -> Result<Vec<Ipv4Addr>, ResolveError> {
        let lookup = self
            .resolver
            .ipv4_lookup(domain)
            .await
            .map_err(|e| ResolveError::ResolutionError(e.to_string()))?;

        let addrs: Vec<Ipv4Addr> = lookup.iter().map(|record| record.0).collect();
        if addrs.is_empty() {
            return Err(ResolveError::NotFound);
        }
        Ok(addrs)
    }
}

impl Default for DnsResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a default DNS resolver
pub fn create_default_resolver() -> TokioResolver {
    TokioResolver::builder_with_config(
        ResolverConfig::cloudflare(),
        TokioConnectionProvider::default(),
    )
    .build()
}
