//! Service container for the routemap library
//!
//! Bundles the shared HTTP client and DNS resolver so the pipeline can
//! be handed one value instead of a parameter list. Services are
//! cheaply cloneable handles over shared state.

use crate::client::HttpClient;
use crate::dns::DnsResolver;
use std::sync::Arc;

/// Container for the collaborators every command may need
///
/// # Examples
///
/// ```no_run
/// use routemap::services::Services;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let services = Services::new();
///     let addrs = services.dns.resolve("example.com").await?;
///     println!("{addrs:?}");
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Services {
    /// Shared HTTP client with timeout and retry policy
    pub http: HttpClient,
    /// Forward DNS resolution service
    pub dns: Arc<DnsResolver>,
}

impl Services {
    /// Create services with the default configuration
    pub fn new() -> Self {
        Self {
            http: HttpClient::new(),
            dns: Arc::new(DnsResolver::new()),
        }
    }

    /// Create services from custom implementations
    ///
    /// Any service not provided is created with default configuration.
    pub fn with_services(http: Option<HttpClient>, dns: Option<DnsResolver>) -> Self {
        Self {
            http: http.unwrap_or_default(),
            dns: Arc::new(dns.unwrap_or_default()),
        }
    }
}

impl Default for Services {
    fn default() -> Self {
        Self::new()
    }
}
