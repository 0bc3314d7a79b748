//! Global timing and concurrency configuration with compile-time defaults
//! and a one-shot runtime override
//!
//! Default values are defined as constants; the CLI may override them once
//! at startup via [`set_config`].

use once_cell::sync::OnceCell;
use std::time::Duration;

/// Default per-request timeout in milliseconds
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
/// Default TCP connect timeout in milliseconds
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;
/// Default number of attempts for a transiently-failing request
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
/// Default initial retry backoff in milliseconds (doubles per attempt)
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 250;
/// Default number of concurrent upstream lookups (validity probes and
/// per-ASN origin/enrich round trips)
pub const DEFAULT_LOOKUP_CONCURRENCY: usize = 8;

/// Runtime override for the timing defaults, set once at program startup.
#[derive(Debug, Clone)]
pub struct TimingConfig {
    /// Per-request timeout
    pub request_timeout: Duration,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Attempts per request before giving up
    pub retry_attempts: u32,
    /// Initial backoff between attempts
    pub retry_backoff: Duration,
    /// Width of the bounded lookup pool
    pub lookup_concurrency: usize,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            connect_timeout: Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS),
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_backoff: Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS),
            lookup_concurrency: DEFAULT_LOOKUP_CONCURRENCY,
        }
    }
}

static OVERRIDE_CONFIG: OnceCell<TimingConfig> = OnceCell::new();

/// Get the per-request timeout
pub fn request_timeout() -> Duration {
    OVERRIDE_CONFIG
        .get()
        .map(|c| c.request_timeout)
        .unwrap_or_else(|| Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS))
}

/// Get the TCP connect timeout
pub fn connect_timeout() -> Duration {
    OVERRIDE_CONFIG
        .get()
        .map(|c| c.connect_timeout)
        .unwrap_or_else(|| Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS))
}

/// Get the number of attempts per request
pub fn retry_attempts() -> u32 {
    OVERRIDE_CONFIG
        .get()
        .map(|c| c.retry_attempts)
        .unwrap_or(DEFAULT_RETRY_ATTEMPTS)
}

/// Get the initial retry backoff
pub fn retry_backoff() -> Duration {
    OVERRIDE_CONFIG
        .get()
        .map(|c| c.retry_backoff)
        .unwrap_or_else(|| Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS))
}

/// Get the width of the bounded lookup pool
pub fn lookup_concurrency() -> usize {
    OVERRIDE_CONFIG
        .get()
        .map(|c| c.lookup_concurrency)
        .unwrap_or(DEFAULT_LOOKUP_CONCURRENCY)
        .max(1)
}

/// Set the global timing configuration
///
/// This should be called once at program startup if custom timing is
/// needed. Returns an error carrying the rejected value if the
/// configuration has already been set.
pub fn set_config(config: TimingConfig) -> Result<(), TimingConfig> {
    OVERRIDE_CONFIG.set(config)
}

/// Check if a custom timing configuration has been set
pub fn is_custom_config_set() -> bool {
    OVERRIDE_CONFIG.get().is_some()
}
