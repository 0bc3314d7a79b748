//! Shared HTTP client with per-request timeouts and bounded retry
//!
//! All upstream round trips go through [`HttpClient`], which owns a single
//! pooled [`reqwest::Client`] and retries transient transport failures
//! (connect errors, timeouts) with exponential backoff before surfacing a
//! single aggregated error.

use crate::config;
use serde::de::DeserializeOwned;

/// Error type for HTTP operations
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// Request failed at the transport level and was not retryable
    #[error("request failed: {0}")]
    Transport(String),

    /// Transient failures persisted through every retry attempt
    #[error("giving up after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
        /// The error from the final attempt
        last_error: String,
    },

    /// The server answered with a non-success status code
    #[error("unexpected status {status} from {url}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// The response body could not be read or decoded
    #[error("unexpected response body: {0}")]
    Body(String),
}

/// HTTP client shared by every upstream service
#[derive(Clone, Debug)]
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    /// Create a client using the global timing configuration
    pub fn new() -> Self {
        let inner = reqwest::Client::builder()
            .user_agent(concat!("routemap/", env!("CARGO_PKG_VERSION")))
            .timeout(config::request_timeout())
            .connect_timeout(config::connect_timeout())
            .build()
            .expect("Failed to create HTTP client");
        Self { inner }
    }

    /// Start building a GET request
    pub fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.inner.get(url)
    }

    /// Start building a POST request
    pub fn post(&self, url: &str) -> reqwest::RequestBuilder {
        self.inner.post(url)
    }

    /// Send a request, retrying transient transport failures
    ///
    /// Non-transient errors and non-success status codes fail immediately;
    /// connect failures and timeouts are retried with doubling backoff
    /// until the configured attempt budget is spent.
    pub async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, HttpError> {
        let attempts = config::retry_attempts().max(1);
        let mut backoff = config::retry_backoff();
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            let req = request
                .try_clone()
                .ok_or_else(|| HttpError::Transport("request body is not retryable".into()))?;

            match req.send().await {
                Ok(response) => {
                    let status = response.status();
                    if !status.is_success() {
                        return Err(HttpError::Status {
                            status: status.as_u16(),
                            url: response.url().to_string(),
                        });
                    }
                    return Ok(response);
                }
                Err(e) if e.is_timeout() || e.is_connect() => {
                    last_error = e.to_string();
                    if attempt < attempts {
                        tokio::time::sleep(backoff).await;
                        backoff *= 2;
                    }
                }
                Err(e) => return Err(HttpError::Transport(e.to_string())),
            }
        }

        Err(HttpError::RetriesExhausted {
            attempts,
            last_error,
        })
    }

    /// Send a request and return the response body as text
    pub async fn text(&self, request: reqwest::RequestBuilder) -> Result<String, HttpError> {
        self.send(request)
            .await?
            .text()
            .await
            .map_err(|e| HttpError::Body(e.to_string()))
    }

    /// Send a request and decode the response body as JSON
    pub async fn json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, HttpError> {
        self.send(request)
            .await?
            .json()
            .await
            .map_err(|e| HttpError::Body(e.to_string()))
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}
