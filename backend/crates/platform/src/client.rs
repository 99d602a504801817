//! Outbound HTTP client utilities
//!
//! Common construction of `reqwest` clients used to talk to remote services.

use std::time::Duration;

/// Outbound HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Whole-request timeout, applied to every attempt separately
    pub request_timeout: Duration,
    /// TCP/TLS connect timeout
    pub connect_timeout: Duration,
    /// Value of the User-Agent header
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(120),
            connect_timeout: Duration::from_secs(10),
            user_agent: concat!("faceswap-api/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Error when building an HTTP client
#[derive(Debug, thiserror::Error)]
pub enum ClientBuildError {
    #[error("Failed to build HTTP client: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Build a `reqwest::Client` from the given configuration
pub fn build_http_client(config: &HttpClientConfig) -> Result<reqwest::Client, ClientBuildError> {
    let client = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .connect_timeout(config.connect_timeout)
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(client)
}
