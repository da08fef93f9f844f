// # HTTP IP Resolver
//
// Fetches the host's public IPv4 address from a plain-text address echo
// service.
//
// The response body is trimmed and returned verbatim. The updater treats
// whatever text the service echoes as the current IP, with no syntax
// validation: garbage in the body becomes the cached value and gets pushed
// to the provider. That matches the resolver contract in dreamdns-core.

use async_trait::async_trait;
use dreamdns_core::traits::IpResolver;
use dreamdns_core::{Error, Result};
use std::time::Duration;

/// Default address echo endpoint
pub const DEFAULT_ECHO_URL: &str = "https://ipv4.icanhazip.com";

/// HTTP timeout for echo requests
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Public IP resolver backed by an HTTP address echo service
pub struct HttpIpResolver {
    /// URL to fetch the IP from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpResolver {
    /// Create a resolver against the default echo service
    pub fn new() -> Self {
        Self::with_url(DEFAULT_ECHO_URL)
    }

    /// Create a resolver against a custom echo URL
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::builder()
                .timeout(DEFAULT_HTTP_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    /// The echo URL this resolver queries
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for HttpIpResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IpResolver for HttpIpResolver {
    async fn resolve(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::transport(format!("IP echo request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::transport(format!(
                "IP echo service returned HTTP {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(format!("Failed to read IP echo response: {}", e)))?;

        let ip = body.trim().to_string();
        tracing::debug!("Resolved public IP: {}", ip);
        Ok(ip)
    }

    fn source_name(&self) -> &'static str {
        "http-echo"
    }
}
