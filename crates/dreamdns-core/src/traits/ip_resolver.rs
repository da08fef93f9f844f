// # Public IP Resolver Trait
//
// Defines the interface for fetching the host's current public address.
//
// ## Implementations
//
// - HTTP address echo: `dreamdns-ip-http` crate

use async_trait::async_trait;

/// Trait for public IP resolver implementations
///
/// `resolve` returns the echo service's response body trimmed of
/// surrounding whitespace, verbatim. No address syntax validation is
/// performed: whatever text the service returns is treated as the current
/// IP. The reconciler compares these strings for equality and pushes them
/// to the provider as-is.
///
/// Implementations are pure queries: no side effects, no caching, no
/// background tasks.
#[async_trait]
pub trait IpResolver: Send + Sync {
    /// Fetch the current public IP
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: the trimmed response body
    /// - `Err(Error)`: network error, non-2xx status, or timeout
    async fn resolve(&self) -> Result<String, crate::Error>;

    /// Short source name for logging (e.g. "http-echo")
    fn source_name(&self) -> &'static str;
}
