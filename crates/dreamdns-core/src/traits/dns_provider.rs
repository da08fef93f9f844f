// # DNS Provider Trait
//
// Defines the interface for reading and mutating the provider's record set.
//
// ## Implementations
//
// - Dreamhost: `dreamdns-provider-dreamhost` crate
//
// ## Contract
//
// The provider has no "update" primitive, only add and remove. Changing a
// record's value is therefore remove-old-then-add-new, and the pair is NOT
// atomic: a crash between the two calls leaves the record either absent or
// duplicated. The [`Reconciler`](crate::Reconciler) owns that hazard;
// implementations only promise one idempotent-intent remote round trip per
// method call.
//
// Implementations must be thread-safe, stateless between calls, and must
// not retry: scheduling and failure policy belong to the reconciler.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// DNS record type, as the provider reports it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// A record (IPv4)
    A,
    /// AAAA record (IPv6)
    Aaaa,
    /// CNAME record (alias target)
    Cname,
    Mx,
    Ns,
    Txt,
    Srv,
    /// Any type this crate does not model explicitly
    #[serde(other)]
    Unknown,
}

impl RecordType {
    /// Wire representation, as used in API query parameters
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
            RecordType::Mx => "MX",
            RecordType::Ns => "NS",
            RecordType::Txt => "TXT",
            RecordType::Srv => "SRV",
            RecordType::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A DNS resource record as the provider reports it
///
/// Every field arrives as a string in the provider's JSON payload,
/// including `editable` ("0"/"1"). Records are provider-owned: the updater
/// never holds them beyond a single reconciliation cycle and always
/// re-fetches the set live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Owning account identifier
    #[serde(default)]
    pub account_id: String,

    /// Free-text comment attached to the record
    #[serde(default)]
    pub comment: String,

    /// "1" if the record can be modified through the API
    #[serde(default)]
    pub editable: String,

    /// Record hostname, e.g. "home.example.com"
    pub record: String,

    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,

    /// Record value: an address for A records, a target for CNAME
    pub value: String,

    /// Zone the record belongs to
    #[serde(default)]
    pub zone: String,
}

/// Trait for DNS provider implementations
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Fetch the full record set for the account
    ///
    /// The provider does not filter server-side; callers filter by hostname
    /// and type.
    async fn list_records(&self) -> Result<Vec<DnsRecord>, crate::Error>;

    /// Request creation of a (hostname, type, value) record
    ///
    /// Succeeds only if the provider's response payload says so; any other
    /// payload, and any transport failure, is an error.
    async fn add_record(
        &self,
        record: &str,
        record_type: RecordType,
        value: &str,
    ) -> Result<(), crate::Error>;

    /// Delete the exact (hostname, type, value) triple
    ///
    /// Same contract as [`DnsProvider::add_record`], symmetric.
    async fn remove_record(
        &self,
        record: &str,
        record_type: RecordType,
        value: &str,
    ) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
