// # Core Traits
//
// Interfaces for the updater's two external collaborators: the public IP
// resolver and the DNS provider. Integration crates implement these;
// `dreamdns-core` only consumes them.

pub mod dns_provider;
pub mod ip_resolver;

pub use dns_provider::{DnsProvider, DnsRecord, RecordType};
pub use ip_resolver::IpResolver;
