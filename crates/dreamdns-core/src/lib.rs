// # dreamdns-core
//
// Core library for the dreamdns dynamic DNS updater.
//
// ## Architecture Overview
//
// - **IpResolver**: Trait for fetching the host's current public IP
// - **DnsProvider**: Trait for listing, adding, and removing provider records
// - **Reconciler**: Compares each freshly resolved IP against the last
//   observed value and, on change, drives the provider's record set toward
//   the new address
// - The fixed-interval poll loop in [`Reconciler::run`] is the only
//   control-flow engine in the system
//
// ## Design Principles
//
// 1. **Explicit state**: the last observed IP is a value the reconciler
//    owns and mutates at a single point, never an ambient global
// 2. **Fire-and-continue**: every remote call is attempted exactly once per
//    cycle; failures are logged and the loop always reaches the next tick
// 3. **Library-first**: integration crates implement the traits
//    (`dreamdns-ip-http`, `dreamdns-provider-dreamhost`); the `dreamdnsd`
//    binary only wires them together

pub mod config;
pub mod error;
pub mod reconciler;
pub mod traits;

// Re-export core types for convenience
pub use config::UpdaterConfig;
pub use error::{Error, Result};
pub use reconciler::{Reconciler, ReconcilerEvent, TickOutcome};
pub use traits::{DnsProvider, DnsRecord, IpResolver, RecordType};
