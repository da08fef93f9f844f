//! Configuration types for the updater
//!
//! This module defines the configuration consumed by the reconciler and
//! its poll loop.

use crate::traits::RecordType;
use serde::{Deserialize, Serialize};

/// Configuration for the reconciler and its poll loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdaterConfig {
    /// Hostname whose records are kept pointed at the current public IP
    pub hostname: String,

    /// Record types purged when the IP changes
    ///
    /// The new address is always published as a single A record; this set
    /// only controls what gets removed first. `[A]` is the plain updater;
    /// `[A, Cname]` force-normalizes a hostname that may have been parked
    /// on a CNAME.
    #[serde(default = "default_purge_types")]
    pub purge_types: Vec<RecordType>,

    /// Fixed poll period in seconds. No backoff, no jitter.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Seed the last observed IP from the provider's existing records at
    /// startup
    ///
    /// When false the baseline starts empty and the first resolved IP
    /// always triggers a reconciliation cycle.
    #[serde(default = "default_seed_baseline")]
    pub seed_baseline: bool,
}

impl UpdaterConfig {
    /// Create a configuration for a hostname with default settings
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            purge_types: default_purge_types(),
            poll_interval_secs: default_poll_interval_secs(),
            seed_baseline: default_seed_baseline(),
        }
    }

    /// Set the record types purged on change
    pub fn with_purge_types(mut self, purge_types: Vec<RecordType>) -> Self {
        self.purge_types = purge_types;
        self
    }

    /// Set the poll period in seconds
    pub fn with_poll_interval_secs(mut self, secs: u64) -> Self {
        self.poll_interval_secs = secs;
        self
    }

    /// Enable or disable startup baseline seeding
    pub fn with_seed_baseline(mut self, seed_baseline: bool) -> Self {
        self.seed_baseline = seed_baseline;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.hostname.is_empty() {
            return Err(crate::Error::config("hostname cannot be empty"));
        }

        if self.purge_types.is_empty() {
            return Err(crate::Error::config("purge_types cannot be empty"));
        }

        // The published record is always an A record; purging must cover it
        // or every cycle would pile up duplicates.
        if !self.purge_types.contains(&RecordType::A) {
            return Err(crate::Error::config("purge_types must include A"));
        }

        if self.poll_interval_secs == 0 {
            return Err(crate::Error::config("poll_interval_secs must be > 0"));
        }

        Ok(())
    }
}

fn default_purge_types() -> Vec<RecordType> {
    vec![RecordType::A]
}

fn default_poll_interval_secs() -> u64 {
    1800
}

fn default_seed_baseline() -> bool {
    true
}
