//! Reconciliation engine and poll loop
//!
//! The Reconciler owns the single piece of mutable state in the system,
//! the last observed public IP, and drives the provider's record set
//! toward it:
//!
//! ```text
//! ┌────────────┐  tick   ┌────────────┐  changed  ┌──────────────┐
//! │ Poll loop  │────────▶│ IpResolver │──────────▶│ DnsProvider  │
//! │ (interval) │         │ (resolve)  │           │ list/remove/ │
//! └────────────┘         └────────────┘           │ add          │
//!                                                 └──────────────┘
//! ```
//!
//! ## Reconciliation cycle
//!
//! 1. Resolve the public IP
//! 2. Compare against the cached value; equal means a no-op tick with zero
//!    provider calls
//! 3. On change: list the full record set, remove every record matching
//!    the target hostname and a configured purge type (even one whose
//!    value is already correct), then add exactly one A record with the
//!    new address
//! 4. Advance the cached value — unconditionally
//!
//! Step 4 is deliberately optimistic: the cache moves even when the remote
//! calls fail, so a transient provider outage silently desynchronizes
//! local state from provider state until the IP changes again. That
//! behavior is kept as-is and pinned down by the failure-policy contract
//! tests rather than "fixed".

use crate::config::UpdaterConfig;
use crate::traits::{DnsProvider, IpResolver, RecordType};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::IntervalStream;
use tracing::{debug, error, info, warn};

/// Capacity of the event channel; events are dropped when it fills
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Events emitted by the reconciler for external observation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcilerEvent {
    /// Poll loop started
    Started {
        hostname: String,
        poll_interval_secs: u64,
    },

    /// Baseline seeded from the provider's existing records
    BaselineSeeded { value: String },

    /// A fresh resolve differed from the cached value
    IpChanged {
        previous: Option<String>,
        current: String,
    },

    /// A reconciliation cycle finished (individual calls may have failed
    /// and been logged)
    CycleCompleted {
        ip: String,
        removed: usize,
        add_ok: bool,
    },

    /// The resolver could not produce an address this tick
    ResolveFailed { error: String },

    /// Poll loop stopped
    Stopped { reason: String },
}

/// Outcome of a single poll tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Resolved IP matched the cached value; no provider calls were made
    Unchanged,

    /// The resolver failed; state untouched, no provider calls were made
    ResolveFailed,

    /// A reconciliation cycle ran
    Applied {
        ip: String,
        removed: usize,
        add_ok: bool,
    },
}

/// Core reconciler
///
/// Owns the resolver, the provider, and the last observed IP. One logical
/// sequence (tick → resolve → optional cycle) runs to completion before
/// the next tick is considered; there is no parallelism and no locking.
///
/// ## Lifecycle
///
/// 1. Create with [`Reconciler::new()`]
/// 2. Start the poll loop with [`Reconciler::run()`]
/// 3. The loop runs until SIGINT is received; it never terminates on its
///    own
pub struct Reconciler {
    /// Resolver for the current public IP
    resolver: Box<dyn IpResolver>,

    /// Provider owning the authoritative record set
    provider: Box<dyn DnsProvider>,

    /// Hostname, purge set, interval, seeding variant
    config: UpdaterConfig,

    /// Last observed public IP
    ///
    /// `None` until baseline seeding or the first cycle. Mutated at exactly
    /// one point, at the end of a cycle, and never persisted: a restart
    /// loses it.
    last_ip: Option<String>,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<ReconcilerEvent>,
}

impl Reconciler {
    /// Create a new reconciler
    ///
    /// # Returns
    ///
    /// A tuple of (reconciler, event_receiver) where event_receiver yields
    /// reconciler events
    pub fn new(
        resolver: Box<dyn IpResolver>,
        provider: Box<dyn DnsProvider>,
        config: UpdaterConfig,
    ) -> crate::Result<(Self, mpsc::Receiver<ReconcilerEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        let reconciler = Self {
            resolver,
            provider,
            config,
            last_ip: None,
            event_tx: tx,
        };

        Ok((reconciler, rx))
    }

    /// Last observed public IP, if any
    pub fn last_ip(&self) -> Option<&str> {
        self.last_ip.as_deref()
    }

    /// Seed the baseline from the provider's current record set
    ///
    /// Takes the value of the first record matching (hostname, A). Runs
    /// exactly once, before the loop, when the configuration asks for it.
    /// A list failure or a missing record leaves the baseline empty, which
    /// only means the next tick treats the current IP as new.
    pub async fn seed_baseline(&mut self) {
        let records = match self.provider.list_records().await {
            Ok(records) => records,
            Err(e) => {
                warn!("Baseline scan failed, starting from an empty baseline: {}", e);
                return;
            }
        };

        let baseline = records
            .iter()
            .find(|r| r.record == self.config.hostname && r.record_type == RecordType::A)
            .map(|r| r.value.clone());

        match baseline {
            Some(value) => {
                info!(
                    "Seeded baseline for {} from existing record: {}",
                    self.config.hostname, value
                );
                self.emit_event(ReconcilerEvent::BaselineSeeded {
                    value: value.clone(),
                });
                self.last_ip = Some(value);
            }
            None => {
                debug!(
                    "No existing A record for {}, starting from an empty baseline",
                    self.config.hostname
                );
            }
        }
    }

    /// Run one poll tick: resolve, compare, reconcile on change
    pub async fn tick(&mut self) -> TickOutcome {
        let current = match self.resolver.resolve().await {
            Ok(ip) => ip,
            Err(e) => {
                error!(
                    "Failed to resolve public IP via {}: {}",
                    self.resolver.source_name(),
                    e
                );
                self.emit_event(ReconcilerEvent::ResolveFailed {
                    error: e.to_string(),
                });
                return TickOutcome::ResolveFailed;
            }
        };

        if self.last_ip.as_deref() == Some(current.as_str()) {
            debug!("Public IP unchanged ({}), nothing to do", current);
            return TickOutcome::Unchanged;
        }

        info!("Public IP changed: {:?} -> {}", self.last_ip, current);
        self.emit_event(ReconcilerEvent::IpChanged {
            previous: self.last_ip.clone(),
            current: current.clone(),
        });

        let (removed, add_ok) = self.reconcile(&current).await;

        // Optimistic advance: the cache moves even if the remote calls
        // failed, matching the original updater.
        self.last_ip = Some(current.clone());

        self.emit_event(ReconcilerEvent::CycleCompleted {
            ip: current.clone(),
            removed,
            add_ok,
        });

        TickOutcome::Applied {
            ip: current,
            removed,
            add_ok,
        }
    }

    /// Drive one list/remove/add cycle against the provider
    ///
    /// Every call is attempted exactly once; failures are logged and the
    /// cycle moves on. A failed list yields an empty record set, so the
    /// removal step finds nothing to do but the add still runs.
    async fn reconcile(&self, new_ip: &str) -> (usize, bool) {
        let records = match self.provider.list_records().await {
            Ok(records) => records,
            Err(e) => {
                error!(
                    "Failed to list records from {}: {}",
                    self.provider.provider_name(),
                    e
                );
                Vec::new()
            }
        };

        let hostname = &self.config.hostname;

        let mut removed = 0;
        let matching = records
            .iter()
            .filter(|r| r.record == *hostname && self.config.purge_types.contains(&r.record_type));
        for record in matching {
            // The purge is unconditional: a record whose value already
            // equals the new IP is removed and re-added too.
            match self
                .provider
                .remove_record(&record.record, record.record_type, &record.value)
                .await
            {
                Ok(()) => {
                    removed += 1;
                }
                Err(e) => {
                    error!(
                        "Failed to remove record {} (type: {}, value: {}): {}",
                        record.record, record.record_type, record.value, e
                    );
                }
            }
        }

        let add_ok = match self
            .provider
            .add_record(hostname, RecordType::A, new_ip)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                error!(
                    "Failed to add record {} (type: A, value: {}): {}",
                    hostname, new_ip, e
                );
                false
            }
        };

        (removed, add_ok)
    }

    /// Run the poll loop until a shutdown signal is received
    ///
    /// Seeds the baseline if configured, then ticks at the fixed period.
    /// Ticks that arrive while a cycle is still running are coalesced by
    /// the timer, never queued.
    pub async fn run(&mut self) -> crate::Result<()> {
        self.run_internal(None).await
    }

    /// Internal run implementation that accepts an optional shutdown signal
    async fn run_internal(
        &mut self,
        shutdown_rx: Option<oneshot::Receiver<()>>,
    ) -> crate::Result<()> {
        if self.config.seed_baseline {
            self.seed_baseline().await;
        }

        info!(
            "Polling {} every {}s (source: {}, provider: {})",
            self.config.hostname,
            self.config.poll_interval_secs,
            self.resolver.source_name(),
            self.provider.provider_name()
        );
        self.emit_event(ReconcilerEvent::Started {
            hostname: self.config.hostname.clone(),
            poll_interval_secs: self.config.poll_interval_secs,
        });

        let mut interval =
            tokio::time::interval(Duration::from_secs(self.config.poll_interval_secs));
        // Ticks that fire during a slow cycle are dropped, not queued.
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut ticks = IntervalStream::new(interval);

        if let Some(mut rx) = shutdown_rx {
            // Test mode: wait for provided shutdown signal
            loop {
                tokio::select! {
                    Some(_) = ticks.next() => {
                        self.tick().await;
                    }

                    _ = &mut rx => {
                        info!("Shutdown signal received");
                        self.emit_event(ReconcilerEvent::Stopped {
                            reason: "Shutdown signal".to_string(),
                        });
                        break;
                    }
                }
            }
        } else {
            // Production mode: wait for SIGINT
            loop {
                tokio::select! {
                    Some(_) = ticks.next() => {
                        self.tick().await;
                    }

                    _ = tokio::signal::ctrl_c() => {
                        info!("Shutdown signal received");
                        self.emit_event(ReconcilerEvent::Stopped {
                            reason: "Shutdown signal".to_string(),
                        });
                        break;
                    }
                }
            }
        }

        Ok(())
    }

    /// Test-only helper to run the loop with a controlled shutdown signal
    ///
    /// Production code should use [`Reconciler::run()`], which stops on OS
    /// signals instead of a programmatic channel.
    pub async fn run_with_shutdown(
        &mut self,
        shutdown_rx: Option<oneshot::Receiver<()>>,
    ) -> crate::Result<()> {
        self.run_internal(shutdown_rx).await
    }

    /// Emit a reconciler event
    fn emit_event(&self, event: ReconcilerEvent) {
        // Dropping events is fine: the log stream is the operator
        // interface, the channel is observational only.
        if self.event_tx.try_send(event).is_err() {
            warn!("Event channel full, dropping reconciler event");
        }
    }
}
