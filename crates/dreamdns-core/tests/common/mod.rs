//! Test doubles shared by the reconciler contract tests
//!
//! The resolver replays a scripted sequence of results; the provider
//! serves a fixed record set and tracks every call it receives. Both are
//! cheap clones over shared counters so tests keep a handle after moving
//! a boxed copy into the reconciler.

#![allow(dead_code)]

use async_trait::async_trait;
use dreamdns_core::config::UpdaterConfig;
use dreamdns_core::error::{Error, Result};
use dreamdns_core::traits::{DnsProvider, DnsRecord, IpResolver, RecordType};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A resolver that replays a scripted sequence of results
#[derive(Clone, Default)]
pub struct ScriptedResolver {
    inner: Arc<ResolverInner>,
}

#[derive(Default)]
struct ResolverInner {
    script: Mutex<VecDeque<std::result::Result<String, String>>>,
    calls: AtomicUsize,
}

impl ScriptedResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful resolve returning `ip`
    pub fn push_ip(&self, ip: &str) {
        self.inner
            .script
            .lock()
            .unwrap()
            .push_back(Ok(ip.to_string()));
    }

    /// Queue a transport failure
    pub fn push_failure(&self, msg: &str) {
        self.inner
            .script
            .lock()
            .unwrap()
            .push_back(Err(msg.to_string()));
    }

    /// Number of times resolve() was called
    pub fn call_count(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IpResolver for ScriptedResolver {
    async fn resolve(&self) -> Result<String> {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);
        match self.inner.script.lock().unwrap().pop_front() {
            Some(Ok(ip)) => Ok(ip),
            Some(Err(msg)) => Err(Error::transport(msg)),
            None => Err(Error::transport("resolver script exhausted")),
        }
    }

    fn source_name(&self) -> &'static str {
        "scripted"
    }
}

/// A mock DnsProvider that serves a fixed record set and tracks calls
#[derive(Clone, Default)]
pub struct MockProvider {
    inner: Arc<ProviderInner>,
}

#[derive(Default)]
struct ProviderInner {
    records: Mutex<Vec<DnsRecord>>,
    fail_list: AtomicBool,
    /// Provider `result` string a failing add should report
    add_failure: Mutex<Option<String>>,
    list_calls: AtomicUsize,
    add_calls: AtomicUsize,
    remove_calls: AtomicUsize,
    added: Mutex<Vec<(String, RecordType, String)>>,
    removed: Mutex<Vec<(String, RecordType, String)>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider whose list call returns `records`
    pub fn with_records(records: Vec<DnsRecord>) -> Self {
        let provider = Self::default();
        *provider.inner.records.lock().unwrap() = records;
        provider
    }

    /// Make every list call fail with a transport error
    pub fn fail_list(&self) {
        self.inner.fail_list.store(true, Ordering::SeqCst);
    }

    /// Make every add call fail with a protocol error carrying `result`
    pub fn fail_add(&self, result: &str) {
        *self.inner.add_failure.lock().unwrap() = Some(result.to_string());
    }

    pub fn list_calls(&self) -> usize {
        self.inner.list_calls.load(Ordering::SeqCst)
    }

    pub fn add_calls(&self) -> usize {
        self.inner.add_calls.load(Ordering::SeqCst)
    }

    pub fn remove_calls(&self) -> usize {
        self.inner.remove_calls.load(Ordering::SeqCst)
    }

    /// (hostname, type, value) triples passed to add_record, in order
    pub fn added(&self) -> Vec<(String, RecordType, String)> {
        self.inner.added.lock().unwrap().clone()
    }

    /// (hostname, type, value) triples passed to remove_record, in order
    pub fn removed(&self) -> Vec<(String, RecordType, String)> {
        self.inner.removed.lock().unwrap().clone()
    }
}

#[async_trait]
impl DnsProvider for MockProvider {
    async fn list_records(&self) -> Result<Vec<DnsRecord>> {
        self.inner.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.inner.fail_list.load(Ordering::SeqCst) {
            return Err(Error::transport("connection refused"));
        }
        Ok(self.inner.records.lock().unwrap().clone())
    }

    async fn add_record(&self, record: &str, record_type: RecordType, value: &str) -> Result<()> {
        self.inner.add_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.added.lock().unwrap().push((
            record.to_string(),
            record_type,
            value.to_string(),
        ));
        if let Some(result) = self.inner.add_failure.lock().unwrap().clone() {
            return Err(Error::protocol(
                "dns-add_record",
                result,
                "\"internal_error\"",
            ));
        }
        Ok(())
    }

    async fn remove_record(
        &self,
        record: &str,
        record_type: RecordType,
        value: &str,
    ) -> Result<()> {
        self.inner.remove_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.removed.lock().unwrap().push((
            record.to_string(),
            record_type,
            value.to_string(),
        ));
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Build an A record the way the provider would report it
pub fn a_record(host: &str, value: &str) -> DnsRecord {
    DnsRecord {
        account_id: "123456".to_string(),
        comment: String::new(),
        editable: "1".to_string(),
        record: host.to_string(),
        record_type: RecordType::A,
        value: value.to_string(),
        zone: "example.com".to_string(),
    }
}

/// Build a CNAME record the way the provider would report it
pub fn cname_record(host: &str, target: &str) -> DnsRecord {
    DnsRecord {
        record_type: RecordType::Cname,
        ..a_record(host, target)
    }
}

/// Build a record of an arbitrary type
pub fn typed_record(host: &str, record_type: RecordType, value: &str) -> DnsRecord {
    DnsRecord {
        record_type,
        ..a_record(host, value)
    }
}

/// Config used by most contract tests: no baseline seeding, 1s period
pub fn test_config(hostname: &str) -> UpdaterConfig {
    UpdaterConfig::new(hostname)
        .with_seed_baseline(false)
        .with_poll_interval_secs(1)
}
