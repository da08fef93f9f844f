// # Dreamhost DNS Provider
//
// This crate implements the `DnsProvider` trait against the Dreamhost API.
//
// ## Wire protocol
//
// Every call is a single GET to `https://api.dreamhost.com/` with query
// parameters:
//
// - `cmd`: one of `dns-list_records`, `dns-add_record`, `dns-remove_record`
// - `unique_id`: a fresh v4 UUID per call, so the server's replay
//   deduplication never collides across invocations
// - `format=json`
// - `key`: the account API key
// - `record` / `type` / `value`: the triple, for add and remove
//
// The response is a JSON envelope `{ "result": ..., "data": ... }`.
// `result == "success"` is the only success signal; `data` is the record
// array for list calls and a diagnostic payload on errors.
//
// Dreamhost has no update command: changing a record's value is
// remove-then-add, which is not atomic. The reconciler owns that hazard;
// this crate only promises one remote round trip per method call, with no
// retries, no caching, and no background tasks.
//
// ## Security
//
// The API key never appears in logs or Debug output.

use async_trait::async_trait;
use dreamdns_core::traits::{DnsProvider, DnsRecord, RecordType};
use dreamdns_core::{Error, Result};
use serde::Deserialize;
use std::time::Duration;
use uuid::Uuid;

/// Dreamhost API endpoint
const DREAMHOST_API_BASE: &str = "https://api.dreamhost.com/";

/// HTTP timeout for API requests
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Response envelope shared by every Dreamhost API command
#[derive(Debug, Deserialize)]
struct ApiResponse {
    result: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// Dreamhost DNS provider
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider lists records normally but logs
/// intended add/remove calls instead of sending them, reporting them as
/// successful. This allows exercising the full reconciliation loop without
/// touching the account's records.
pub struct DreamhostProvider {
    /// Account API key. Never logged.
    api_key: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: list normally, skip mutations
    dry_run: bool,
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for DreamhostProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DreamhostProvider")
            .field("api_key", &"<REDACTED>")
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl DreamhostProvider {
    /// Create a provider in live mode
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_mode(api_key, false)
    }

    /// Create a provider that logs intended mutations without issuing them
    pub fn new_dry_run(api_key: impl Into<String>) -> Result<Self> {
        Self::with_mode(api_key, true)
    }

    fn with_mode(api_key: impl Into<String>, dry_run: bool) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(Error::config("Dreamhost API key cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            client,
            dry_run,
        })
    }

    /// Issue one API command and decode the response envelope
    async fn call(&self, cmd: &str, params: &[(&str, &str)]) -> Result<ApiResponse> {
        let unique_id = Uuid::new_v4().to_string();
        let mut query: Vec<(&str, &str)> = vec![
            ("cmd", cmd),
            ("unique_id", unique_id.as_str()),
            ("format", "json"),
            ("key", self.api_key.as_str()),
        ];
        query.extend_from_slice(params);

        let response = self
            .client
            .get(DREAMHOST_API_BASE)
            .query(&query)
            .send()
            .await
            .map_err(|e| Error::transport(format!("{} request failed: {}", cmd, e)))?;

        if !response.status().is_success() {
            return Err(Error::transport(format!(
                "{} returned HTTP {}",
                cmd,
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(format!("Failed to read {} response: {}", cmd, e)))?;

        let parsed: ApiResponse = serde_json::from_str(&body)?;
        Ok(parsed)
    }

    /// Turn a non-"success" envelope into a protocol error carrying the
    /// provider's diagnostic payload
    fn check_result(cmd: &str, response: ApiResponse) -> Result<serde_json::Value> {
        if response.result == "success" {
            Ok(response.data)
        } else {
            Err(Error::protocol(
                cmd,
                response.result,
                response.data.to_string(),
            ))
        }
    }

    async fn mutate(
        &self,
        cmd: &str,
        record: &str,
        record_type: RecordType,
        value: &str,
    ) -> Result<()> {
        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send {} for record: {}, type: {}, value: {}",
                cmd,
                record,
                record_type,
                value
            );
            return Ok(());
        }

        let params = [
            ("record", record),
            ("type", record_type.as_str()),
            ("value", value),
        ];
        let response = self.call(cmd, &params).await?;
        Self::check_result(cmd, response)?;
        Ok(())
    }
}

#[async_trait]
impl DnsProvider for DreamhostProvider {
    async fn list_records(&self) -> Result<Vec<DnsRecord>> {
        let response = self.call("dns-list_records", &[]).await?;
        let data = Self::check_result("dns-list_records", response)?;
        let records: Vec<DnsRecord> = serde_json::from_value(data)?;
        tracing::debug!("Listed {} records", records.len());
        Ok(records)
    }

    async fn add_record(&self, record: &str, record_type: RecordType, value: &str) -> Result<()> {
        self.mutate("dns-add_record", record, record_type, value)
            .await?;
        tracing::info!(
            "Added dns record: {}, type: {}, value: {}",
            record,
            record_type,
            value
        );
        Ok(())
    }

    async fn remove_record(
        &self,
        record: &str,
        record_type: RecordType,
        value: &str,
    ) -> Result<()> {
        self.mutate("dns-remove_record", record, record_type, value)
            .await?;
        tracing::info!(
            "Removed dns record: {}, type: {}, value: {}",
            record,
            record_type,
            value
        );
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "dreamhost"
    }
}
