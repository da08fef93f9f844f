// # dreamdnsd - Dreamhost dynamic DNS daemon
//
// Thin integration layer: parses the CLI, reads the API key from the
// environment, wires the HTTP IP resolver and the Dreamhost provider into
// the reconciler, and runs the poll loop until the process is terminated.
// All reconciliation logic lives in dreamdns-core.
//
// ## Usage
//
// ```bash
// export DREAMHOST_DNS_API_KEY=your_key
//
// dreamdnsd home.example.com
// dreamdnsd home.example.com --interval 60 --purge-cname --no-seed
// dreamdnsd home.example.com --dry-run --log-level debug
// ```
//
// The API key is environment-only so it never lands in shell history or
// process listings.

use anyhow::Result;
use clap::Parser;
use dreamdns_core::{Reconciler, RecordType, UpdaterConfig};
use dreamdns_ip_http::{DEFAULT_ECHO_URL, HttpIpResolver};
use dreamdns_provider_dreamhost::DreamhostProvider;
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Environment variable holding the Dreamhost API key
const API_KEY_ENV: &str = "DREAMHOST_DNS_API_KEY";

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DaemonExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DaemonExitCode> for ExitCode {
    fn from(code: DaemonExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Keep a Dreamhost DNS record pointed at this host's public IP
#[derive(Debug, Parser)]
#[command(name = "dreamdnsd", version, about)]
struct Cli {
    /// DNS record to manage (e.g. home.example.com)
    record: String,

    /// Poll interval in seconds
    #[arg(long, default_value_t = 1800)]
    interval: u64,

    /// Also purge CNAME records for the hostname before re-adding
    #[arg(long = "purge-cname")]
    purge_cname: bool,

    /// Start from an empty baseline instead of scanning existing records
    #[arg(long = "no-seed")]
    no_seed: bool,

    /// List records normally but log add/remove calls instead of sending them
    #[arg(long = "dry-run")]
    dry_run: bool,

    /// Address echo service URL
    #[arg(long = "ip-url", default_value = DEFAULT_ECHO_URL)]
    ip_url: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long = "log-level", default_value = "info")]
    log_level: String,
}

impl Cli {
    /// Validate the arguments beyond what clap enforces
    fn validate(&self) -> Result<()> {
        validate_domain_name(&self.record)?;

        if self.interval == 0 {
            anyhow::bail!("--interval must be at least 1 second");
        }

        if self.ip_url.is_empty() {
            anyhow::bail!("--ip-url cannot be empty");
        }
        if !self.ip_url.starts_with("https://") && !self.ip_url.starts_with("http://") {
            anyhow::bail!("--ip-url must use HTTP or HTTPS scheme. Got: {}", self.ip_url);
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "--log-level '{}' is not valid. Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }
}

/// Validate that a string is a valid domain name
///
/// Basic DNS domain name validation per RFC 1035. Not comprehensive, but
/// catches common mistakes before the first API call does.
fn validate_domain_name(domain: &str) -> Result<()> {
    if domain.is_empty() {
        anyhow::bail!("Domain name cannot be empty");
    }

    // Total length limit (RFC 1035: 253 chars max)
    if domain.len() > 253 {
        anyhow::bail!(
            "Domain name too long: {} chars (max 253). Got: {}",
            domain.len(),
            domain
        );
    }

    for label in domain.split('.') {
        if label.is_empty() {
            anyhow::bail!("Domain name has empty label: '{}'", domain);
        }

        if label.len() > 63 {
            anyhow::bail!(
                "Domain label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            );
        }

        if !label.chars().all(|c| c.is_alphanumeric() || c == '-') {
            anyhow::bail!(
                "Domain label contains invalid characters. Label: '{}'. \
                Valid: alphanumeric and hyphen only.",
                label
            );
        }

        if label.starts_with('-') || label.ends_with('-') {
            anyhow::bail!(
                "Domain label cannot start or end with hyphen. Label: '{}'",
                label
            );
        }
    }

    Ok(())
}

/// Validate the API key read from the environment
fn validate_api_key(key: &str) -> Result<()> {
    if key.is_empty() {
        anyhow::bail!(
            "{} is required. Set it via: export {}=your_key",
            API_KEY_ENV,
            API_KEY_ENV
        );
    }

    // Catch obvious placeholder keys (common mistake)
    let key_lower = key.to_lowercase();
    if key_lower.contains("your_key") || key_lower.contains("replace_me") || key_lower == "key" {
        anyhow::bail!(
            "{} appears to be a placeholder. \
            Use an actual API key from the Dreamhost panel.",
            API_KEY_ENV
        );
    }

    Ok(())
}

/// Read and validate the API key from the environment
fn load_api_key() -> Result<String> {
    let key = env::var(API_KEY_ENV).unwrap_or_default();
    validate_api_key(&key)?;
    Ok(key)
}

fn main() -> ExitCode {
    // Malformed arguments exit non-zero here, via clap
    let cli = Cli::parse();

    if let Err(e) = cli.validate() {
        eprintln!("Configuration error: {}", e);
        return DaemonExitCode::ConfigError.into();
    }

    let api_key = match load_api_key() {
        Ok(key) => key,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return DaemonExitCode::ConfigError.into();
        }
    };

    // Initialize tracing
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DaemonExitCode::ConfigError.into();
    }

    info!("Starting dreamdnsd");

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DaemonExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(cli, api_key).await {
            error!("Daemon error: {}", e);
            DaemonExitCode::RuntimeError
        } else {
            DaemonExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Wire the components together and run the poll loop
async fn run_daemon(cli: Cli, api_key: String) -> Result<()> {
    let resolver = Box::new(HttpIpResolver::with_url(cli.ip_url.clone()));

    let provider = if cli.dry_run {
        info!("Running in DRY-RUN mode - no records will be changed");
        Box::new(DreamhostProvider::new_dry_run(api_key)?)
    } else {
        Box::new(DreamhostProvider::new(api_key)?)
    };

    let mut purge_types = vec![RecordType::A];
    if cli.purge_cname {
        purge_types.push(RecordType::Cname);
    }

    let config = UpdaterConfig::new(cli.record.clone())
        .with_purge_types(purge_types)
        .with_poll_interval_secs(cli.interval)
        .with_seed_baseline(!cli.no_seed);

    let (mut reconciler, _event_rx) = Reconciler::new(resolver, provider, config)?;

    info!(
        "Managing record: {} (interval: {}s, echo: {})",
        cli.record, cli.interval, cli.ip_url
    );

    reconciler.run().await?;
    Ok(())
}
