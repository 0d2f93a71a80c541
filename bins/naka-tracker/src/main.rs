//! Naka tracker binary.
//!
//! Computes the Nakamoto coefficient of every supported network, either once
//! or on a fixed interval, and reports the resulting state snapshot.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use naka_chains::{AdapterRegistry, ChainStateTracker, TrackerConfig};
use naka_core::network::NetworkId;
use naka_core::snapshot::StateSnapshot;
use naka_core::types::Threshold;
use tracing::info;

/// Per-network Nakamoto coefficient tracker.
#[derive(Parser, Debug)]
#[command(name = "naka-tracker", version, about = "Per-network Nakamoto coefficient tracker")]
struct Cli {
    /// Decentralization threshold in percent (e.g. 33.33)
    #[arg(long, global = true)]
    threshold: Option<Threshold>,

    /// Maximum number of adapters running at once
    #[arg(long, global = true)]
    max_concurrency: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Log output format ("text" or "json")
    #[arg(long, global = true, default_value = "text")]
    log_format: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a single refresh and print the snapshot as JSON.
    Once {
        /// Only refresh these networks (repeatable or comma-separated tickers)
        #[arg(long = "network", value_delimiter = ',')]
        networks: Vec<NetworkId>,
    },
    /// Refresh periodically until Ctrl+C.
    Run {
        /// Seconds between refresh cycles
        #[arg(long)]
        interval_secs: Option<u64>,
    },
    /// List the networks that have a data source.
    Networks,
}

impl Cli {
    /// Environment configuration with command-line flags applied on top.
    fn config(&self) -> Result<TrackerConfig> {
        let mut config = TrackerConfig::from_env().context("invalid environment configuration")?;
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(n) = self.max_concurrency {
            if n == 0 {
                bail!("--max-concurrency must be greater than zero");
            }
            config.max_concurrency = n;
        }
        if let Command::Run { interval_secs: Some(secs) } = self.command {
            if secs == 0 {
                bail!("--interval-secs must be greater than zero");
            }
            config.refresh_interval = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, &cli.log_format);

    let config = cli.config()?;
    let registry = Arc::new(AdapterRegistry::from_config(&config).context("failed to build adapters")?);

    match cli.command {
        Command::Networks => {
            for id in registry.networks() {
                println!("{:<6} {}", id.ticker(), id.chain_name());
            }
            Ok(())
        }
        Command::Once { networks } => {
            let mut tracker = ChainStateTracker::new(registry, &config);
            if !networks.is_empty() {
                tracker = tracker.with_networks(&networks)?;
            }
            info!(threshold = %config.threshold, networks = tracker.networks().len(), "running single refresh");
            let snapshot = tracker.refresh(&StateSnapshot::new()).await;
            println!(
                "{}",
                serde_json::to_string_pretty(&snapshot).context("failed to serialize snapshot")?
            );
            Ok(())
        }
        Command::Run { .. } => run_loop(ChainStateTracker::new(registry, &config), &config).await,
    }
}

/// Refresh forever, carrying the snapshot from one cycle to the next.
async fn run_loop(tracker: ChainStateTracker, config: &TrackerConfig) -> Result<()> {
    info!("Naka tracker v{}", env!("CARGO_PKG_VERSION"));
    info!(
        threshold = %config.threshold,
        networks = tracker.networks().len(),
        interval_secs = config.refresh_interval.as_secs(),
        max_concurrency = config.max_concurrency,
        "tracker running (Ctrl+C to stop)"
    );

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut snapshot = StateSnapshot::new();
    let mut cycle = 0u64;
    loop {
        cycle += 1;
        let next = tokio::select! {
            next = tracker.refresh(&snapshot) => next,
            res = &mut shutdown => {
                res.context("failed to listen for Ctrl+C")?;
                info!("received Ctrl+C, shutting down");
                break;
            }
        };
        snapshot = next;
        let json = serde_json::to_string(&snapshot).context("failed to serialize snapshot")?;
        info!(cycle, networks = snapshot.len(), snapshot = %json, "snapshot updated");

        tokio::select! {
            _ = tokio::time::sleep(config.refresh_interval) => {}
            res = &mut shutdown => {
                res.context("failed to listen for Ctrl+C")?;
                info!("received Ctrl+C, shutting down");
                break;
            }
        }
    }

    info!("Naka tracker shutdown complete");
    Ok(())
}

/// Initialize tracing with the given level and output format.
///
/// `RUST_LOG` takes precedence over `level`. Logs go to stderr so that
/// `once` output on stdout stays machine-readable.
fn init_logging(level: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
