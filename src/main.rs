//! Freshrank main entry point
//!
//! This is the command-line interface for the Freshrank crawl scheduler.

use anyhow::{Context, Result};
use clap::Parser;
use freshrank::config::{load_config_with_hash, validate, Config};
use freshrank::crawler::crawl;
use freshrank::output::{print_freshness_report, print_statistics};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Number of individual pages shown in the final freshness report
const REPORT_SAMPLES: usize = 3;

/// Freshrank: an adaptive crawl scheduler
///
/// Freshrank discovers a graph of pages from a page server, revisits pages
/// when it predicts they have changed, and periodically submits a
/// PageRank-ordered snapshot to the server's evaluation endpoint.
#[derive(Parser, Debug)]
#[command(name = "freshrank")]
#[command(version)]
#[command(about = "An adaptive crawl scheduler for updating page graphs", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Override the page server base URL
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be run without contacting the server
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(base_url) = cli.base_url {
        config.server.base_url = base_url;
    }
    validate(&config).context("Invalid configuration")?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_run(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("freshrank=info,warn"),
            1 => EnvFilter::new("freshrank=debug,info"),
            2 => EnvFilter::new("freshrank=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Freshrank Dry Run ===\n");

    println!("Server:");
    println!("  Base URL: {}", config.server.base_url);
    println!("  Root path: {}", config.server.root_path);

    println!("\nTiming:");
    println!("  Window: {}s", config.timing.window_seconds);
    println!(
        "  Submission interval: {}s",
        config.timing.submission_interval_seconds
    );
    println!("  Politeness delay: {}ms", config.timing.politeness_delay_ms);
    println!(
        "  Fallback revisit: {}s",
        config.timing.fallback_revisit_seconds
    );
    println!("  Request timeout: {}s", config.timing.request_timeout_seconds);

    println!("\nCrawler:");
    println!(
        "  Max concurrent fetches: {}",
        config.crawler.max_concurrent_fetches
    );

    println!("\nRanking:");
    println!("  Damping: {}", config.ranking.damping);
    println!("  Tolerance: {:e}", config.ranking.tolerance);
    println!("  Max iterations: {}", config.ranking.max_iterations);

    println!("\nUser Agent:");
    println!(
        "  {}/{}",
        config.user_agent.crawler_name, config.user_agent.crawler_version
    );

    let expected = (config.timing.window_seconds / config.timing.submission_interval_seconds).ceil();
    println!("\n✓ Configuration is valid");
    println!("✓ Would submit up to {} times", expected);
}

/// Handles the main run: crawl, then print statistics and the freshness report
async fn handle_run(config: Config) -> Result<()> {
    tracing::info!(
        "Starting run against {} (root '{}')",
        config.server.base_url,
        config.server.root_path
    );

    let stats = crawl(config).await.context("Run failed")?;

    println!();
    print_statistics(&stats);
    println!();
    print_freshness_report(&stats.freshness, REPORT_SAMPLES);

    Ok(())
}
