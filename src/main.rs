//! Truyen-Harvest main entry point
//!
//! This is the command-line interface for the Truyen-Harvest catalog crawler.

use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use truyen_harvest::config::{default_config, load_config, Config};
use truyen_harvest::crawler::crawl;
use truyen_harvest::output::{print_summary, write_snapshot};

/// Truyen-Harvest: a concurrent novel catalog crawler
///
/// Crawls a paginated catalog, follows listings to detail pages and a
/// bounded number of chapters per novel, and writes the deduplicated
/// dataset out as JSON files.
#[derive(Parser, Debug)]
#[command(name = "truyen-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A concurrent novel catalog crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show the effective configuration without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => {
            tracing::info!("No config file given, using built-in defaults");
            default_config()?
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("truyen_harvest=info,warn"),
            1 => EnvFilter::new("truyen_harvest=debug,info"),
            2 => EnvFilter::new("truyen_harvest=trace,debug"),
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

/// Handles the --dry-run mode: prints the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Truyen-Harvest Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  User-Agent: {}", config.site.user_agent);

    println!("\nLimits:");
    println!("  Listing pages: {}", config.limits.max_pages);
    println!("  Novel sample size: {}", config.limits.novel_sample_size);
    println!(
        "  Max chapters per novel: {}",
        config.limits.max_chapters_per_novel
    );
    println!("  Content cap: {} bytes", config.limits.content_cap_bytes);

    println!("\nWorkers:");
    println!("  Pages: {}", config.workers.pages);
    println!("  Novels: {}", config.workers.novels);
    println!("  Chapters (process-wide): {}", config.workers.chapters);

    println!("\nRetry:");
    println!("  Max attempts: {}", config.retry.max_retries);
    println!("  Base delay: {}ms", config.retry.base_delay_ms);

    println!("\nOutput directory: {}", config.output.directory);

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    let output_dir = config.output.directory.clone();

    // Ctrl-C stops new work; in-flight requests are abandoned and whatever
    // was gathered so far is still persisted
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupt received, stopping new work");
                cancel.cancel();
            }
        });
    }

    let start = Instant::now();
    let snapshot = crawl(config, cancel).await?;

    write_snapshot(&snapshot, Path::new(&output_dir))?;
    print_summary(&snapshot, start.elapsed());

    Ok(())
}
