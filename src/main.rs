//! Catalog-Ripple main entry point
//!
//! This is the command-line interface that starts the search API.

use anyhow::Context;
use catalog_ripple::config::{load_config_with_hash, validate, Config};
use catalog_ripple::server;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Catalog-Ripple: a download-link resolver for an app catalog
///
/// Serves a small JSON API that searches the catalog, parses every result's
/// detail page, and resolves each download button to a direct file URL or a
/// magnet link.
#[derive(Parser, Debug)]
#[command(name = "catalog-ripple")]
#[command(version = "1.0.0")]
#[command(about = "A download-link resolver for an app catalog", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on, overriding the configuration file
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and print it without starting the server
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    validate(&config).context("invalid configuration")?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    server::serve(config).await.context("server failed")?;
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("catalog_ripple=info,tower_http=info,warn"),
            1 => EnvFilter::new("catalog_ripple=debug,tower_http=debug,info"),
            2 => EnvFilter::new("catalog_ripple=trace,debug"),
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
    println!("=== Catalog-Ripple Dry Run ===\n");

    println!("Server:");
    println!("  Listen: {}:{}", config.server.host, config.server.port);
    println!("  GitHub: {}", config.server.github);

    println!("\nSite:");
    println!("  Catalog: {}", config.site.base_url);
    println!("  CDN: {}", config.site.cdn_url);
    println!("  Redirect path: {}", config.site.redirect_path);
    println!("  File paths: {}", config.site.file_paths.join(", "));

    println!("\nFetcher:");
    println!("  User agent: {}", config.fetcher.user_agent);
    println!("  Max attempts: {}", config.fetcher.max_attempts);
    println!(
        "  Backoff: {}ms base, {}ms cap",
        config.fetcher.base_delay_ms, config.fetcher.max_delay_ms
    );
    println!("  Attempt timeout: {}s", config.fetcher.attempt_timeout_secs);
    println!("  Max redirects: {}", config.fetcher.max_redirects);

    println!("\nCrawler:");
    println!("  Max listing pages: {}", config.crawler.max_pages);
    println!(
        "  Max concurrent details: {}",
        config.crawler.max_concurrent_details
    );
    println!("  Max hops per link: {}", config.crawler.max_hops);
    println!("  Default limit: {}", config.crawler.default_limit);

    println!("\n✓ Configuration is valid");
}
