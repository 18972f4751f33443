//! Talk-Harvest main entry point
//!
//! This is the command-line interface for the Talk-Harvest ingester.

use clap::Parser;
use std::path::PathBuf;
use talk_harvest::config::{load_config_with_hash, Config};
use talk_harvest::crawler::run_crawl;
use talk_harvest::url::listing_page_url;
use tracing_subscriber::EnvFilter;

/// Talk-Harvest: a paginated talk catalogue ingester
///
/// Walks the talk listing page by page, visits every talk, and upserts its
/// title, author, keywords and media download URL into a SQLite store.
#[derive(Parser, Debug)]
#[command(name = "talk-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A paginated talk catalogue ingester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Stop after this many listing pages (overrides max-pages)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    max_pages: Option<u32>,

    /// SQLite database to write to (overrides database-path)
    #[arg(long, value_name = "PATH")]
    database: Option<String>,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = Some(max_pages);
    }
    if let Some(database) = cli.database {
        config.output.database_path = database;
    }

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(&config, &config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("talk_harvest=info,warn"),
            1 => EnvFilter::new("talk_harvest=debug,info"),
            2 => EnvFilter::new("talk_harvest=trace,debug"),
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

/// Handles the --dry-run mode: shows the resolved configuration
fn handle_dry_run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Talk-Harvest Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Listing URL: {}", config.crawler.listing_url);
    println!("  Page parameter: {}", config.crawler.page_param);
    println!("  Talk link selector: {}", config.crawler.talk_link_selector);
    match config.crawler.max_pages {
        Some(max) => println!("  Max pages: {}", max),
        None => println!("  Max pages: unbounded (stops at first empty page)"),
    }
    println!(
        "  Request timeout: {}s",
        config.crawler.request_timeout_secs
    );

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);

    let base = url::Url::parse(&config.crawler.listing_url)?;
    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would start at {}",
        listing_page_url(&base, &config.crawler.page_param, 1)
    );

    Ok(())
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    use std::path::Path;
    use talk_harvest::output::{load_statistics, print_statistics};
    use talk_harvest::storage::open_storage;

    println!("Database: {}\n", config.output.database_path);

    let storage = open_storage(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);
    storage.close()?;

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, config_hash: &str) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Harvesting talks from {}", config.crawler.listing_url);

    match run_crawl(config, config_hash).await {
        Ok(stats) => {
            tracing::info!(
                "Harvest completed: {} talks processed across {} listing pages",
                stats.items_found,
                stats.pages_visited
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
