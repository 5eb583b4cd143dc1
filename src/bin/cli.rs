//! CLI binary for findfood.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use findfood::config::AppConfig;
use findfood::export;
use place_search::{Backend, QueryCache};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// findfood: find local restaurants through map-provider search APIs.
#[derive(Parser)]
#[command(name = "findfood", version, about)]
struct Cli {
    /// Region to search, e.g. "대전 유성구". Falls back to `region` in the config file.
    region: Option<String>,

    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend to query: kakao, naver or map-page.
    #[arg(short, long)]
    backend: Option<Backend>,

    /// Also run the expansion keyword queries (노포, 현지인 맛집, ...).
    #[arg(short, long)]
    deep: bool,

    /// Maximum pages fetched per query.
    #[arg(long)]
    pages: Option<u32>,

    /// Drop places rated below this value.
    #[arg(long)]
    min_rating: Option<f64>,

    /// Drop places with fewer reviews than this.
    #[arg(long)]
    min_reviews: Option<u32>,

    /// Drop cafes, desserts, bakeries and western food.
    #[arg(long)]
    category_focus: bool,

    /// Keep franchise branches.
    #[arg(long)]
    keep_chains: bool,

    /// Keep places outside the restaurant categories.
    #[arg(long)]
    all_categories: bool,

    /// Sort results by rating, highest first.
    #[arg(long)]
    sort_by_rating: bool,

    /// CSV output path. Defaults to "<region>_결과.csv".
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not write a CSV file.
    #[arg(long)]
    no_csv: bool,

    /// Do not print the result table.
    #[arg(long)]
    no_table: bool,

    /// Show debug logging.
    #[arg(short, long)]
    verbose: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Write a default configuration file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Users can override with RUST_LOG to see dependency logs too.
    let default_filter = if cli.verbose {
        "findfood=debug,place_search=debug"
    } else {
        "findfood=info,place_search=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(AppConfig::default_config_path);

    if let Some(Command::Init { force }) = cli.command {
        return init_config(&config_path, force);
    }

    let mut config = AppConfig::load_or_default(&config_path)?;
    config.apply_env_overrides();
    apply_flags(&cli, &mut config);

    let Some(region) = cli.region.clone().or_else(|| config.region.clone()) else {
        anyhow::bail!("no region given; pass one as an argument or set `region` in {}", config_path.display());
    };

    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received Ctrl+C, returning partial results...");
            cancel_clone.cancel();
        }
    });

    let cache = QueryCache::from_ttl_seconds(config.search.cache_ttl_seconds);
    let outcome = findfood::run_search(&config, &region, cache.as_ref(), &cancel).await?;
    let stats = &outcome.stats;

    if stats.cancelled {
        println!("Search cancelled; showing what was collected so far.");
    }
    if !stats.failures.is_empty() {
        println!("{} of {} queries failed; see log for details.", stats.failures.len(), stats.queries_run);
    }
    if outcome.records.is_empty() {
        println!("No results. Check the API key and the region text.");
        return Ok(());
    }

    println!(
        "Found {} places ({} fetched, {} after dedup).",
        outcome.records.len(),
        stats.pooled,
        stats.deduplicated
    );

    let extended = config.export.extended_columns;
    if config.export.show_table {
        println!("\n{}\n", export::render_table(&outcome.records, extended));
    }
    if !cli.no_csv {
        let path = cli.output.clone().unwrap_or_else(|| {
            export::default_export_path(config.export.output_dir.as_deref(), &region)
        });
        export::export_csv(&path, &outcome.records, extended)?;
        println!("Saved {}", path.display());
    }

    Ok(())
}

/// Merge command-line flags into the loaded configuration.
fn apply_flags(cli: &Cli, config: &mut AppConfig) {
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    if cli.deep {
        config.deep_search = true;
    }
    if let Some(pages) = cli.pages {
        config.search.max_pages = pages;
    }
    if let Some(min) = cli.min_rating {
        config.filters.min_rating = Some(min);
    }
    if let Some(min) = cli.min_reviews {
        config.filters.min_review_count = Some(min);
    }
    if cli.category_focus {
        config.filters.category_focus = true;
    }
    if cli.keep_chains {
        config.filters.chain_exclusion = false;
    }
    if cli.all_categories {
        config.filters.restaurants_only = false;
    }
    if cli.sort_by_rating {
        config.filters.sort_by_rating = true;
    }
    if cli.no_table {
        config.export.show_table = false;
    }
}

fn init_config(path: &std::path::Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists; pass --force to overwrite", path.display());
    }
    AppConfig::default().save_to_file(path)?;
    println!("Wrote {}", path.display());
    Ok(())
}
