//! Blog aggregator CLI
//!
//! Local entry point for browsing aggregated posts and generating the
//! sitemap and RSS documents.

use std::path::PathBuf;
use std::sync::Arc;

use blog_aggregator::{
    error::{AppError, Result},
    models::Config,
    pipeline::{self, SearchRequest},
    services::{Aggregator, RemoteClient, ResponseCache, SitemapBatcher},
    storage::LocalStorage,
};
use clap::{Parser, Subcommand};
use serde::Serialize;

/// Blog aggregator - WordPress and legacy MDX posts in one view
#[derive(Parser, Debug)]
#[command(
    name = "blog-aggregator",
    version,
    about = "Aggregates remote and legacy blog posts"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List one page of the merged post listing
    Posts {
        #[arg(long, default_value_t = 1)]
        page: usize,

        #[arg(long, default_value_t = 12)]
        per_page: usize,
    },

    /// Show a single post by slug
    Show { slug: String },

    /// Search remote posts
    Search {
        query: String,

        #[arg(long)]
        limit: Option<usize>,
    },

    /// Posts related to the given slug
    Related {
        slug: String,

        #[arg(long, default_value_t = 3)]
        limit: usize,
    },

    /// List remote categories with post counts
    Categories,

    /// List remote tags with post counts
    Tags,

    /// Print the remote post count
    Count,

    /// Write the sitemap index and shards
    Sitemap {
        /// Output directory
        #[arg(long, default_value = "public")]
        out: PathBuf,
    },

    /// Write the RSS feed
    Rss {
        /// Output directory
        #[arg(long, default_value = "public")]
        out: PathBuf,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = run(cli).await;
    if let Err(e) = &result {
        if e.is_client_error() {
            log::warn!("{}", e);
        } else {
            log::error!("{}", e);
        }
    }
    result
}

async fn run(cli: Cli) -> Result<()> {
    if let Command::Validate = cli.command {
        pipeline::run_validate(&cli.config)?;
        log::info!("All validations passed!");
        return Ok(());
    }

    let config = Config::load_or_default(&cli.config);
    config.validate()?;
    log::debug!("Loaded configuration from {}", cli.config.display());

    let cache = config
        .cache
        .enabled
        .then(|| Arc::new(ResponseCache::new(config.cache.ttl())));
    let mut client = RemoteClient::new(&config.remote)?;
    if let Some(cache) = cache {
        client = client.with_cache(cache);
    }
    let client = Arc::new(client);
    let aggregator = Aggregator::from_config(&config, Arc::clone(&client))?;

    match cli.command {
        Command::Posts { page, per_page } => {
            print_json(&aggregator.paginate(page, per_page).await)?;
        }

        Command::Show { slug } => match aggregator.get_by_slug(&slug).await {
            Some(post) => print_json(&post)?,
            None => return Err(AppError::not_found(format!("post {slug}"))),
        },

        Command::Search { query, limit } => {
            let response =
                pipeline::run_search(&config.search, &client, &SearchRequest { query, limit })
                    .await?;
            log::info!("Cache-Control: {}", response.cache_control);
            print_json(&response)?;
        }

        Command::Related { slug, limit } => {
            print_json(&aggregator.related(&slug, limit).await)?;
        }

        Command::Categories => print_json(&aggregator.categories().await)?,

        Command::Tags => print_json(&aggregator.tags().await)?,

        Command::Count => {
            let batcher = SitemapBatcher::new(client, &config.sitemap, config.remote.max_concurrent);
            println!("{}", batcher.get_post_count().await?);
        }

        Command::Sitemap { out } => {
            let storage = LocalStorage::new(&out);
            let summary = pipeline::run_sitemap(&config, client, &storage).await?;
            if summary.fallback {
                log::warn!("Wrote homepage-only sitemap to {}", out.display());
            } else {
                log::info!(
                    "Sitemap complete: {} posts, {} shard(s), {} failed",
                    summary.total_posts,
                    summary.shard_count,
                    summary.failed_shards
                );
            }
        }

        Command::Rss { out } => {
            let storage = LocalStorage::new(&out);
            let count = pipeline::run_rss(&config, &aggregator, &storage).await?;
            log::info!("RSS complete: {} items", count);
        }

        // handled before configuration is loaded
        Command::Validate => {}
    }

    Ok(())
}
