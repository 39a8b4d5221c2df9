// src/pipeline/rss.rs

//! RSS feed pipeline.

use crate::error::Result;
use crate::models::{Config, NormalizedPost};
use crate::render::render_feed;
use crate::services::Aggregator;
use crate::storage::{DocumentStorage, WriteMetadata};

pub const FEED_KEY: &str = "rss.xml";

/// The `limit` most recent posts across all sources.
pub fn recent_posts(mut posts: Vec<NormalizedPost>, limit: usize) -> Vec<NormalizedPost> {
    posts.sort_by(|a, b| b.date.cmp(&a.date));
    posts.truncate(limit);
    posts
}

/// Render and store the feed. Returns the number of items written.
pub async fn run_rss(
    config: &Config,
    aggregator: &Aggregator,
    storage: &dyn DocumentStorage,
) -> Result<usize> {
    let posts = recent_posts(aggregator.get_all_combined().await, config.rss.limit);
    let feed = render_feed(&config.site, &config.rss, &posts);

    let WriteMetadata { key, bytes } = storage.write_document(FEED_KEY, &feed).await?;
    log::info!(
        "RSS feed with {} items written to {} ({} bytes)",
        posts.len(),
        storage.location(&key),
        bytes
    );
    Ok(posts.len())
}
