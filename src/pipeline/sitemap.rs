// src/pipeline/sitemap.rs

//! Sitemap generation pipeline.

use std::sync::Arc;

use chrono::Utc;
use futures::stream::{self, StreamExt};

use crate::error::Result;
use crate::models::{Config, shards};
use crate::render::{
    IndexEntry, homepage_only, post_entries, render_index, render_urlset, static_entries,
};
use crate::services::{RemoteClient, SitemapBatcher};
use crate::storage::DocumentStorage;

pub const INDEX_KEY: &str = "sitemap.xml";
pub const PAGES_KEY: &str = "sitemap/pages.xml";

/// Key of the child sitemap for shard `index`.
pub fn shard_key(index: usize) -> String {
    format!("sitemap/posts-{}.xml", index)
}

/// Outcome of a sitemap run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapSummary {
    pub total_posts: usize,
    pub shard_count: usize,
    /// Shards whose batch fetch failed and were written empty
    pub failed_shards: usize,
    /// Only the homepage-only fallback was written
    pub fallback: bool,
}

/// Write the sitemap index, the static pages sitemap and one child per shard.
///
/// When the post count cannot be read, a homepage-only `urlset` is written
/// to the index key instead.
pub async fn run_sitemap(
    config: &Config,
    client: Arc<RemoteClient>,
    storage: &dyn DocumentStorage,
) -> Result<SitemapSummary> {
    let batcher = SitemapBatcher::new(client, &config.sitemap, config.remote.max_concurrent);

    let total = match batcher.get_post_count().await {
        Ok(total) => total,
        Err(e) => {
            log::warn!("Post count unavailable, writing homepage-only sitemap: {}", e);
            storage
                .write_document(INDEX_KEY, &homepage_only(&config.site))
                .await?;
            return Ok(SitemapSummary {
                total_posts: 0,
                shard_count: 0,
                failed_shards: 0,
                fallback: true,
            });
        }
    };

    let parts = shards(total, batcher.batch_size());
    log::info!("Generating sitemap: {} posts in {} shard(s)", total, parts.len());

    let last_modified = batcher.shard_last_modified(total).await;
    let newest = last_modified.iter().max().copied();

    storage
        .write_document(
            PAGES_KEY,
            &render_urlset(&static_entries(&config.site, newest)),
        )
        .await?;

    let batches: Vec<_> = stream::iter(parts.iter().copied())
        .map(|shard| {
            let batcher = &batcher;
            async move { (shard, batcher.get_batch(shard.offset, shard.len).await) }
        })
        .buffered(config.remote.max_concurrent.max(1))
        .collect()
        .await;

    let mut failed_shards = 0;
    for (shard, batch) in batches {
        let entries = match batch {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Sitemap shard {} unavailable, writing it empty: {}", shard.index, e);
                failed_shards += 1;
                Vec::new()
            }
        };
        storage
            .write_document(
                &shard_key(shard.index),
                &render_urlset(&post_entries(&config.site, &entries)),
            )
            .await?;
    }

    let mut children = vec![IndexEntry {
        loc: config.site.absolute(PAGES_KEY),
        lastmod: newest.unwrap_or_else(Utc::now),
    }];
    children.extend(parts.iter().zip(&last_modified).map(|(shard, lastmod)| IndexEntry {
        loc: config.site.absolute(&shard_key(shard.index)),
        lastmod: *lastmod,
    }));

    let meta = storage
        .write_document(INDEX_KEY, &render_index(&children))
        .await?;
    log::info!(
        "Sitemap index written to {} ({} children)",
        storage.location(&meta.key),
        children.len()
    );

    Ok(SitemapSummary {
        total_posts: total,
        shard_count: parts.len(),
        failed_shards,
        fallback: false,
    })
}
