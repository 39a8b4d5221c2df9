// src/services/sitemap.rs

//! Narrow read path for sitemap generation.
//!
//! Requests only the fields a sitemap `<url>` needs and timestamps each
//! shard from the first post of its range, so no shard is downloaded twice.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};

use crate::error::Result;
use crate::models::{RemotePostRecord, SitemapConfig, SitemapEntry, shards};
use crate::services::client::{POSTS_PATH, RemoteClient, is_page_out_of_range};
use crate::utils::date::parse_timestamp;

const BATCH_FIELDS: &str = "slug,date,date_gmt,modified,modified_gmt,_links,_embedded";
const DATE_FIELDS: &str = "date,date_gmt,modified,modified_gmt";

/// Fetches sitemap projections of the remote corpus.
pub struct SitemapBatcher {
    client: Arc<RemoteClient>,
    page_size: usize,
    batch_size: usize,
    max_concurrent: usize,
}

impl SitemapBatcher {
    pub fn new(client: Arc<RemoteClient>, config: &SitemapConfig, max_concurrent: usize) -> Self {
        Self {
            client,
            page_size: config.page_size.max(1),
            batch_size: config.batch_size.max(1),
            max_concurrent: max_concurrent.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Total number of published posts, read from `X-WP-Total`.
    pub async fn get_post_count(&self) -> Result<usize> {
        let envelope = self
            .client
            .fetch_page::<RemotePostRecord>(
                POSTS_PATH,
                &[("per_page", "1".to_string()), ("_fields", "id".to_string())],
            )
            .await?;
        Ok(envelope.headers.total as usize)
    }

    /// Entries for posts `[offset, offset + limit)` in newest-first order.
    pub async fn get_batch(&self, offset: usize, limit: usize) -> Result<Vec<SitemapEntry>> {
        let mut entries = Vec::with_capacity(limit);
        if limit == 0 {
            return Ok(entries);
        }

        let mut page = offset / self.page_size + 1;
        let mut skip = offset % self.page_size;

        loop {
            let envelope = match self
                .client
                .fetch_page::<RemotePostRecord>(
                    POSTS_PATH,
                    &[
                        ("page", page.to_string()),
                        ("per_page", self.page_size.to_string()),
                        ("_fields", BATCH_FIELDS.to_string()),
                        ("_embed", "wp:featuredmedia".to_string()),
                    ],
                )
                .await
            {
                Ok(envelope) => envelope,
                Err(e) if is_page_out_of_range(&e) => break,
                Err(e) => return Err(e),
            };

            let fetched = envelope.data.len();
            let wanted = limit - entries.len();
            entries.extend(
                envelope
                    .data
                    .iter()
                    .skip(skip)
                    .take(wanted)
                    .map(sitemap_entry),
            );

            let last_page = fetched < self.page_size
                || (envelope.headers.present && page as u64 >= envelope.headers.total_pages);
            if entries.len() >= limit || last_page {
                break;
            }
            page += 1;
            skip = 0;
        }

        Ok(entries)
    }

    /// Last-modified timestamp of the post at `offset`; `None` past the end.
    pub async fn get_newest_date_at_offset(&self, offset: usize) -> Result<Option<String>> {
        let page = offset / self.page_size + 1;
        let index = offset % self.page_size;

        let envelope = match self
            .client
            .fetch_page::<RemotePostRecord>(
                POSTS_PATH,
                &[
                    ("page", page.to_string()),
                    ("per_page", self.page_size.to_string()),
                    ("_fields", DATE_FIELDS.to_string()),
                ],
            )
            .await
        {
            Ok(envelope) => envelope,
            Err(e) if is_page_out_of_range(&e) => return Ok(None),
            Err(e) => return Err(e),
        };

        Ok(envelope
            .data
            .get(index)
            .and_then(|r| r.last_modified())
            .map(str::to_string))
    }

    /// One timestamp per shard of a `total`-post corpus, indexed by shard.
    ///
    /// A shard whose lookup fails (or yields nothing) gets the most recent
    /// timestamp known across all shards, or now when none is known.
    pub async fn shard_last_modified(&self, total: usize) -> Vec<DateTime<Utc>> {
        let results: Vec<Option<DateTime<Utc>>> = stream::iter(shards(total, self.batch_size))
            .map(|shard| async move {
                match self.get_newest_date_at_offset(shard.offset).await {
                    Ok(date) => date.as_deref().and_then(parse_timestamp),
                    Err(e) => {
                        log::warn!("Timestamp lookup for sitemap shard {} failed: {}", shard.index, e);
                        None
                    }
                }
            })
            .buffered(self.max_concurrent)
            .collect()
            .await;

        let fallback = results.iter().flatten().max().copied().unwrap_or_else(Utc::now);
        results
            .into_iter()
            .map(|date| date.unwrap_or(fallback))
            .collect()
    }
}

fn sitemap_entry(record: &RemotePostRecord) -> SitemapEntry {
    SitemapEntry {
        slug: record.slug.clone(),
        date: record.last_modified().unwrap_or_default().to_string(),
        image_url: record.featured_image().map(str::to_string),
    }
}
