// src/services/sources.rs

//! Content sources the aggregator merges, in declared priority order.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{NormalizedPost, RemotePostRecord};
use crate::services::client::{RemoteClient, is_page_out_of_range};
use crate::services::files::FileSource;
use crate::services::normalize::{normalize_file, normalize_remote};

/// A provider of normalized posts.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &str;

    /// Every post this source holds.
    async fn fetch_all(&self) -> Result<Vec<NormalizedPost>>;

    /// A single post by slug, without materializing the whole collection
    /// where the source allows it.
    async fn lookup(&self, slug: &str) -> Result<Option<NormalizedPost>>;
}

/// Posts from the WordPress REST API.
pub struct RemoteSource {
    client: Arc<RemoteClient>,
    per_page: usize,
    hard_cap: usize,
    blog_prefix: String,
}

impl RemoteSource {
    pub fn new(
        client: Arc<RemoteClient>,
        per_page: usize,
        hard_cap: usize,
        blog_prefix: impl Into<String>,
    ) -> Self {
        Self {
            client,
            per_page: per_page.max(1),
            hard_cap,
            blog_prefix: blog_prefix.into(),
        }
    }

    /// Walk the paginated post collection in page order.
    ///
    /// `X-WP-TotalPages` is read once from page 1. When the server sends no
    /// pagination headers, pages are requested until one comes back short.
    /// Stops at `hard_cap` records and returns what was gathered.
    pub async fn fetch_all_remote(&self) -> Result<Vec<RemotePostRecord>> {
        let first = self.client.fetch_posts(1, self.per_page).await?;
        let headers = first.headers;
        let total_pages = headers.total_pages as usize;

        let mut seen = HashSet::new();
        let mut posts = Vec::new();
        let mut last_len = first.data.len();
        absorb(first.data, &mut seen, &mut posts);

        let mut page = 1;
        loop {
            let more_pages = if headers.present {
                page < total_pages
            } else {
                last_len == self.per_page
            };

            if posts.len() >= self.hard_cap {
                if posts.len() > self.hard_cap || more_pages {
                    log::warn!(
                        "Remote corpus exceeds hard cap of {} posts (reported total {}); stopping at page {}",
                        self.hard_cap,
                        headers.total,
                        page
                    );
                }
                posts.truncate(self.hard_cap);
                break;
            }
            if !more_pages {
                break;
            }

            page += 1;
            let envelope = match self.client.fetch_posts(page, self.per_page).await {
                Ok(envelope) => envelope,
                Err(e) if !headers.present && is_page_out_of_range(&e) => break,
                Err(e) => return Err(e),
            };
            if envelope.data.is_empty() {
                break;
            }
            last_len = envelope.data.len();
            absorb(envelope.data, &mut seen, &mut posts);
        }

        log::info!(
            "Fetched {} remote posts across {} page(s)",
            posts.len(),
            page
        );
        Ok(posts)
    }
}

/// Append records not seen before, keeping arrival order.
fn absorb(
    batch: Vec<RemotePostRecord>,
    seen: &mut HashSet<u64>,
    posts: &mut Vec<RemotePostRecord>,
) {
    for record in batch {
        if seen.insert(record.id) {
            posts.push(record);
        } else {
            log::debug!("Dropping duplicate remote post id {}", record.id);
        }
    }
}

#[async_trait]
impl ContentSource for RemoteSource {
    fn name(&self) -> &str {
        "remote"
    }

    async fn fetch_all(&self) -> Result<Vec<NormalizedPost>> {
        let records = self.fetch_all_remote().await?;
        Ok(records
            .iter()
            .map(|r| normalize_remote(r, &self.blog_prefix))
            .collect())
    }

    /// Accepts a bare slug or one under the blog prefix. Any other nested
    /// path cannot name a remote post and is left to later sources.
    async fn lookup(&self, slug: &str) -> Result<Option<NormalizedPost>> {
        let path = slug.trim_matches('/');
        let prefix = self.blog_prefix.trim_matches('/');
        let wanted = path
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|_| !prefix.is_empty())
            .unwrap_or(path);
        if wanted.is_empty() || wanted.contains('/') {
            return Ok(None);
        }
        let record = self.client.fetch_post_by_slug(wanted).await?;
        Ok(record.map(|r| normalize_remote(&r, &self.blog_prefix)))
    }
}

/// Posts from the legacy MDX content tree.
pub struct LegacySource {
    files: FileSource,
    default_author: String,
}

impl LegacySource {
    pub fn new(files: FileSource, default_author: impl Into<String>) -> Self {
        Self {
            files,
            default_author: default_author.into(),
        }
    }
}

#[async_trait]
impl ContentSource for LegacySource {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch_all(&self) -> Result<Vec<NormalizedPost>> {
        let records = self.files.scan().await;
        Ok(records
            .iter()
            .map(|r| normalize_file(r, &self.default_author))
            .collect())
    }

    async fn lookup(&self, slug: &str) -> Result<Option<NormalizedPost>> {
        Ok(self
            .files
            .lookup(slug)
            .await
            .map(|r| normalize_file(&r, &self.default_author)))
    }
}
