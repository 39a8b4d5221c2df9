//! Sitemap projections.

use serde::{Deserialize, Serialize};

/// Minimal projection of a post needed for a sitemap `<url>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitemapEntry {
    pub slug: String,
    /// Last-modified timestamp as delivered by the API
    pub date: String,
    pub image_url: Option<String>,
}

/// A contiguous range of the post corpus written to one child sitemap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shard {
    pub index: usize,
    pub offset: usize,
    pub len: usize,
}

/// Split `[0, total)` into consecutive shards of `batch_size`.
pub fn shards(total: usize, batch_size: usize) -> Vec<Shard> {
    if batch_size == 0 {
        return Vec::new();
    }
    (0..total.div_ceil(batch_size))
        .map(|index| {
            let offset = index * batch_size;
            Shard {
                index,
                offset,
                len: batch_size.min(total - offset),
            }
        })
        .collect()
}
