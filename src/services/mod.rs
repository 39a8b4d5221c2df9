//! Service layer for the aggregator.
//!
//! This module contains the business logic for:
//! - Remote API access (`RemoteClient`, `ResponseCache`)
//! - Legacy MDX content (`FileSource`)
//! - Record normalization (`normalize_remote`, `normalize_file`)
//! - Merging sources (`Aggregator`)
//! - Sitemap batching (`SitemapBatcher`)

mod aggregator;
mod cache;
mod client;
mod files;
mod normalize;
mod sitemap;
mod sources;

#[cfg(test)]
pub(crate) mod testing;

pub use aggregator::{Aggregator, paginate_posts, related_posts};
pub use cache::{CachedResponse, ResponseCache};
pub use client::{CATEGORIES_PATH, POSTS_PATH, RemoteClient, TAGS_PATH, is_page_out_of_range};
pub use files::{FileSource, WalkRules, derive_slug, split_front_matter, walk};
pub use normalize::{normalize_file, normalize_remote, post_url};
pub use sitemap::SitemapBatcher;
pub use sources::{ContentSource, LegacySource, RemoteSource};
