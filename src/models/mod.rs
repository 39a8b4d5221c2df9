// src/models/mod.rs

//! Domain models for the aggregator.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod content;
mod pagination;
pub(crate) mod post;
mod remote;
mod sitemap;

// Re-export all public types
pub use config::{
    CacheConfig, Config, ContentConfig, RemoteConfig, RssConfig, SearchConfig, SiteConfig,
    SitemapConfig,
};
pub use content::{FileContentRecord, FrontMatter};
pub use pagination::{
    HEADER_TOTAL, HEADER_TOTAL_PAGES, PaginationEnvelope, PaginationHeaders, page_count,
};
pub use post::{NormalizedPost, Paginated, Source, TermSummary};
pub use remote::{
    Author, Embedded, Media, RemotePostRecord, Rendered, TAXONOMY_CATEGORY, TAXONOMY_TAG, Term,
};
pub use sitemap::{Shard, SitemapEntry, shards};
