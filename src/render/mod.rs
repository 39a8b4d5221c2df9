//! XML documents generated from aggregated content.
//!
//! - `sitemap`: sitemap index, child `urlset`s and the homepage-only fallback
//! - `rss`: RSS 2.0 feed of recent posts

pub mod rss;
pub mod sitemap;

pub use rss::{FEED_PATH, render_feed};
pub use sitemap::{
    ChangeFreq, IndexEntry, UrlEntry, homepage_only, post_entries, render_index, render_urlset,
    static_entries,
};
