//! Pipeline entry points for aggregator operations.
//!
//! - `run_sitemap`: Write the sitemap index and its shards
//! - `run_rss`: Write the RSS feed of recent posts
//! - `run_search`: Validate and execute a search request
//! - `run_validate`: Check a configuration file

pub mod rss;
pub mod search;
pub mod sitemap;
pub mod validate;

pub use rss::{FEED_KEY, recent_posts, run_rss};
pub use search::{SearchRequest, SearchResponse, run_search, validate_search};
pub use sitemap::{INDEX_KEY, PAGES_KEY, SitemapSummary, run_sitemap, shard_key};
pub use validate::run_validate;
