//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// WordPress REST API client settings
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Legacy MDX content tree settings
    #[serde(default)]
    pub content: ContentConfig,

    /// Public site identity
    #[serde(default)]
    pub site: SiteConfig,

    /// Sitemap sharding settings
    #[serde(default)]
    pub sitemap: SitemapConfig,

    /// Response cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// RSS feed settings
    #[serde(default)]
    pub rss: RssConfig,

    /// Search boundary limits
    #[serde(default)]
    pub search: SearchConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.remote.base_url.trim().is_empty() {
            return Err(AppError::validation("remote.base_url is empty"));
        }
        url::Url::parse(&self.remote.base_url)?;
        if self.remote.user_agent.trim().is_empty() {
            return Err(AppError::validation("remote.user_agent is empty"));
        }
        if self.remote.timeout_secs == 0 {
            return Err(AppError::validation("remote.timeout_secs must be > 0"));
        }
        if self.remote.per_page == 0 || self.remote.per_page > 100 {
            return Err(AppError::validation(
                "remote.per_page must be between 1 and 100",
            ));
        }
        if self.remote.hard_cap == 0 {
            return Err(AppError::validation("remote.hard_cap must be > 0"));
        }
        if self.remote.max_concurrent == 0 {
            return Err(AppError::validation("remote.max_concurrent must be > 0"));
        }
        if self.content.file_names.is_empty() {
            return Err(AppError::validation("content.file_names is empty"));
        }
        if self.sitemap.batch_size == 0 {
            return Err(AppError::validation("sitemap.batch_size must be > 0"));
        }
        if self.sitemap.page_size == 0 || self.sitemap.page_size > 100 {
            return Err(AppError::validation(
                "sitemap.page_size must be between 1 and 100",
            ));
        }
        if self.search.min_limit == 0 || self.search.min_limit > self.search.max_limit {
            return Err(AppError::validation(
                "search.min_limit must be > 0 and <= search.max_limit",
            ));
        }
        if !(self.search.min_limit..=self.search.max_limit).contains(&self.search.default_limit) {
            return Err(AppError::validation(
                "search.default_limit must lie within the search limit range",
            ));
        }
        Ok(())
    }
}

/// WordPress REST API client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// REST root, e.g. `https://cms.example.com/wp-json/wp/v2`
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Page size used when walking the full post collection
    #[serde(default = "defaults::per_page")]
    pub per_page: usize,

    /// Upper bound on posts accumulated by a full walk
    #[serde(default = "defaults::hard_cap")]
    pub hard_cap: usize,

    /// Maximum concurrent requests for fan-out fetches
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Treat missing pagination headers as an error instead of zero
    #[serde(default)]
    pub strict_headers: bool,
}

impl RemoteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            per_page: defaults::per_page(),
            hard_cap: defaults::hard_cap(),
            max_concurrent: defaults::max_concurrent(),
            strict_headers: false,
        }
    }
}

/// Legacy MDX content tree settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Root directory scanned for content files
    #[serde(default = "defaults::content_root")]
    pub root_dir: PathBuf,

    /// File names treated as content entries
    #[serde(default = "defaults::file_names")]
    pub file_names: Vec<String>,

    /// Entries whose name starts with one of these are skipped
    #[serde(default = "defaults::ignore_prefixes")]
    pub ignore_prefixes: Vec<String>,

    /// Entries whose name equals one of these are skipped
    #[serde(default = "defaults::ignore_names")]
    pub ignore_names: Vec<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root_dir: defaults::content_root(),
            file_names: defaults::file_names(),
            ignore_prefixes: defaults::ignore_prefixes(),
            ignore_names: defaults::ignore_names(),
        }
    }
}

/// Public site identity used for URLs and attribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute site origin without trailing slash
    #[serde(default = "defaults::site_url")]
    pub url: String,

    /// Site title
    #[serde(default = "defaults::site_title")]
    pub title: String,

    /// Site description
    #[serde(default = "defaults::site_description")]
    pub description: String,

    /// Author attributed to legacy file posts
    #[serde(default = "defaults::site_author")]
    pub author: String,

    /// Path prefix for remote post URLs
    #[serde(default = "defaults::blog_prefix")]
    pub blog_prefix: String,
}

impl SiteConfig {
    /// Join a site-relative path onto the site origin.
    pub fn absolute(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: defaults::site_url(),
            title: defaults::site_title(),
            description: defaults::site_description(),
            author: defaults::site_author(),
            blog_prefix: defaults::blog_prefix(),
        }
    }
}

/// Sitemap sharding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitemapConfig {
    /// Posts per child sitemap file
    #[serde(default = "defaults::batch_size")]
    pub batch_size: usize,

    /// Remote page size used to fill a batch
    #[serde(default = "defaults::page_size")]
    pub page_size: usize,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            batch_size: defaults::batch_size(),
            page_size: defaults::page_size(),
        }
    }
}

/// Response cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "defaults::cache_enabled")]
    pub enabled: bool,

    /// Entry lifetime in seconds
    #[serde(default = "defaults::cache_ttl")]
    pub ttl_secs: u64,
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::cache_enabled(),
            ttl_secs: defaults::cache_ttl(),
        }
    }
}

/// RSS feed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RssConfig {
    /// Number of most recent posts in the feed
    #[serde(default = "defaults::rss_limit")]
    pub limit: usize,

    /// Maximum description length in characters
    #[serde(default = "defaults::rss_description_length")]
    pub description_length: usize,
}

impl Default for RssConfig {
    fn default() -> Self {
        Self {
            limit: defaults::rss_limit(),
            description_length: defaults::rss_description_length(),
        }
    }
}

/// Search boundary limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "defaults::max_query_len")]
    pub max_query_len: usize,

    #[serde(default = "defaults::min_limit")]
    pub min_limit: usize,

    #[serde(default = "defaults::max_limit")]
    pub max_limit: usize,

    #[serde(default = "defaults::default_limit")]
    pub default_limit: usize,

    /// Cache-Control value attached to search results
    #[serde(default = "defaults::search_cache_control")]
    pub cache_control: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_query_len: defaults::max_query_len(),
            min_limit: defaults::min_limit(),
            max_limit: defaults::max_limit(),
            default_limit: defaults::default_limit(),
            cache_control: defaults::search_cache_control(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Remote defaults
    pub fn base_url() -> String {
        "https://cms.example.com/wp-json/wp/v2".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; BlogAggregator/1.0)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn per_page() -> usize {
        20
    }
    pub fn hard_cap() -> usize {
        2000
    }
    pub fn max_concurrent() -> usize {
        5
    }

    // Content defaults
    pub fn content_root() -> PathBuf {
        PathBuf::from("content")
    }
    pub fn file_names() -> Vec<String> {
        vec!["page.mdx".into()]
    }
    pub fn ignore_prefixes() -> Vec<String> {
        vec!["_".into(), ".".into()]
    }
    pub fn ignore_names() -> Vec<String> {
        vec!["node_modules".into()]
    }

    // Site defaults
    pub fn site_url() -> String {
        "https://www.example.com".into()
    }
    pub fn site_title() -> String {
        "Blog".into()
    }
    pub fn site_description() -> String {
        "Latest articles".into()
    }
    pub fn site_author() -> String {
        "Editorial Team".into()
    }
    pub fn blog_prefix() -> String {
        "/blog/".into()
    }

    // Sitemap defaults
    pub fn batch_size() -> usize {
        1000
    }
    pub fn page_size() -> usize {
        100
    }

    // Cache defaults
    pub fn cache_enabled() -> bool {
        true
    }
    pub fn cache_ttl() -> u64 {
        300
    }

    // RSS defaults
    pub fn rss_limit() -> usize {
        20
    }
    pub fn rss_description_length() -> usize {
        300
    }

    // Search defaults
    pub fn max_query_len() -> usize {
        100
    }
    pub fn min_limit() -> usize {
        1
    }
    pub fn max_limit() -> usize {
        50
    }
    pub fn default_limit() -> usize {
        10
    }
    pub fn search_cache_control() -> String {
        "public, s-maxage=60, stale-while-revalidate=300".into()
    }
}
