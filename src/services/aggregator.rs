// src/services/aggregator.rs

//! Merged, read-only view over every content source.
//!
//! Anticipated failures (a source being down, a malformed file, an unknown
//! slug) resolve to reduced but valid results rather than errors.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;

use crate::error::Result;
use crate::models::{Config, NormalizedPost, Paginated, TermSummary, page_count};
use crate::services::client::{CATEGORIES_PATH, RemoteClient, TAGS_PATH};
use crate::services::files::FileSource;
use crate::services::sources::{ContentSource, LegacySource, RemoteSource};

/// Page size used when listing taxonomy terms.
const TERMS_PER_PAGE: usize = 100;

/// Aggregates posts from prioritized sources.
pub struct Aggregator {
    sources: Vec<Arc<dyn ContentSource>>,
    terms_client: Option<Arc<RemoteClient>>,
}

impl Aggregator {
    /// Build from sources listed in priority order (earlier wins).
    pub fn new(sources: Vec<Arc<dyn ContentSource>>) -> Self {
        Self {
            sources,
            terms_client: None,
        }
    }

    /// Use `client` for category and tag listings.
    pub fn with_terms_client(mut self, client: Arc<RemoteClient>) -> Self {
        self.terms_client = Some(client);
        self
    }

    /// Standard setup: remote source first, then legacy files.
    pub fn from_config(config: &Config, client: Arc<RemoteClient>) -> Result<Self> {
        let remote = RemoteSource::new(
            Arc::clone(&client),
            config.remote.per_page,
            config.remote.hard_cap,
            config.site.blog_prefix.clone(),
        );
        let legacy = LegacySource::new(FileSource::new(&config.content)?, config.site.author.clone());

        Ok(Self::new(vec![Arc::new(remote), Arc::new(legacy)]).with_terms_client(client))
    }

    /// Every post from every source.
    ///
    /// Sources run concurrently. Each source's posts are sorted newest first
    /// and groups are concatenated in source priority order.
    pub async fn get_all_combined(&self) -> Vec<NormalizedPost> {
        let results = join_all(self.sources.iter().map(|source| async move {
            (source.name().to_string(), source.fetch_all().await)
        }))
        .await;

        let mut combined = Vec::new();
        for (name, result) in results {
            match result {
                Ok(mut posts) => {
                    posts.sort_by(|a, b| b.date.cmp(&a.date));
                    log::debug!("Source {} yielded {} posts", name, posts.len());
                    combined.extend(posts);
                }
                Err(e) => log::warn!("Source {} failed, continuing without it: {}", name, e),
            }
        }
        combined
    }

    /// First match for `slug`, trying sources in priority order.
    pub async fn get_by_slug(&self, slug: &str) -> Option<NormalizedPost> {
        for source in &self.sources {
            match source.lookup(slug).await {
                Ok(Some(post)) => return Some(post),
                Ok(None) => {}
                Err(e) => log::warn!("Lookup of {} in {} failed: {}", slug, source.name(), e),
            }
        }
        None
    }

    /// Case-insensitive search over titles, descriptions, tags and categories.
    pub async fn search(&self, query: &str) -> Vec<NormalizedPost> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.get_all_combined()
            .await
            .into_iter()
            .filter(|p| p.matches(&needle))
            .collect()
    }

    /// A 1-based page of the merged listing.
    pub async fn paginate(&self, page: usize, per_page: usize) -> Paginated {
        paginate_posts(self.get_all_combined().await, page, per_page)
    }

    /// Posts sharing categories or tags with `slug`, best first.
    pub async fn related(&self, slug: &str, limit: usize) -> Vec<NormalizedPost> {
        related_posts(&self.get_all_combined().await, slug, limit)
    }

    pub async fn posts_in_category(&self, name: &str) -> Vec<NormalizedPost> {
        self.get_all_combined()
            .await
            .into_iter()
            .filter(|p| p.has_category(name))
            .collect()
    }

    pub async fn posts_with_tag(&self, name: &str) -> Vec<NormalizedPost> {
        self.get_all_combined()
            .await
            .into_iter()
            .filter(|p| p.has_tag(name))
            .collect()
    }

    /// Remote categories with post counts; empty on failure.
    pub async fn categories(&self) -> Vec<TermSummary> {
        self.list_terms(CATEGORIES_PATH).await
    }

    /// Remote tags with post counts; empty on failure.
    pub async fn tags(&self) -> Vec<TermSummary> {
        self.list_terms(TAGS_PATH).await
    }

    async fn list_terms(&self, path: &str) -> Vec<TermSummary> {
        let Some(client) = &self.terms_client else {
            return Vec::new();
        };

        let mut terms = Vec::new();
        let mut page = 1;
        loop {
            let envelope = match client.fetch_terms(path, page, TERMS_PER_PAGE).await {
                Ok(envelope) => envelope,
                Err(e) => {
                    log::warn!("Failed to list {}: {}", path, e);
                    return Vec::new();
                }
            };
            let fetched = envelope.data.len();
            terms.extend(envelope.data.into_iter().map(|t| TermSummary {
                name: t.name,
                slug: t.slug,
                count: t.count.unwrap_or(0),
            }));

            let last = if envelope.headers.present {
                page as u64 >= envelope.headers.total_pages
            } else {
                fetched < TERMS_PER_PAGE
            };
            if last || fetched == 0 {
                break;
            }
            page += 1;
        }

        terms.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
        terms
    }
}

/// Slice a listing into 1-based pages. Out-of-range pages are empty.
pub fn paginate_posts(posts: Vec<NormalizedPost>, page: usize, per_page: usize) -> Paginated {
    let total = posts.len();
    let total_pages = page_count(total, per_page);

    let posts = if page == 0 || per_page == 0 {
        Vec::new()
    } else {
        posts
            .into_iter()
            .skip((page - 1).saturating_mul(per_page))
            .take(per_page)
            .collect()
    };

    Paginated {
        posts,
        total,
        total_pages,
        current_page: page,
    }
}

/// Whether `post` is addressed by `slug` (bare or path form).
fn slug_matches(post: &NormalizedPost, slug: &str) -> bool {
    post.slug == slug || post.slug.trim_matches('/') == slug.trim_matches('/')
}

/// Relatedness of `candidate` to a post with the given terms.
fn score(candidate: &NormalizedPost, categories: &HashSet<&str>, tags: &HashSet<&str>) -> usize {
    let shared_categories = candidate
        .categories
        .iter()
        .map(String::as_str)
        .collect::<HashSet<_>>()
        .intersection(categories)
        .count();
    let shared_tags = candidate
        .tags
        .iter()
        .map(String::as_str)
        .collect::<HashSet<_>>()
        .intersection(tags)
        .count();
    2 * shared_categories + shared_tags
}

/// Rank `posts` against the one addressed by `slug`.
///
/// Score is `2 * shared categories + shared tags`; only positive scores are
/// kept, ties keep listing order. Unknown slug gives an empty list.
pub fn related_posts(posts: &[NormalizedPost], slug: &str, limit: usize) -> Vec<NormalizedPost> {
    let Some(target_index) = posts.iter().position(|p| slug_matches(p, slug)) else {
        return Vec::new();
    };
    let target = &posts[target_index];
    let categories: HashSet<&str> = target.categories.iter().map(String::as_str).collect();
    let tags: HashSet<&str> = target.tags.iter().map(String::as_str).collect();

    let mut scored: Vec<(usize, &NormalizedPost)> = posts
        .iter()
        .enumerate()
        .filter(|(i, p)| *i != target_index && !slug_matches(p, &target.slug))
        .map(|(_, p)| (score(p, &categories, &tags), p))
        .filter(|(s, _)| *s > 0)
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored
        .into_iter()
        .take(limit)
        .map(|(_, p)| p.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use async_trait::async_trait;
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::error::AppError;
    use crate::models::Source;
    use crate::models::post::fixtures::post;
    use crate::services::testing::{API_PATH, client_for, corpus, mount_pages, remote_config};

    struct StaticSource {
        name: &'static str,
        posts: Vec<NormalizedPost>,
        fail: bool,
    }

    #[async_trait]
    impl ContentSource for StaticSource {
        fn name(&self) -> &str {
            self.name
        }

        async fn fetch_all(&self) -> Result<Vec<NormalizedPost>> {
            if self.fail {
                return Err(AppError::remote_api(502, "https://cms.test", "Bad Gateway"));
            }
            Ok(self.posts.clone())
        }

        async fn lookup(&self, slug: &str) -> Result<Option<NormalizedPost>> {
            if self.fail {
                return Err(AppError::remote_api(502, "https://cms.test", "Bad Gateway"));
            }
            Ok(self.posts.iter().find(|p| slug_matches(p, slug)).cloned())
        }
    }

    fn fixed(name: &'static str, posts: Vec<NormalizedPost>) -> Arc<dyn ContentSource> {
        Arc::new(StaticSource {
            name,
            posts,
            fail: false,
        })
    }

    fn failing(name: &'static str) -> Arc<dyn ContentSource> {
        Arc::new(StaticSource {
            name,
            posts: Vec::new(),
            fail: true,
        })
    }

    fn as_file(mut p: NormalizedPost) -> NormalizedPost {
        p.source = Source::File;
        p.slug = format!("/legacy/{}", p.slug);
        p.url = p.slug.clone();
        p
    }

    fn thirty_posts() -> Vec<NormalizedPost> {
        (0..30).map(|i| post(&format!("p{i}"), 28 - (i % 28) as u32, &[], &[])).collect()
    }

    #[tokio::test]
    async fn test_combined_orders_by_source_then_date() {
        let aggregator = Aggregator::new(vec![
            fixed("remote", vec![post("old", 1, &[], &[]), post("new", 9, &[], &[])]),
            fixed("file", vec![as_file(post("newest", 20, &[], &[]))]),
        ]);

        let slugs: Vec<String> = aggregator
            .get_all_combined()
            .await
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(slugs, vec!["new", "old", "/legacy/newest"]);
    }

    #[tokio::test]
    async fn test_remote_failure_keeps_file_posts() {
        let aggregator = Aggregator::new(vec![
            failing("remote"),
            fixed("file", vec![as_file(post("kept", 3, &[], &[]))]),
        ]);

        let posts = aggregator.get_all_combined().await;
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].source, Source::File);
    }

    #[tokio::test]
    async fn test_get_by_slug_falls_back_in_priority_order() {
        let aggregator = Aggregator::new(vec![
            failing("remote"),
            fixed("file", vec![as_file(post("archived", 3, &[], &[]))]),
        ]);
        assert!(aggregator.get_by_slug("/legacy/archived").await.is_some());
        assert!(aggregator.get_by_slug("missing").await.is_none());

        let aggregator = Aggregator::new(vec![
            fixed("remote", vec![post("dup", 5, &["A"], &[])]),
            fixed("file", vec![post("dup", 6, &["B"], &[])]),
        ]);
        let found = aggregator.get_by_slug("dup").await.unwrap();
        assert_eq!(found.categories, vec!["A"]);
    }

    #[tokio::test]
    async fn test_search_case_insensitive() {
        let aggregator = Aggregator::new(vec![fixed(
            "remote",
            vec![
                post("a", 1, &["Backend"], &["Rust"]),
                post("b", 2, &["Frontend"], &["CSS"]),
            ],
        )]);
        let hits = aggregator.search("  RUST ").await;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].slug, "a");
        assert_eq!(aggregator.search("frontend").await.len(), 1);
        assert!(aggregator.search("   ").await.is_empty());
    }

    #[test]
    fn test_paginate_third_page_of_thirty() {
        let posts = thirty_posts();
        let page = paginate_posts(posts.clone(), 3, 12);
        assert_eq!(page.posts.len(), 6);
        assert_eq!(page.posts[0], posts[24]);
        assert_eq!(page.posts[5], posts[29]);
        assert_eq!(page.total, 30);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.current_page, 3);
    }

    #[test]
    fn test_paginate_out_of_range() {
        let posts = thirty_posts();
        assert!(paginate_posts(posts.clone(), 4, 12).posts.is_empty());
        assert!(paginate_posts(posts.clone(), 0, 12).posts.is_empty());
        let zero = paginate_posts(posts, 1, 0);
        assert!(zero.posts.is_empty());
        assert_eq!(zero.total_pages, 0);
    }

    #[test]
    fn test_related_scenario_score_three() {
        let posts = vec![
            post("target", 5, &["Backend"], &["AI", "Go"]),
            post("match", 4, &["Backend"], &["AI"]),
        ];
        let categories: HashSet<&str> = ["Backend"].into_iter().collect();
        let tags: HashSet<&str> = ["AI", "Go"].into_iter().collect();
        assert_eq!(score(&posts[1], &categories, &tags), 3);

        let related = related_posts(&posts, "target", 5);
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].slug, "match");
    }

    #[test]
    fn test_related_invariants() {
        let posts = vec![
            post("target", 9, &["Backend", "Ops"], &["Rust", "AI"]),
            post("tag-only", 8, &[], &["Rust"]),
            post("none", 7, &["Design"], &["CSS"]),
            post("cat-and-tag", 6, &["Backend"], &["AI"]),
            post("two-cats", 5, &["Backend", "Ops"], &[]),
            post("tag-only-2", 4, &[], &["AI"]),
        ];

        let related = related_posts(&posts, "target", 10);
        let slugs: Vec<&str> = related.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["two-cats", "cat-and-tag", "tag-only", "tag-only-2"]);
        assert!(!slugs.contains(&"target"));

        let categories: HashSet<&str> = ["Backend", "Ops"].into_iter().collect();
        let tags: HashSet<&str> = ["Rust", "AI"].into_iter().collect();
        let scores: Vec<usize> = related.iter().map(|p| score(p, &categories, &tags)).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        assert!(scores.iter().all(|s| *s > 0));

        assert_eq!(related_posts(&posts, "target", 2).len(), 2);
        assert!(related_posts(&posts, "unknown", 5).is_empty());
    }

    #[tokio::test]
    async fn test_category_and_tag_filters() {
        let aggregator = Aggregator::new(vec![fixed(
            "remote",
            vec![
                post("a", 1, &["Backend"], &["Rust"]),
                post("b", 2, &["Frontend"], &["rust"]),
            ],
        )]);
        assert_eq!(aggregator.posts_in_category("backend").await.len(), 1);
        assert_eq!(aggregator.posts_with_tag("RUST").await.len(), 2);
    }

    #[tokio::test]
    async fn test_terms_listing_sorted_and_degrades() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{API_PATH}/categories")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([
                        {"id": 1, "name": "News", "slug": "news", "taxonomy": "category", "count": 3},
                        {"id": 2, "name": "Backend", "slug": "backend", "taxonomy": "category", "count": 9},
                        {"id": 3, "name": "Art", "slug": "art", "taxonomy": "category", "count": 3}
                    ]))
                    .insert_header("X-WP-Total", "3")
                    .insert_header("X-WP-TotalPages", "1"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("{API_PATH}/tags")))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = Arc::new(client_for(&server));
        let aggregator = Aggregator::new(Vec::new()).with_terms_client(client);

        let names: Vec<String> = aggregator.categories().await.into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["Backend", "Art", "News"]);
        assert!(aggregator.tags().await.is_empty());
    }

    fn write_legacy(root: &Path) {
        let dir = root.join("blog/legacy-post");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("page.mdx"),
            "---\ntitle: Legacy\ndescription: Old\ndate: 2020-01-01\ncategories: [News]\n---\nBody\n",
        )
        .unwrap();
    }

    fn from_config(server: &MockServer, root: &Path) -> Aggregator {
        let mut config = Config::default();
        config.remote = remote_config(server);
        config.content.root_dir = root.to_path_buf();
        Aggregator::from_config(&config, Arc::new(client_for(server))).unwrap()
    }

    #[tokio::test]
    async fn test_from_config_end_to_end_and_idempotent() {
        let server = MockServer::start().await;
        mount_pages(&server, &corpus(25), 20, false).await;
        let tmp = TempDir::new().unwrap();
        write_legacy(tmp.path());

        let aggregator = from_config(&server, tmp.path());
        let first = aggregator.get_all_combined().await;
        let second = aggregator.get_all_combined().await;

        assert_eq!(first.len(), 26);
        assert_eq!(first, second);
        assert_eq!(first[0].slug, "post-0");
        assert_eq!(first[25].url, "/blog/legacy-post");
        assert_eq!(first[25].author.as_deref(), Some("Editorial Team"));
    }

    #[tokio::test]
    async fn test_remote_down_serves_file_posts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        let tmp = TempDir::new().unwrap();
        write_legacy(tmp.path());

        let aggregator = from_config(&server, tmp.path());
        let posts = aggregator.get_all_combined().await;
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].source, Source::File);

        let found = aggregator.get_by_slug("legacy-post").await.unwrap();
        assert_eq!(found.source, Source::File);
        assert_eq!(aggregator.paginate(1, 12).await.total, 1);
    }

    #[tokio::test]
    async fn test_get_by_slug_prefers_targeted_remote_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("slug", "post-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                crate::services::testing::post_json(24, "post-1", 1)
            ])))
            .expect(1)
            .mount(&server)
            .await;
        let tmp = TempDir::new().unwrap();

        let aggregator = from_config(&server, tmp.path());
        let found = aggregator.get_by_slug("post-1").await.unwrap();
        assert_eq!(found.source, Source::Remote);

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
    }

    #[tokio::test]
    async fn test_get_by_slug_nested_path_resolves_to_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("slug", "intro"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                crate::services::testing::post_json(7, "intro", 0)
            ])))
            .mount(&server)
            .await;
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("guides/intro");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("page.mdx"), "---\ntitle: Intro guide\n---\nBody\n").unwrap();

        let aggregator = from_config(&server, tmp.path());
        let found = aggregator.get_by_slug("/guides/intro").await.unwrap();
        assert_eq!(found.url, "/guides/intro");
        assert_eq!(found.source, Source::File);

        let remote = aggregator.get_by_slug("/blog/intro").await.unwrap();
        assert_eq!(remote.source, Source::Remote);
    }
}
