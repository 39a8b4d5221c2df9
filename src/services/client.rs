// src/services/client.rs

//! WordPress REST API client.
//!
//! Issues GET requests against paginated collection endpoints and surfaces
//! both the JSON body and the `X-WP-Total` / `X-WP-TotalPages` headers.
//! No retries happen here; callers decide whether to degrade.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};
use crate::models::{
    HEADER_TOTAL, HEADER_TOTAL_PAGES, PaginationEnvelope, PaginationHeaders, RemoteConfig,
    RemotePostRecord, Term,
};
use crate::services::cache::{CachedResponse, ResponseCache};
use crate::utils::http::{create_async_client, header_str};
use crate::utils::url::with_query;

/// Collection path for posts.
pub const POSTS_PATH: &str = "posts";

/// Collection path for categories.
pub const CATEGORIES_PATH: &str = "categories";

/// Collection path for tags.
pub const TAGS_PATH: &str = "tags";

/// Query pairs for one request.
pub type Query<'a> = [(&'a str, String)];

/// Client for the remote content API.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    client: reqwest::Client,
    base_url: String,
    strict_headers: bool,
    cache: Option<Arc<ResponseCache>>,
}

impl RemoteClient {
    /// Create a client from configuration.
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        url::Url::parse(&config.base_url)?;
        Ok(Self {
            client: create_async_client(config)?,
            base_url: config.base_url.clone(),
            strict_headers: config.strict_headers,
            cache: None,
        })
    }

    /// Attach a shared response cache.
    pub fn with_cache(mut self, cache: Arc<ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Fetch one page of a collection.
    pub async fn fetch_page<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query<'_>,
    ) -> Result<PaginationEnvelope<T>> {
        let url = with_query(&self.base_url, path, query)?;

        let response = match self.cache.as_ref().and_then(|c| c.get(&url)) {
            Some(hit) => {
                log::debug!("Cache hit for {}", url);
                hit
            }
            None => {
                let fresh = self.fetch_raw(&url).await?;
                if let Some(cache) = &self.cache {
                    cache.insert(&url, fresh.clone());
                }
                fresh
            }
        };

        let data: Vec<T> = serde_json::from_str(&response.body)?;
        Ok(PaginationEnvelope {
            data,
            headers: response.headers,
        })
    }

    async fn fetch_raw(&self, url: &str) -> Result<CachedResponse> {
        log::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(AppError::remote_api(
                status.as_u16(),
                url,
                status.canonical_reason().unwrap_or("Unknown Status"),
            ));
        }

        let raw_total = header_str(response.headers(), HEADER_TOTAL);
        let raw_pages = header_str(response.headers(), HEADER_TOTAL_PAGES);
        let headers = PaginationHeaders::from_values(raw_total, raw_pages);

        if !headers.present {
            if self.strict_headers {
                let missing = if raw_total.and_then(|v| v.parse::<u64>().ok()).is_none() {
                    HEADER_TOTAL
                } else {
                    HEADER_TOTAL_PAGES
                };
                return Err(AppError::pagination_header(url, missing));
            }
            log::debug!("Pagination headers missing for {}; reading as 0", url);
        }

        let body = response.text().await?;
        Ok(CachedResponse { body, headers })
    }

    /// Fetch one page of posts with embedded terms, media and author.
    pub async fn fetch_posts(
        &self,
        page: usize,
        per_page: usize,
    ) -> Result<PaginationEnvelope<RemotePostRecord>> {
        self.fetch_page(
            POSTS_PATH,
            &[
                ("page", page.to_string()),
                ("per_page", per_page.to_string()),
                ("_embed", "1".to_string()),
            ],
        )
        .await
    }

    /// Fetch a single post by slug.
    pub async fn fetch_post_by_slug(&self, slug: &str) -> Result<Option<RemotePostRecord>> {
        let envelope = self
            .fetch_page::<RemotePostRecord>(
                POSTS_PATH,
                &[("slug", slug.to_string()), ("_embed", "1".to_string())],
            )
            .await?;
        Ok(envelope.data.into_iter().next())
    }

    /// Full-text search over posts.
    pub async fn search_posts(
        &self,
        query: &str,
        per_page: usize,
    ) -> Result<Vec<RemotePostRecord>> {
        let envelope = self
            .fetch_page::<RemotePostRecord>(
                POSTS_PATH,
                &[
                    ("search", query.to_string()),
                    ("per_page", per_page.to_string()),
                    ("_embed", "1".to_string()),
                ],
            )
            .await?;
        Ok(envelope.data)
    }

    /// Fetch one page of a taxonomy listing (`categories` or `tags`).
    pub async fn fetch_terms(
        &self,
        path: &str,
        page: usize,
        per_page: usize,
    ) -> Result<PaginationEnvelope<Term>> {
        self.fetch_page(
            path,
            &[
                ("page", page.to_string()),
                ("per_page", per_page.to_string()),
                ("hide_empty", "true".to_string()),
            ],
        )
        .await
    }
}

/// WordPress answers an out-of-range `page` with HTTP 400.
pub fn is_page_out_of_range(error: &AppError) -> bool {
    matches!(error, AppError::RemoteApi { status: 400, .. })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::services::testing::{client_for, post_json, remote_config};

    #[tokio::test]
    async fn test_fetch_page_reads_body_and_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/wp-json/wp/v2/posts"))
            .and(query_param("page", "1"))
            .and(query_param("per_page", "1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([post_json(1, "hello", 0)]))
                    .insert_header("X-WP-Total", "137")
                    .insert_header("X-WP-TotalPages", "137"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let envelope = client
            .fetch_page::<RemotePostRecord>(
                POSTS_PATH,
                &[("page", "1".to_string()), ("per_page", "1".to_string())],
            )
            .await
            .unwrap();

        assert_eq!(envelope.data.len(), 1);
        assert_eq!(envelope.data[0].slug, "hello");
        assert_eq!(envelope.headers.total, 137);
        assert_eq!(envelope.headers.total_pages, 137);
        assert!(envelope.headers.present);
    }

    #[tokio::test]
    async fn test_user_agent_sent() {
        let server = MockServer::start().await;
        let config = remote_config(&server);
        Mock::given(method("GET"))
            .and(header("user-agent", config.user_agent.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = RemoteClient::new(&config).unwrap();
        let envelope = client
            .fetch_page::<RemotePostRecord>(POSTS_PATH, &[])
            .await
            .unwrap();
        assert!(envelope.data.is_empty());
    }

    #[tokio::test]
    async fn test_non_success_is_remote_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_posts(1, 20)
            .await
            .unwrap_err();

        match err {
            AppError::RemoteApi {
                status,
                url,
                status_text,
            } => {
                assert_eq!(status, 503);
                assert!(url.contains("/wp-json/wp/v2/posts?page=1&per_page=20"));
                assert_eq!(status_text, "Service Unavailable");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_headers_read_as_zero() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([post_json(1, "a", 0)])))
            .mount(&server)
            .await;

        let envelope = client_for(&server).fetch_posts(1, 20).await.unwrap();
        assert_eq!(envelope.headers.total, 0);
        assert_eq!(envelope.headers.total_pages, 0);
        assert!(!envelope.headers.present);
    }

    #[tokio::test]
    async fn test_strict_mode_rejects_missing_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .insert_header("X-WP-Total", "4"),
            )
            .mount(&server)
            .await;

        let mut config = remote_config(&server);
        config.strict_headers = true;
        let err = RemoteClient::new(&config)
            .unwrap()
            .fetch_posts(1, 20)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::PaginationHeader { ref header, .. } if header == HEADER_TOTAL_PAGES
        ));
    }

    #[tokio::test]
    async fn test_timeout_surfaces_as_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let mut config = remote_config(&server);
        config.timeout_secs = 1;
        let err = RemoteClient::new(&config)
            .unwrap()
            .fetch_posts(1, 20)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Http(_)));
    }

    #[tokio::test]
    async fn test_cache_deduplicates_identical_requests() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("slug", "cached"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([post_json(5, "cached", 0)]))
                    .insert_header("X-WP-Total", "1")
                    .insert_header("X-WP-TotalPages", "1"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let cache = Arc::new(ResponseCache::new(Duration::from_secs(300)));
        let client = client_for(&server).with_cache(Arc::clone(&cache));

        let first = client.fetch_post_by_slug("cached").await.unwrap().unwrap();
        let second = client.fetch_post_by_slug("cached").await.unwrap().unwrap();
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_by_slug_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let found = client_for(&server).fetch_post_by_slug("ghost").await.unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_out_of_range_detection() {
        assert!(is_page_out_of_range(&AppError::remote_api(400, "u", "Bad Request")));
        assert!(!is_page_out_of_range(&AppError::remote_api(500, "u", "Internal Server Error")));
    }
}
