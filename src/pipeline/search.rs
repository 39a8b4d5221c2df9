// src/pipeline/search.rs

//! Search boundary: validates a request, then runs a remote full-text search.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{RemotePostRecord, SearchConfig};
use crate::services::RemoteClient;

/// Incoming search parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub limit: Option<usize>,
}

/// Matching raw remote records and the cache policy to attach to them.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub posts: Vec<RemotePostRecord>,
    #[serde(skip)]
    pub cache_control: String,
}

/// Check `request` against the configured bounds.
///
/// Returns the trimmed query and the effective limit.
pub fn validate_search(request: &SearchRequest, config: &SearchConfig) -> Result<(String, usize)> {
    let query = request.query.trim();
    if query.is_empty() {
        return Err(AppError::validation("search query must not be empty"));
    }
    if query.chars().count() > config.max_query_len {
        return Err(AppError::validation(format!(
            "search query longer than {} characters",
            config.max_query_len
        )));
    }

    let limit = request.limit.unwrap_or(config.default_limit);
    if !(config.min_limit..=config.max_limit).contains(&limit) {
        return Err(AppError::validation(format!(
            "limit must be between {} and {}",
            config.min_limit, config.max_limit
        )));
    }

    Ok((query.to_string(), limit))
}

/// Validate and execute a search against the remote API.
pub async fn run_search(
    config: &SearchConfig,
    client: &RemoteClient,
    request: &SearchRequest,
) -> Result<SearchResponse> {
    let (query, limit) = validate_search(request, config)?;
    let posts = client.search_posts(&query, limit).await?;
    log::debug!("Search {:?} returned {} posts", query, posts.len());

    Ok(SearchResponse {
        posts,
        cache_control: config.cache_control.clone(),
    })
}
