// src/utils/url.rs

//! URL manipulation utilities.

use url::Url;

use crate::error::Result;

/// Join a relative path onto a base URL, keeping any path already on the base.
///
/// # Examples
/// ```
/// use blog_aggregator::utils::url::join;
///
/// assert_eq!(
///     join("https://cms.example.com/wp-json/wp/v2/", "/posts"),
///     "https://cms.example.com/wp-json/wp/v2/posts"
/// );
/// ```
pub fn join(base: &str, path: &str) -> String {
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        return base.trim_end_matches('/').to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), path)
}

/// Build a request URL from a base, a path and query pairs.
///
/// Pairs are percent-encoded in the order given.
pub fn with_query(base: &str, path: &str, query: &[(&str, String)]) -> Result<String> {
    let mut url = Url::parse(&join(base, path))?;
    if !query.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
    }
    Ok(url.to_string())
}

/// Normalize a site-relative path to exactly one leading slash and no trailing slash.
///
/// # Examples
/// ```
/// use blog_aggregator::utils::url::normalize_path;
///
/// assert_eq!(normalize_path("blog//old-post/"), "/blog/old-post");
/// assert_eq!(normalize_path(""), "/");
/// ```
pub fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}
