//! Shared fixtures for service tests: a mock WordPress corpus.

use chrono::{Duration, TimeZone, Utc};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::models::RemoteConfig;
use crate::services::client::RemoteClient;

pub const API_PATH: &str = "/wp-json/wp/v2";

pub fn remote_config(server: &MockServer) -> RemoteConfig {
    RemoteConfig {
        base_url: format!("{}{}", server.uri(), API_PATH),
        ..RemoteConfig::default()
    }
}

pub fn client_for(server: &MockServer) -> RemoteClient {
    RemoteClient::new(&remote_config(server)).unwrap()
}

/// Timestamp for the post at `position` in a newest-first corpus.
pub fn timestamp(position: usize) -> String {
    let base = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    (base - Duration::hours(position as i64))
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string()
}

/// A post as WordPress would embed it.
pub fn post_json(id: u64, slug: &str, position: usize) -> Value {
    json!({
        "id": id,
        "date": timestamp(position),
        "date_gmt": timestamp(position),
        "modified": timestamp(position),
        "modified_gmt": timestamp(position),
        "slug": slug,
        "title": {"rendered": format!("Post {slug}")},
        "excerpt": {"rendered": format!("<p>About {slug}</p>")},
        "categories": [1],
        "tags": [],
        "_embedded": {
            "author": [{"name": "Writer"}],
            "wp:term": [[{"id": 1, "name": "News", "slug": "news", "taxonomy": "category"}], []]
        }
    })
}

/// Newest-first corpus of `total` posts with slugs `post-0 .. post-{total-1}`.
pub fn corpus(total: usize) -> Vec<Value> {
    (0..total)
        .map(|i| post_json((total - i) as u64, &format!("post-{i}"), i))
        .collect()
}

/// Mount one mock per page of `posts` at `per_page`, each expected exactly once
/// when `expect_each` is set.
pub async fn mount_pages(server: &MockServer, posts: &[Value], per_page: usize, expect_each: bool) {
    let total = posts.len();
    let pages = total.div_ceil(per_page).max(1);

    for page in 1..=pages {
        let start = ((page - 1) * per_page).min(total);
        let end = (page * per_page).min(total);
        let mut mock = Mock::given(method("GET"))
            .and(path(format!("{API_PATH}/posts")))
            .and(query_param("page", page.to_string()))
            .and(query_param("per_page", per_page.to_string()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(Value::Array(posts[start..end].to_vec()))
                    .insert_header("X-WP-Total", total.to_string().as_str())
                    .insert_header("X-WP-TotalPages", total.div_ceil(per_page).to_string().as_str()),
            );
        if expect_each {
            mock = mock.expect(1);
        }
        mock.mount(server).await;
    }

    Mock::given(method("GET"))
        .and(path(format!("{API_PATH}/posts")))
        .and(query_param("page", (pages + 1).to_string()))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": "rest_post_invalid_page_number",
            "message": "The page number requested is larger than the number of pages available."
        })))
        .mount(server)
        .await;
}
