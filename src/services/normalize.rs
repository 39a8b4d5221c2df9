// src/services/normalize.rs

//! Maps remote and file records onto [`NormalizedPost`].

use chrono::Utc;

use crate::models::{FileContentRecord, NormalizedPost, RemotePostRecord, Source};
use crate::utils::date::parse_timestamp;
use crate::utils::text::{excerpt_text, strip_html};

/// Normalize a WordPress post. `blog_prefix` is the path remote posts live under.
pub fn normalize_remote(record: &RemotePostRecord, blog_prefix: &str) -> NormalizedPost {
    let description = excerpt_text(&record.excerpt.rendered);
    let excerpt = (!description.is_empty()).then(|| description.clone());

    let date = record
        .date_gmt
        .as_deref()
        .and_then(parse_timestamp)
        .or_else(|| parse_timestamp(&record.date))
        .unwrap_or_else(|| {
            log::warn!(
                "Post {} ({}) has no parseable date; using now",
                record.id,
                record.slug
            );
            Utc::now()
        });

    NormalizedPost {
        source: Source::Remote,
        title: strip_html(&record.title.rendered),
        description,
        excerpt,
        image: record.featured_image().map(str::to_string),
        slug: record.slug.clone(),
        url: post_url(blog_prefix, &record.slug),
        date,
        categories: record.category_names(),
        tags: record.tag_names(),
        author: record.author_name().map(str::to_string),
    }
}

/// Normalize a legacy file record.
///
/// Date falls back to the file's modification time, then to now.
pub fn normalize_file(record: &FileContentRecord, default_author: &str) -> NormalizedPost {
    let date = record
        .date
        .as_deref()
        .and_then(parse_timestamp)
        .or(record.modified)
        .unwrap_or_else(Utc::now);

    let description = record.description.trim().to_string();

    NormalizedPost {
        source: Source::File,
        title: record.title.clone(),
        excerpt: (!description.is_empty()).then(|| description.clone()),
        description,
        image: record.image.clone(),
        slug: record.slug.clone(),
        url: record.slug.clone(),
        date,
        categories: record.categories.clone(),
        tags: record.tags.clone(),
        author: Some(
            record
                .author
                .clone()
                .unwrap_or_else(|| default_author.to_string()),
        ),
    }
}

/// Site-relative URL for a remote post.
pub fn post_url(blog_prefix: &str, slug: &str) -> String {
    match blog_prefix.trim_matches('/') {
        "" => format!("/{slug}"),
        prefix => format!("/{prefix}/{slug}"),
    }
}
