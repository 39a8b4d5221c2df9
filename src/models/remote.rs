//! Records returned by the WordPress REST API.

use serde::{Deserialize, Serialize};

/// Taxonomy identifier WordPress uses for categories.
pub const TAXONOMY_CATEGORY: &str = "category";

/// Taxonomy identifier WordPress uses for tags.
pub const TAXONOMY_TAG: &str = "post_tag";

/// An HTML field wrapped as `{ "rendered": "..." }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rendered {
    #[serde(default)]
    pub rendered: String,
}

impl From<&str> for Rendered {
    fn from(value: &str) -> Self {
        Self {
            rendered: value.to_string(),
        }
    }
}

/// A post as returned by `/posts`.
///
/// Every field is defaulted so `_fields`-trimmed responses still parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemotePostRecord {
    #[serde(default)]
    pub id: u64,

    /// Site-local publish time, `YYYY-MM-DDTHH:MM:SS`
    #[serde(default)]
    pub date: String,

    #[serde(default)]
    pub date_gmt: Option<String>,

    /// Site-local modification time
    #[serde(default)]
    pub modified: String,

    #[serde(default)]
    pub modified_gmt: Option<String>,

    #[serde(default)]
    pub slug: String,

    #[serde(default)]
    pub link: Option<String>,

    #[serde(default)]
    pub title: Rendered,

    #[serde(default)]
    pub excerpt: Rendered,

    #[serde(default)]
    pub content: Option<Rendered>,

    /// Category ids
    #[serde(default)]
    pub categories: Vec<u64>,

    /// Tag ids
    #[serde(default)]
    pub tags: Vec<u64>,

    /// Resolved related objects, present when requested with `_embed`
    #[serde(default, rename = "_embedded", skip_serializing_if = "Option::is_none")]
    pub embedded: Option<Embedded>,
}

impl RemotePostRecord {
    /// Category display names from the embedded terms.
    pub fn category_names(&self) -> Vec<String> {
        self.embedded
            .as_ref()
            .map(|e| e.categories.iter().map(|t| t.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Tag display names from the embedded terms.
    pub fn tag_names(&self) -> Vec<String> {
        self.embedded
            .as_ref()
            .map(|e| e.tags.iter().map(|t| t.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Source URL of the first embedded featured media.
    pub fn featured_image(&self) -> Option<&str> {
        self.embedded
            .as_ref()?
            .featured_media
            .iter()
            .find_map(|m| m.source_url.as_deref())
    }

    /// Display name of the first embedded author.
    pub fn author_name(&self) -> Option<&str> {
        self.embedded
            .as_ref()?
            .authors
            .iter()
            .map(|a| a.name.as_str())
            .find(|name| !name.is_empty())
    }

    /// Best available last-modified timestamp string.
    pub fn last_modified(&self) -> Option<&str> {
        [
            self.modified_gmt.as_deref(),
            Some(self.modified.as_str()),
            self.date_gmt.as_deref(),
            Some(self.date.as_str()),
        ]
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())
    }
}

/// A taxonomy term (category or tag).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub taxonomy: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

/// Embedded author object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub name: String,
}

/// Embedded featured media object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub alt_text: Option<String>,
}

/// Typed view of the `_embedded` side-channel.
///
/// The API delivers terms as an unnamed array of term arrays. They are
/// flattened and split by each term's `taxonomy` while deserializing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawEmbedded", into = "RawEmbedded")]
pub struct Embedded {
    pub authors: Vec<Author>,
    pub featured_media: Vec<Media>,
    pub categories: Vec<Term>,
    pub tags: Vec<Term>,
}

/// Wire shape of `_embedded`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawEmbedded {
    #[serde(default)]
    author: Vec<Author>,
    #[serde(default, rename = "wp:featuredmedia")]
    featured_media: Vec<Media>,
    #[serde(default, rename = "wp:term")]
    terms: Vec<Vec<Term>>,
}

impl From<RawEmbedded> for Embedded {
    fn from(raw: RawEmbedded) -> Self {
        let (categories, rest): (Vec<Term>, Vec<Term>) = raw
            .terms
            .into_iter()
            .flatten()
            .partition(|t| t.taxonomy == TAXONOMY_CATEGORY);
        let tags = rest
            .into_iter()
            .filter(|t| t.taxonomy == TAXONOMY_TAG)
            .collect();

        Self {
            authors: raw.author,
            featured_media: raw.featured_media,
            categories,
            tags,
        }
    }
}

impl From<Embedded> for RawEmbedded {
    fn from(embedded: Embedded) -> Self {
        Self {
            author: embedded.authors,
            featured_media: embedded.featured_media,
            terms: vec![embedded.categories, embedded.tags],
        }
    }
}
