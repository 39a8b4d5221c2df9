//! Records sourced from legacy MDX content files.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Front-matter block at the top of a content file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrontMatter {
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub categories: Vec<String>,

    /// Raw date string; `YYYY-MM-DD` or RFC 3339
    #[serde(default)]
    pub date: Option<String>,

    #[serde(default)]
    pub author: Option<String>,
}

/// A post parsed from a content file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileContentRecord {
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    /// Front-matter tags merged with body hashtags
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    /// Directory-derived path with a leading slash
    pub slug: String,
    pub date: Option<String>,
    pub author: Option<String>,
    pub body: String,
    /// File modification time
    pub modified: Option<DateTime<Utc>>,
}
