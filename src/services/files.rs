// src/services/files.rs

//! Legacy MDX content source.
//!
//! Walks the content tree lazily, parses each entry's front-matter and body,
//! and derives the post slug from the entry's directory.
//!
//! ```text
//! content/
//! ├── _drafts/…               # skipped (ignore prefix)
//! └── (legacy)/blog/
//!     └── old-post/
//!         └── page.mdx        # slug: /blog/old-post
//! ```

use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Utc};
use regex::Regex;
use walkdir::WalkDir;

use crate::error::{AppError, Result};
use crate::models::{ContentConfig, FileContentRecord, FrontMatter};
use crate::utils::url::normalize_path;

/// Which entries the walker descends into and yields.
#[derive(Debug, Clone)]
pub struct WalkRules {
    pub file_names: Vec<String>,
    pub ignore_prefixes: Vec<String>,
    pub ignore_names: Vec<String>,
}

impl WalkRules {
    fn is_ignored(&self, name: &str) -> bool {
        self.ignore_names.iter().any(|n| n == name)
            || self.ignore_prefixes.iter().any(|p| name.starts_with(p.as_str()))
    }

    fn is_content_file(&self, name: &str) -> bool {
        self.file_names.iter().any(|n| n == name)
    }
}

impl From<&ContentConfig> for WalkRules {
    fn from(config: &ContentConfig) -> Self {
        Self {
            file_names: config.file_names.clone(),
            ignore_prefixes: config.ignore_prefixes.clone(),
            ignore_names: config.ignore_names.clone(),
        }
    }
}

/// Lazily yield content file paths under `root`.
///
/// Ignored directories are pruned, not just filtered. Calling again restarts
/// the walk from scratch.
pub fn walk<'a>(root: &Path, rules: &'a WalkRules) -> impl Iterator<Item = PathBuf> + 'a {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |entry| {
            entry.depth() == 0 || !rules.is_ignored(&entry.file_name().to_string_lossy())
        })
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping unreadable content entry: {}", e);
                None
            }
        })
        .filter(|entry| {
            entry.file_type().is_file()
                && rules.is_content_file(&entry.file_name().to_string_lossy())
        })
        .map(|entry| entry.into_path())
}

/// Derive a post slug from the content file's directory relative to `root`.
///
/// Route-group segments such as `(legacy)` do not appear in URLs and are dropped.
pub fn derive_slug(root: &Path, file: &Path) -> String {
    let dir = file.parent().unwrap_or(file);
    let relative = dir.strip_prefix(root).unwrap_or(dir);

    let segments: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .filter(|s| !(s.starts_with('(') && s.ends_with(')')))
        .collect();

    normalize_path(&segments.join("/"))
}

/// Split a `---` delimited front-matter block from the body.
pub fn split_front_matter(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start_matches('\u{feff}');
    let rest = text
        .strip_prefix("---\n")
        .or_else(|| text.strip_prefix("---\r\n"))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((yaml, body));
        }
        offset += line.len();
    }
    None
}

/// Reads and parses legacy content files.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
    rules: WalkRules,
    tags_line: Regex,
    hashtag: Regex,
}

impl FileSource {
    pub fn new(config: &ContentConfig) -> Result<Self> {
        let tags_line = Regex::new(r"(?m)\*\*Tags:\*\*(.*)$")
            .map_err(|e| AppError::config(format!("tags pattern: {e}")))?;
        let hashtag = Regex::new(r"#([\p{L}\p{N}_-]+)")
            .map_err(|e| AppError::config(format!("hashtag pattern: {e}")))?;

        Ok(Self {
            root: config.root_dir.clone(),
            rules: WalkRules::from(config),
            tags_line,
            hashtag,
        })
    }

    /// Content file paths, collected on the blocking pool. `None` when the
    /// root is not a directory.
    async fn collect_paths(&self) -> Option<Vec<PathBuf>> {
        let root = self.root.clone();
        let rules = self.rules.clone();
        let walked = tokio::task::spawn_blocking(move || {
            root.is_dir().then(|| walk(&root, &rules).collect::<Vec<_>>())
        })
        .await;

        match walked {
            Ok(paths) => paths,
            Err(e) => {
                log::warn!("Content walk under {} failed: {}", self.root.display(), e);
                Some(Vec::new())
            }
        }
    }

    /// Parse every content file, skipping (and logging) malformed ones.
    pub async fn scan(&self) -> Vec<FileContentRecord> {
        let Some(paths) = self.collect_paths().await else {
            log::warn!(
                "Content root {} does not exist; no legacy posts",
                self.root.display()
            );
            return Vec::new();
        };

        let mut records = Vec::new();
        for path in paths {
            match self.load(&path).await {
                Ok(record) => records.push(record),
                Err(e) => log::warn!("Skipping content file {}: {}", path.display(), e),
            }
        }
        log::debug!(
            "Scanned {} legacy posts under {}",
            records.len(),
            self.root.display()
        );
        records
    }

    /// Find the record whose slug (or final slug segment) equals `slug`.
    pub async fn lookup(&self, slug: &str) -> Option<FileContentRecord> {
        let wanted = slug.trim_matches('/');
        if wanted.is_empty() {
            return None;
        }
        self.scan().await.into_iter().find(|r| {
            let own = r.slug.trim_matches('/');
            own == wanted || own.rsplit('/').next() == Some(wanted)
        })
    }

    async fn load(&self, path: &Path) -> Result<FileContentRecord> {
        let text = tokio::fs::read_to_string(path).await?;
        let modified = tokio::fs::metadata(path)
            .await
            .and_then(|m| m.modified())
            .ok()
            .map(DateTime::<Utc>::from);
        self.parse(path, &text, modified)
    }

    /// Parse one file's text into a record.
    pub fn parse(
        &self,
        path: &Path,
        text: &str,
        modified: Option<DateTime<Utc>>,
    ) -> Result<FileContentRecord> {
        let display = path.display().to_string();
        let (yaml, body) = split_front_matter(text)
            .ok_or_else(|| AppError::front_matter(&display, "missing front-matter block"))?;
        let front: FrontMatter =
            serde_yaml_ng::from_str(yaml).map_err(|e| AppError::front_matter(&display, e))?;

        let mut tags = Vec::new();
        for tag in front.tags.into_iter().chain(self.body_hashtags(body)) {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }

        Ok(FileContentRecord {
            title: front.title,
            description: front.description,
            image: front.image,
            tags,
            categories: front.categories,
            slug: derive_slug(&self.root, path),
            date: front.date,
            author: front.author,
            body: body.to_string(),
            modified,
        })
    }

    /// Hashtags from every `**Tags:** #a #b` line in the body.
    fn body_hashtags(&self, body: &str) -> Vec<String> {
        self.tags_line
            .captures_iter(body)
            .filter_map(|caps| caps.get(1))
            .flat_map(|line| {
                self.hashtag
                    .captures_iter(line.as_str())
                    .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}
