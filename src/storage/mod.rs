//! Storage abstractions for generated documents.
//!
//! Sitemaps and feeds are written under a single output root:
//!
//! ```text
//! out/
//! ├── sitemap.xml           # index (or homepage-only fallback)
//! ├── rss.xml
//! └── sitemap/
//!     ├── pages.xml         # home and blog index
//!     ├── posts-0.xml
//!     └── posts-1.xml
//! ```

pub mod local;

use async_trait::async_trait;

use crate::error::Result;

// Re-export for convenience
pub use local::LocalStorage;

/// Metadata about a storage write operation.
#[derive(Debug, Clone)]
pub struct WriteMetadata {
    /// Key the document was written under
    pub key: String,
    /// Size of the written document in bytes
    pub bytes: usize,
}

/// Trait for document storage backends.
#[async_trait]
pub trait DocumentStorage: Send + Sync {
    /// Write (or replace) the document at `key`.
    async fn write_document(&self, key: &str, body: &str) -> Result<WriteMetadata>;

    /// Read the document at `key`, `None` if absent.
    async fn read_document(&self, key: &str) -> Result<Option<String>>;

    /// Human-readable location of `key`, for logs.
    fn location(&self, key: &str) -> String;
}
