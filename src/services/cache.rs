// src/services/cache.rs

//! Short-lived read-through cache for remote responses.
//!
//! Entries are keyed by the SHA-256 of the request signature (the full
//! request URL). Two identical concurrent misses may both fetch.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use sha2::{Digest, Sha256};

use crate::models::PaginationHeaders;

/// A cached response body together with its pagination headers.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedResponse {
    pub body: String,
    pub headers: PaginationHeaders,
}

#[derive(Debug)]
struct CacheEntry {
    value: CachedResponse,
    stored_at: Instant,
}

/// TTL cache shared by every client built from the same instance.
#[derive(Debug)]
pub struct ResponseCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    /// Create an empty cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Hash a request signature into a cache key.
    pub fn key(signature: &str) -> String {
        hex::encode(Sha256::digest(signature.as_bytes()))
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        // A panic while holding the lock cannot leave a half-written entry.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Return a fresh entry for `signature`, evicting it if expired.
    pub fn get(&self, signature: &str) -> Option<CachedResponse> {
        let key = Self::key(signature);
        let mut entries = self.lock();

        match entries.get(&key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    /// Store `value`, sweeping out every expired entry first.
    pub fn insert(&self, signature: &str, value: CachedResponse) {
        let entry = CacheEntry {
            value,
            stored_at: Instant::now(),
        };
        let mut entries = self.lock();
        entries.retain(|_, e| e.stored_at.elapsed() < self.ttl);
        entries.insert(Self::key(signature), entry);
    }

    /// Drop one entry. Returns whether it was present.
    pub fn invalidate(&self, signature: &str) -> bool {
        self.lock().remove(&Self::key(signature)).is_some()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
