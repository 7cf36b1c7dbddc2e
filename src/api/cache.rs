// src/api/cache.rs
//! Disk-based response cache for page fetches.
//!
//! Caches each page's record map as JSON keyed by page, with TTL-based
//! expiry. Repeated local builds of the same workspace then only hit Notion
//! for pages that aged out.

use crate::algebras::{FetchError, PageSource};
use crate::error::AppError;
use crate::model::RecordMap;
use crate::types::{PageId, SpaceId};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

// ---------------------------------------------------------------------------
// Disk cache
// ---------------------------------------------------------------------------

/// TTL-based file cache for raw response strings.
///
/// Cache operations are best-effort: read/write failures are silently
/// ignored so a broken cache never prevents fresh API calls.
pub struct DiskCache {
    cache_dir: PathBuf,
    ttl_secs: u64,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct CacheEntry {
    data: String,
    cached_at: u64,
}

impl DiskCache {
    /// Creates a new cache in `$XDG_CACHE_HOME/notion-site-map` (or `~/.cache/notion-site-map`).
    pub async fn new(ttl_secs: u64) -> Result<Self, std::io::Error> {
        Self::in_dir(Self::default_cache_dir(), ttl_secs).await
    }

    /// Creates a cache rooted at `cache_dir`.
    ///
    /// On creation, expired entries are purged to prevent unbounded disk growth.
    pub async fn in_dir(cache_dir: PathBuf, ttl_secs: u64) -> Result<Self, std::io::Error> {
        tokio::fs::create_dir_all(&cache_dir).await?;
        let cache = Self {
            cache_dir,
            ttl_secs,
        };
        cache.purge_expired().await;
        Ok(cache)
    }

    fn default_cache_dir() -> PathBuf {
        std::env::var("XDG_CACHE_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
                PathBuf::from(home).join(".cache")
            })
            .join("notion-site-map")
    }

    /// Returns cached data if the entry exists and has not expired.
    pub async fn get(&self, key: &str) -> Option<String> {
        let path = self.key_to_path(key);
        let content = tokio::fs::read_to_string(&path).await.ok()?;
        let entry: CacheEntry = serde_json::from_str(&content).ok()?;
        let now = SystemTime::now().duration_since(UNIX_EPOCH).ok()?.as_secs();
        if now.saturating_sub(entry.cached_at) > self.ttl_secs {
            let _ = tokio::fs::remove_file(&path).await;
            return None;
        }
        Some(entry.data)
    }

    /// Stores data in the cache. Errors are silently ignored (cache is best-effort).
    pub async fn set(&self, key: &str, data: &str) {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let entry = CacheEntry {
            data: data.to_string(),
            cached_at: now,
        };
        if let Ok(json) = serde_json::to_string(&entry) {
            let _ = tokio::fs::write(self.key_to_path(key), json).await;
        }
    }

    /// Removes all expired cache entries from disk.
    async fn purge_expired(&self) {
        let now = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_secs(),
            Err(_) => return,
        };

        let mut dir = match tokio::fs::read_dir(&self.cache_dir).await {
            Ok(d) => d,
            Err(_) => return,
        };

        while let Ok(Some(entry)) = dir.next_entry().await {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Ok(content) = tokio::fs::read_to_string(&path).await {
                if let Ok(cached) = serde_json::from_str::<CacheEntry>(&content) {
                    if now.saturating_sub(cached.cached_at) > self.ttl_secs {
                        let _ = tokio::fs::remove_file(&path).await;
                    }
                }
            }
        }
    }

    fn key_to_path(&self, key: &str) -> PathBuf {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        self.cache_dir
            .join(format!("{:016x}.json", hasher.finish()))
    }
}

// ---------------------------------------------------------------------------
// Cached page source
// ---------------------------------------------------------------------------

/// A [`PageSource`] that serves record maps from a [`DiskCache`] and only
/// asks the wrapped source on a miss. Failed fetches are never cached.
pub struct CachedPageSource<S> {
    inner: S,
    cache: DiskCache,
}

impl<S: PageSource> CachedPageSource<S> {
    /// Wraps a page source with the default on-disk cache.
    pub async fn new(inner: S, ttl_secs: u64) -> Result<Self, AppError> {
        let cache = DiskCache::new(ttl_secs)
            .await
            .map_err(|e| AppError::InternalError {
                message: format!("Failed to initialize disk cache: {}", e),
                source: None,
            })?;
        Ok(Self::with_cache(inner, cache))
    }

    pub fn with_cache(inner: S, cache: DiskCache) -> Self {
        Self { inner, cache }
    }

    fn cache_key(page_id: &PageId) -> String {
        format!("page_{}", page_id.normalized())
    }
}

#[async_trait::async_trait]
impl<S: PageSource> PageSource for CachedPageSource<S> {
    async fn fetch_page(
        &self,
        page_id: &PageId,
        space_id: Option<&SpaceId>,
    ) -> Result<RecordMap, FetchError> {
        let cache_key = Self::cache_key(page_id);

        if let Some(cached) = self.cache.get(&cache_key).await {
            match serde_json::from_str::<RecordMap>(&cached) {
                Ok(record_map) => {
                    log::debug!("Cache hit: {}", cache_key);
                    return Ok(record_map);
                }
                Err(e) => log::debug!("Discarding unreadable cache entry {}: {}", cache_key, e),
            }
        }

        log::debug!("Cache miss: {}", cache_key);
        let record_map = self.inner.fetch_page(page_id, space_id).await?;

        if let Ok(data) = serde_json::to_string(&record_map) {
            self.cache.set(&cache_key, &data).await;
        }

        Ok(record_map)
    }
}
