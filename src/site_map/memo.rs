// src/site_map/memo.rs
//! Single-flight memoization of crawled pages.

use super::CrawledPages;
use crate::error::AppError;
use crate::types::{PageId, SpaceId};
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::future::Future;
use std::sync::Arc;

/// Cache key of a build: the JSON encoding of `[root_page_id, root_space_id]`.
///
/// Ids are used as given, so a dashed and a compact root are different keys.
pub fn memo_key(root_page_id: &PageId, root_space_id: Option<&SpaceId>) -> Result<String, AppError> {
    Ok(serde_json::to_string(&(root_page_id, root_space_id))?)
}

type SharedBuild = Shared<BoxFuture<'static, Result<CrawledPages, Arc<AppError>>>>;

/// Results of finished builds plus the builds still in flight.
///
/// Each key owns one shared build. Callers racing on the same key all await
/// it and all receive its outcome, success or failure. A failed build is
/// dropped once it resolves, so only later calls start over. Successful
/// entries are never evicted.
#[derive(Default)]
pub struct SiteMapCache {
    entries: DashMap<String, SharedBuild>,
}

impl SiteMapCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the build for `key`, starting `build` only when no build for
    /// the key is cached or in flight.
    pub async fn get_or_build<F, Fut>(&self, key: String, build: F) -> Result<CrawledPages, AppError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<CrawledPages, AppError>> + Send + 'static,
    {
        // Clone the handle out so no shard lock is held across the await.
        let shared = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| build().map(|outcome| outcome.map_err(Arc::new)).boxed().shared())
            .clone();

        match shared.await {
            Ok(pages) => Ok(pages),
            Err(err) => {
                self.entries
                    .remove_if(&key, |_, entry| matches!(entry.peek(), Some(Err(_))));
                // The last holder gets the error back; concurrent waiters share it.
                Err(Arc::try_unwrap(err).unwrap_or_else(AppError::SharedBuild))
            }
        }
    }

    /// Finished builds held by the cache.
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry.value().peek(), Some(Ok(_))))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for SiteMapCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteMapCache")
            .field("entries", &self.entries.len())
            .field("finished", &self.len())
            .finish()
    }
}
