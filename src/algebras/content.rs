//! Content retrieval algebras.
//!
//! [`PageSource`] loads one page; [`ContentGraph`] walks the workspace from a
//! root page using a page source. Neither knows about HTTP, retries or
//! caching; those live in the interpreters under `api`.

use crate::error::AppError;
use crate::model::RecordMap;
use crate::site_map::PageMap;
use crate::types::{PageId, SpaceId};
use async_trait::async_trait;
use std::sync::Arc;

use super::error::FetchError;

/// The ability to load the record map of a single page.
///
/// # Laws
///
/// - **L1 (Idempotency)**: Fetching the same ID twice returns identical content
///   for an unchanged workspace.
/// - **L2 (Self-Containment)**: A successful fetch of `id` returns a record map
///   that contains the block for `id`.
///
/// This trait is **object-safe** and can be used as `Arc<dyn PageSource>`.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Load a page. `space_id`, when known, scopes the lookup to that workspace.
    ///
    /// Fails with a descriptive [`FetchError`] when the page cannot be retrieved.
    async fn fetch_page(
        &self,
        page_id: &PageId,
        space_id: Option<&SpaceId>,
    ) -> Result<RecordMap, FetchError>;
}

#[async_trait]
impl<T: PageSource + ?Sized> PageSource for Arc<T> {
    async fn fetch_page(
        &self,
        page_id: &PageId,
        space_id: Option<&SpaceId>,
    ) -> Result<RecordMap, FetchError> {
        (**self).fetch_page(page_id, space_id).await
    }
}

/// The ability to discover every page reachable from a root page.
///
/// # Laws
///
/// - **L1 (Root-Inclusion)**: The root page is a key of the returned map.
/// - **L2 (Single-Fetch)**: `source.fetch_page` is called at most once per
///   distinct page ID.
/// - **L3 (Failure-Surfacing)**: A page that could not be loaded is a key with
///   a `None` record rather than an error of the whole traversal.
/// - **L4 (Determinism)**: For a deterministic source, the map's insertion
///   order is the same on every run.
#[async_trait]
pub trait ContentGraph: Send + Sync {
    async fn traverse(
        &self,
        root_page_id: &PageId,
        root_space_id: Option<&SpaceId>,
        source: &dyn PageSource,
    ) -> Result<PageMap, AppError>;
}

#[async_trait]
impl<T: ContentGraph + ?Sized> ContentGraph for Arc<T> {
    async fn traverse(
        &self,
        root_page_id: &PageId,
        root_space_id: Option<&SpaceId>,
        source: &dyn PageSource,
    ) -> Result<PageMap, AppError> {
        (**self)
            .traverse(root_page_id, root_space_id, source)
            .await
    }
}

/// In-memory fakes shared by the unit tests of the crawler and the builder.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::types::normalize_id;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::RwLock;

    /// Pre-loaded page store that counts and records every fetch.
    pub struct MockPageSource {
        pages: RwLock<HashMap<String, RecordMap>>,
        failing: RwLock<HashSet<String>>,
        fetches: AtomicUsize,
        fetch_log: parking_lot::Mutex<Vec<String>>,
        delay: Option<Duration>,
    }

    impl MockPageSource {
        pub fn new() -> Self {
            Self {
                pages: RwLock::new(HashMap::new()),
                failing: RwLock::new(HashSet::new()),
                fetches: AtomicUsize::new(0),
                fetch_log: parking_lot::Mutex::new(Vec::new()),
                delay: None,
            }
        }

        /// Every fetch sleeps first, to keep calls in flight for a while.
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub async fn add_page(&self, page_id: &str, record_map: RecordMap) {
            let mut pages = self.pages.write().await;
            pages.insert(normalize_id(page_id), record_map);
        }

        /// Makes fetches of `page_id` fail with a transport error.
        pub async fn fail_page(&self, page_id: &str) {
            let mut failing = self.failing.write().await;
            failing.insert(normalize_id(page_id));
        }

        pub fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }

        pub fn fetch_log(&self) -> Vec<String> {
            self.fetch_log.lock().clone()
        }
    }

    #[async_trait]
    impl PageSource for MockPageSource {
        async fn fetch_page(
            &self,
            page_id: &PageId,
            _space_id: Option<&SpaceId>,
        ) -> Result<RecordMap, FetchError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.fetch_log.lock().push(page_id.as_str().to_string());

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            let key = page_id.normalized();
            if self.failing.read().await.contains(&key) {
                return Err(FetchError::Transport {
                    message: format!("connection reset while loading {}", page_id),
                });
            }

            let pages = self.pages.read().await;
            pages
                .get(&key)
                .cloned()
                .ok_or_else(|| FetchError::NotFound {
                    id: page_id.as_str().to_string(),
                })
        }
    }

    /// A traversal that visits a fixed list of pages in order.
    pub struct ScriptedContentGraph {
        order: Vec<PageId>,
        traversals: AtomicUsize,
    }

    impl ScriptedContentGraph {
        pub fn new<I, S>(order: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self {
                order: order.into_iter().map(|id| PageId::new(id.into())).collect(),
                traversals: AtomicUsize::new(0),
            }
        }

        pub fn traversal_count(&self) -> usize {
            self.traversals.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ContentGraph for ScriptedContentGraph {
        async fn traverse(
            &self,
            _root_page_id: &PageId,
            root_space_id: Option<&SpaceId>,
            source: &dyn PageSource,
        ) -> Result<PageMap, AppError> {
            self.traversals.fetch_add(1, Ordering::SeqCst);
            let mut pages = PageMap::new();
            for id in &self.order {
                let record = source.fetch_page(id, root_space_id).await.ok();
                pages.insert(id.clone(), record);
            }
            Ok(pages)
        }
    }
}
