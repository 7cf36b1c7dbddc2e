// src/api/traversal.rs
//! Breadth-first walk of a Notion workspace.
//!
//! Each level of the walk is fetched with bounded concurrency, but results
//! are folded back in the order the pages were discovered, so the resulting
//! [`PageMap`] has the same insertion order on every run against the same
//! workspace. Slug collision winners depend on that order.

use crate::algebras::{
    ContentGraph, FetchError, InMemoryVisitTracker, PageSource, TrackError, VisitTracker,
};
use crate::constants::{DEFAULT_CRAWL_CONCURRENCY, MAX_CRAWL_CONCURRENCY};
use crate::error::AppError;
use crate::model::RecordMap;
use crate::site_map::PageMap;
use crate::types::{PageId, SpaceId};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};

/// Knobs for [`SpaceCrawler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlOptions {
    /// Pages fetched at the same time.
    pub concurrency: usize,
    /// Also follow the rows listed by collection queries.
    pub traverse_collections: bool,
    /// Levels below the root to follow; `None` follows everything.
    pub max_depth: Option<u32>,
    /// Stop scheduling new pages after this many; `None` is unbounded.
    pub max_pages: Option<usize>,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CRAWL_CONCURRENCY,
            traverse_collections: true,
            max_depth: None,
            max_pages: None,
        }
    }
}

/// The default [`ContentGraph`]: every live page reachable from the root
/// inside the root's space.
#[derive(Debug, Clone, Default)]
pub struct SpaceCrawler {
    options: CrawlOptions,
}

impl SpaceCrawler {
    pub fn new(options: CrawlOptions) -> Self {
        Self { options }
    }

    fn concurrency(&self) -> usize {
        self.options.concurrency.clamp(1, MAX_CRAWL_CONCURRENCY)
    }

    fn may_descend(&self, depth: u32) -> bool {
        self.options.max_depth.is_none_or(|max| depth < max)
    }

    fn tracker(&self) -> InMemoryVisitTracker {
        match self.options.max_pages {
            Some(max) => InMemoryVisitTracker::with_capacity_limit(max),
            None => InMemoryVisitTracker::new(),
        }
    }

    /// Fetches one level of the walk, keeping discovery order.
    async fn fetch_level(
        &self,
        frontier: Vec<PageId>,
        space: Option<&SpaceId>,
        source: &dyn PageSource,
    ) -> Vec<(PageId, Result<RecordMap, FetchError>)> {
        stream::iter(frontier)
            .map(|page_id| async move {
                let result = source.fetch_page(&page_id, space).await;
                (page_id, result)
            })
            .buffered(self.concurrency())
            .collect()
            .await
    }
}

/// Pages linked from a record map that belong to the walk.
///
/// Live `page`/`collection_view_page` blocks in the root space come first,
/// then (optionally) collection rows, each in record-map order.
pub fn discover_child_pages(
    record_map: &RecordMap,
    space: Option<&SpaceId>,
    traverse_collections: bool,
) -> Vec<PageId> {
    let in_space = |block_space: Option<SpaceId>| match (space, block_space) {
        (Some(root), Some(block_space)) => root.same_as(&block_space),
        _ => true,
    };

    let mut children: Vec<PageId> = record_map
        .block
        .iter()
        .filter_map(|(key, record)| Some((key, record.value.as_ref()?)))
        .filter(|(_, block)| block.is_alive() && block.is_page() && in_space(block.space()))
        .map(|(key, _)| PageId::new(key.as_str()))
        .collect();

    if traverse_collections {
        children.extend(record_map.collection_item_ids().map(PageId::new));
    }

    children
}

#[async_trait]
impl ContentGraph for SpaceCrawler {
    async fn traverse(
        &self,
        root_page_id: &PageId,
        root_space_id: Option<&SpaceId>,
        source: &dyn PageSource,
    ) -> Result<PageMap, AppError> {
        let tracker = self.tracker();
        let mut space = root_space_id.cloned();
        let mut pages = PageMap::new();
        let mut capacity_reported = false;

        tracker.visit(root_page_id).await?;
        let mut frontier = vec![root_page_id.clone()];
        let mut depth = 0u32;

        while !frontier.is_empty() {
            log::debug!("Crawling level {} ({} pages)", depth, frontier.len());
            let level_space = space.clone();
            let fetched = self
                .fetch_level(frontier, level_space.as_ref(), source)
                .await;

            let mut next = Vec::new();
            for (page_id, result) in fetched {
                let record_map = match result {
                    Ok(record_map) => record_map,
                    Err(e) => {
                        log::warn!(
                            "page load error {} (space {:?}): {}",
                            page_id,
                            space.as_ref().map(SpaceId::as_str),
                            e
                        );
                        pages.insert(page_id, None);
                        continue;
                    }
                };

                // The first page that reports a space pins the walk to it.
                if let Some(page_space) = record_map.page_block(&page_id).and_then(|b| b.space()) {
                    match &space {
                        None => space = Some(page_space),
                        Some(root_space) if !root_space.same_as(&page_space) => {
                            log::debug!(
                                "Skipping page {} from foreign space {}",
                                page_id,
                                page_space
                            );
                            continue;
                        }
                        Some(_) => {}
                    }
                }

                if self.may_descend(depth) {
                    let children = discover_child_pages(
                        &record_map,
                        space.as_ref(),
                        self.options.traverse_collections,
                    );
                    for child in children {
                        match tracker.visit(&child).await {
                            Ok(true) => next.push(child),
                            Ok(false) => {}
                            Err(TrackError::CapacityExceeded { max }) => {
                                if !capacity_reported {
                                    log::warn!(
                                        "Page limit ({}) reached; remaining pages are not crawled",
                                        max
                                    );
                                    capacity_reported = true;
                                }
                            }
                            Err(e) => return Err(e.into()),
                        }
                    }
                }

                pages.insert(page_id, Some(record_map));
            }

            frontier = next;
            depth += 1;
        }

        log::info!(
            "Crawl from {} finished: {} pages in {} levels",
            root_page_id,
            pages.len(),
            depth
        );
        Ok(pages)
    }
}
