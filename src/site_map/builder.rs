// src/site_map/builder.rs
//! Crawl, filter and canonicalize a workspace into a [`SiteMap`].

use super::canonical::{CanonicalIdOptions, NotionSlugCanonicalizer, SlugCanonicalizer};
use super::memo::{memo_key, SiteMapCache};
use super::{CanonicalPageData, CanonicalPageMap, CrawledPages, PageMap, SiteMap};
use crate::algebras::{ContentGraph, FetchError, PageSource};
use crate::analytics::SiteMapStats;
use crate::config::SiteConfig;
use crate::constants::PUBLIC_PROPERTY_NAME;
use crate::error::{AppError, Result};
use crate::model::{read_boolean_property, BlockRecord, RecordMap};
use crate::types::{PageId, SpaceId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indexmap::map::Entry;
use std::sync::Arc;

/// Builds site maps and remembers them per `(root page, root space)`.
///
/// Slug options and the slug canonicalizer are fixed when the builder is
/// created, so the cache key only needs the crawl roots. Clones share the
/// same cache.
#[derive(Clone)]
pub struct SiteMapBuilder {
    graph: Arc<dyn ContentGraph>,
    source: Arc<dyn PageSource>,
    canonicalizer: Arc<dyn SlugCanonicalizer>,
    options: CanonicalIdOptions,
    cache: Arc<SiteMapCache>,
}

impl SiteMapBuilder {
    pub fn new(graph: Arc<dyn ContentGraph>, source: Arc<dyn PageSource>) -> Self {
        Self {
            graph,
            source,
            canonicalizer: Arc::new(NotionSlugCanonicalizer::new()),
            options: CanonicalIdOptions::default(),
            cache: Arc::new(SiteMapCache::new()),
        }
    }

    /// A builder using the site's URL overrides and id-in-URL setting.
    pub fn for_site(
        site: &SiteConfig,
        graph: Arc<dyn ContentGraph>,
        source: Arc<dyn PageSource>,
    ) -> Self {
        Self::new(graph, source)
            .with_canonicalizer(Arc::new(NotionSlugCanonicalizer::with_overrides(
                site.page_url_overrides.clone(),
            )))
            .with_options(site.canonical_options())
    }

    pub fn with_canonicalizer(mut self, canonicalizer: Arc<dyn SlugCanonicalizer>) -> Self {
        self.canonicalizer = canonicalizer;
        self
    }

    pub fn with_options(mut self, options: CanonicalIdOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> CanonicalIdOptions {
        self.options
    }

    pub fn cache(&self) -> &SiteMapCache {
        &self.cache
    }

    /// Builds the site map for `site`, crawling only on the first call for
    /// these roots.
    ///
    /// Concurrent calls for the same roots share one crawl and all receive its
    /// outcome. A failed build is not remembered.
    ///
    /// `site` is published as given, but slugs are always derived with this
    /// builder's options and overrides, fixed at construction. Use
    /// [`SiteMapBuilder::for_site`] to derive them from the site itself; a
    /// differing `include_notion_id_in_urls` is only logged.
    pub async fn build_site_map(
        &self,
        root_page_id: &PageId,
        root_space_id: Option<&SpaceId>,
        site: SiteConfig,
    ) -> Result<SiteMap> {
        if site.include_notion_id_in_urls != self.options.include_raw_id {
            log::warn!(
                "Site '{}' sets include_notion_id_in_urls={} but this builder derives slugs with include_raw_id={}",
                site.name,
                site.include_notion_id_in_urls,
                self.options.include_raw_id
            );
        }

        let pages = self.crawl_pages(root_page_id, root_space_id).await?;
        Ok(SiteMap::new(site, pages))
    }

    /// The memoized crawl and canonicalization.
    pub async fn crawl_pages(
        &self,
        root_page_id: &PageId,
        root_space_id: Option<&SpaceId>,
    ) -> Result<CrawledPages> {
        let key = memo_key(root_page_id, root_space_id)?;
        let job = CrawlJob {
            graph: self.graph.clone(),
            source: self.source.clone(),
            canonicalizer: self.canonicalizer.clone(),
            options: self.options,
            root_page_id: root_page_id.clone(),
            root_space_id: root_space_id.cloned(),
        };
        self.cache.get_or_build(key, move || job.run()).await
    }
}

/// One uncached build, owning everything it needs so callers can share it.
struct CrawlJob {
    graph: Arc<dyn ContentGraph>,
    source: Arc<dyn PageSource>,
    canonicalizer: Arc<dyn SlugCanonicalizer>,
    options: CanonicalIdOptions,
    root_page_id: PageId,
    root_space_id: Option<SpaceId>,
}

impl CrawlJob {
    async fn run(self) -> Result<CrawledPages> {
        let root_page_id = &self.root_page_id;
        let root_space_id = self.root_space_id.as_ref();
        log::info!(
            "Building site map from root page {} (space {})",
            root_page_id,
            root_space_id.map(SpaceId::as_str).unwrap_or("auto")
        );

        let source = LoggingPageSource {
            inner: self.source.as_ref(),
        };
        let page_map = self
            .graph
            .traverse(root_page_id, root_space_id, &source)
            .await?;

        let (canonical_page_map, stats) = canonicalize_page_map(
            root_page_id,
            &page_map,
            self.canonicalizer.as_ref(),
            self.options,
        )?;

        log::info!("Site map built: {}", stats);

        Ok(CrawledPages {
            page_map: Arc::new(page_map),
            canonical_page_map: Arc::new(canonical_page_map),
            stats: Arc::new(stats),
        })
    }
}

/// Logs every page load before handing it to the real source.
struct LoggingPageSource<'a> {
    inner: &'a dyn PageSource,
}

#[async_trait]
impl<'a> PageSource for LoggingPageSource<'a> {
    async fn fetch_page(
        &self,
        page_id: &PageId,
        space_id: Option<&SpaceId>,
    ) -> std::result::Result<RecordMap, FetchError> {
        log::info!("notion getPage {}", page_id.normalized());
        self.inner.fetch_page(page_id, space_id).await
    }
}

/// Turns a crawled page map into the published `slug -> page` map.
///
/// Pages are taken in page-map order. The root page is skipped, and so is
/// every page whose `Public` property is false (an absent property means
/// public). When two pages derive the same slug the first one keeps it.
///
/// Fails with [`AppError::PageNotLoaded`] on the first page whose record
/// map is missing.
pub fn canonicalize_page_map(
    root_page_id: &PageId,
    page_map: &PageMap,
    canonicalizer: &dyn SlugCanonicalizer,
    options: CanonicalIdOptions,
) -> Result<(CanonicalPageMap, SiteMapStats)> {
    let root = root_page_id.normalized();
    let mut canonical_page_map = CanonicalPageMap::new();
    let mut stats = SiteMapStats {
        crawled: page_map.len(),
        ..SiteMapStats::default()
    };

    for (page_id, record_map) in page_map {
        if page_id.normalized() == root {
            continue;
        }

        let record_map = record_map.as_ref().ok_or_else(|| AppError::PageNotLoaded {
            page_id: page_id.as_str().to_string(),
        })?;
        let block = record_map.page_block(page_id);

        let is_public = block
            .and_then(|block| read_boolean_property(PUBLIC_PROPERTY_NAME, block, record_map))
            .unwrap_or(true);
        if !is_public {
            log::debug!("Skipping private page {}", page_id);
            stats.private += 1;
            continue;
        }

        let last_modified_time = block.map(last_modified_time).unwrap_or_default();

        let slug = canonicalizer
            .canonicalize(page_id, record_map, options)
            .unwrap_or_else(|| page_id.normalized());

        match canonical_page_map.entry(slug) {
            Entry::Occupied(existing) => {
                let existing_page_id = &existing.get().page_id;
                log::warn!(
                    "error duplicate canonical page id \"{}\": page {} (existing page {})",
                    existing.key(),
                    page_id,
                    existing_page_id
                );
                stats.record_collision(existing.key(), existing_page_id, page_id);
            }
            Entry::Vacant(slot) => {
                slot.insert(CanonicalPageData {
                    page_id: page_id.clone(),
                    last_modified_time,
                });
            }
        }
    }

    stats.published = canonical_page_map.len();
    Ok((canonical_page_map, stats))
}

/// Last edit, else creation, else the epoch; out-of-range stamps are skipped.
fn last_modified_time(block: &BlockRecord) -> DateTime<Utc> {
    block
        .last_edited_time
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .or_else(|| {
            block
                .created_time
                .and_then(DateTime::<Utc>::from_timestamp_millis)
        })
        .unwrap_or_default()
}
