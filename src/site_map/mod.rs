// src/site_map/mod.rs
//! The site map: every reachable page of a workspace and the canonical slug
//! under which each public page is published.
//!
//! [`SiteMapBuilder`] crawls from a root page, filters out the root and
//! private pages, derives a slug per page and resolves slug collisions in
//! favour of the page seen first. Results are memoized per
//! `(root page, root space)` for the life of the builder.

mod builder;
mod canonical;
mod memo;

pub use builder::{canonicalize_page_map, SiteMapBuilder};
pub use canonical::{CanonicalIdOptions, NotionSlugCanonicalizer, SlugCanonicalizer};
pub use memo::{memo_key, SiteMapCache};

use crate::analytics::SiteMapStats;
use crate::config::SiteConfig;
use crate::model::RecordMap;
use crate::types::PageId;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;

/// Page id -> record map, in crawl order. `None` marks a page that was
/// discovered but could not be loaded.
pub type PageMap = IndexMap<PageId, Option<RecordMap>>;

/// Slug -> page, in the order the slugs were first claimed.
pub type CanonicalPageMap = IndexMap<String, CanonicalPageData>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalPageData {
    pub page_id: PageId,
    pub last_modified_time: DateTime<Utc>,
}

/// The memoized part of a build: everything except the site description.
#[derive(Debug, Clone)]
pub struct CrawledPages {
    pub page_map: Arc<PageMap>,
    pub canonical_page_map: Arc<CanonicalPageMap>,
    pub stats: Arc<SiteMapStats>,
}

/// A finished site map.
///
/// Maps are shared with the builder's cache, so two site maps for the same
/// root point at the same allocations.
#[derive(Debug, Clone)]
pub struct SiteMap {
    pub site: SiteConfig,
    pub page_map: Arc<PageMap>,
    pub canonical_page_map: Arc<CanonicalPageMap>,
    pub stats: Arc<SiteMapStats>,
}

impl SiteMap {
    pub fn new(site: SiteConfig, pages: CrawledPages) -> Self {
        Self {
            site,
            page_map: pages.page_map,
            canonical_page_map: pages.canonical_page_map,
            stats: pages.stats,
        }
    }

    /// The page published under `slug`.
    pub fn page_for_slug(&self, slug: &str) -> Option<&PageId> {
        self.canonical_page_map.get(slug).map(|data| &data.page_id)
    }

    /// Published slugs in canonical order.
    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.canonical_page_map.keys().map(String::as_str)
    }

    /// Whether both site maps share the same cached maps.
    pub fn shares_pages_with(&self, other: &SiteMap) -> bool {
        Arc::ptr_eq(&self.page_map, &other.page_map)
            && Arc::ptr_eq(&self.canonical_page_map, &other.canonical_page_map)
    }
}
