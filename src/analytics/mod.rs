// src/analytics/mod.rs
//! Build statistics for a site map.

use crate::types::PageId;
use serde::Serialize;
use std::fmt;

/// Two pages that derived the same slug. The first one keeps it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlugCollision {
    pub slug: String,
    pub kept_page_id: PageId,
    pub dropped_page_id: PageId,
}

/// Counts gathered while turning a page map into a canonical page map.
///
/// `crawled` includes the root page; `published` is the size of the
/// canonical page map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SiteMapStats {
    pub crawled: usize,
    pub private: usize,
    pub published: usize,
    pub collisions: Vec<SlugCollision>,
}

impl SiteMapStats {
    pub fn collision_count(&self) -> usize {
        self.collisions.len()
    }

    pub fn record_collision(&mut self, slug: &str, kept: &PageId, dropped: &PageId) {
        self.collisions.push(SlugCollision {
            slug: slug.to_string(),
            kept_page_id: kept.clone(),
            dropped_page_id: dropped.clone(),
        });
    }
}

impl fmt::Display for SiteMapStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} pages crawled, {} published, {} private, {} slug collisions",
            self.crawled,
            self.published,
            self.private,
            self.collision_count()
        )
    }
}
