// src/site_map/canonical.rs
//! Slug derivation for published pages.

use crate::constants::SLUG_PROPERTY_NAMES;
use crate::model::{block_title, normalize_title, read_page_property, RecordMap};
use crate::types::{PageId, PageUrlOverrides};

/// Options for canonical slug derivation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CanonicalIdOptions {
    /// Append the compact page id to every derived slug.
    pub include_raw_id: bool,
}

/// The ability to derive a page's canonical slug.
///
/// # Laws
///
/// - **L1 (Determinism)**: The same page in the same record map always yields
///   the same slug.
/// - **L2 (Absence)**: `None` only when `record_map` has no block for `page_id`
///   and nothing else names a slug for it.
pub trait SlugCanonicalizer: Send + Sync {
    fn canonicalize(
        &self,
        page_id: &PageId,
        record_map: &RecordMap,
        options: CanonicalIdOptions,
    ) -> Option<String>;
}

/// Slugs from overrides, `slug` properties or page titles.
#[derive(Debug, Clone, Default)]
pub struct NotionSlugCanonicalizer {
    overrides: PageUrlOverrides,
}

impl NotionSlugCanonicalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overrides(overrides: PageUrlOverrides) -> Self {
        Self { overrides }
    }
}

impl SlugCanonicalizer for NotionSlugCanonicalizer {
    fn canonicalize(
        &self,
        page_id: &PageId,
        record_map: &RecordMap,
        options: CanonicalIdOptions,
    ) -> Option<String> {
        if let Some(slug) = self.overrides.slug_for(page_id) {
            return Some(slug.to_string());
        }

        let block = record_map.page_block(page_id)?;

        let slug = SLUG_PROPERTY_NAMES
            .iter()
            .filter_map(|name| read_page_property(name, block, record_map))
            .filter_map(|value| value.as_text().map(|text| text.trim().to_string()))
            .find(|text| !text.is_empty())
            .or_else(|| block_title(block, record_map).map(|title| normalize_title(&title)))
            .filter(|slug| !slug.is_empty());

        let id = page_id.normalized();
        Some(match slug {
            Some(slug) if options.include_raw_id => format!("{}-{}", slug, id),
            Some(slug) => slug,
            None => id,
        })
    }
}
