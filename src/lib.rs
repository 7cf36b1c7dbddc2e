// src/lib.rs
//! notion-site-map library: crawls a Notion workspace and publishes the
//! canonical `slug -> page` map of its public pages.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `FetchError`, `ValidationError`
//! - **Configuration**: `BuildConfig`, `SiteConfig`, `CommandLineInput`
//! - **Site map**: `SiteMapBuilder`, `SiteMap`, `PageMap`, `CanonicalPageMap`
//! - **Domain model**: `RecordMap`, `BlockRecord`, property readers
//! - **Domain types**: `PageId`, `SpaceId`, `AuthToken`, `SiteDomain`
//! - **Collaborators**: `ContentGraph`, `PageSource`, `SlugCanonicalizer` and
//!   their default implementations
//! - **Output**: renderers and delivery

mod algebras;
mod analytics;
mod api;
mod config;
mod constants;
mod error;
mod error_recovery;
mod model;
mod output;
mod pipeline;
mod site_map;
mod types;

// --- Error Handling ---
pub use crate::algebras::{FetchError, TrackError};
pub use crate::error::{AppError, Result};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{BuildConfig, CommandLineInput, OutputFormat, SiteConfig, AUTH_TOKEN_ENV};

// --- Site Map ---
pub use crate::analytics::{SiteMapStats, SlugCollision};
pub use crate::site_map::{
    canonicalize_page_map, memo_key, CanonicalIdOptions, CanonicalPageData, CanonicalPageMap,
    CrawledPages, NotionSlugCanonicalizer, PageMap, SiteMap, SiteMapBuilder, SiteMapCache,
    SlugCanonicalizer,
};

// --- Domain Model ---
pub use crate::model::{
    block_title, normalize_title, read_boolean_property, read_page_property, text_content,
    BlockRecord, CollectionQueryResult, CollectionRecord, PropertyValue, Record, RecordMap,
    SchemaProperty,
};

// --- Domain Types ---
pub use crate::types::{
    normalize_id, AuthToken, CollectionId, Id, PageId, PageUrlOverrides, SiteDomain, SpaceId,
};

// --- Algebras (Capability Traits) ---
pub use crate::algebras::{ContentGraph, InMemoryVisitTracker, PageSource, VisitTracker};

// --- API Client & Crawl ---
pub use crate::api::{
    discover_child_pages, parser, responses, ApiResponse, CachedPageSource, ClientOptions,
    CrawlOptions, DiskCache, NotionHttpClient, SpaceCrawler,
};
pub use crate::error_recovery::{retry_with_backoff, RetryPolicy};

// --- Output ---
pub use crate::output::{
    deliver, page_url, render, render_json, render_sitemap_xml, DeliveryTarget, OutputPlan,
    OutputReport,
};

// --- Pipeline Traits ---
pub use crate::pipeline::{SiteMapDelivery, SiteMapSource};
