// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Site policy
// ---------------------------------------------------------------------------

/// Name of the checkbox column that hides a page from the published site.
///
/// Pages without the column are public.
pub const PUBLIC_PROPERTY_NAME: &str = "Public";

/// Property names consulted, in order, for a hand-written slug.
pub const SLUG_PROPERTY_NAMES: &[&str] = &["slug", "Slug"];

// ---------------------------------------------------------------------------
// Notion web API boundaries
// ---------------------------------------------------------------------------

/// Base URL of the API the Notion web app itself talks to.
pub const NOTION_API_BASE_URL: &str = "https://www.notion.so/api/v3";

/// Blocks requested per `loadPageChunk` call.
pub const PAGE_CHUNK_LIMIT: u32 = 100;

/// Rows requested per `queryCollection` call.
///
/// Large enough that ordinary blogs and docs sites come back in one query.
pub const COLLECTION_QUERY_LIMIT: u32 = 999;

/// Per-request timeout for the HTTP client.
pub const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Attempts per page fetch before the page is reported as missing.
pub const FETCH_RETRY_ATTEMPTS: u32 = 3;

pub const FETCH_RETRY_INITIAL_DELAY: Duration = Duration::from_millis(500);

pub const FETCH_RETRY_MAX_DELAY: Duration = Duration::from_secs(8);

// ---------------------------------------------------------------------------
// Crawl boundaries
// ---------------------------------------------------------------------------

/// Pages fetched concurrently while walking the workspace.
pub const DEFAULT_CRAWL_CONCURRENCY: usize = 4;

/// Upper bound on crawl concurrency regardless of configuration.
pub const MAX_CRAWL_CONCURRENCY: usize = 32;

// ---------------------------------------------------------------------------
// Response cache
// ---------------------------------------------------------------------------

/// Default lifetime of a cached page response, in seconds.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;
