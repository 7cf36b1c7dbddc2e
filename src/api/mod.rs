// src/api/mod.rs
//! Notion web API interaction and the default workspace crawl.
//!
//! I/O (`client`), wire shapes (`responses`) and response classification
//! (`parser`) are kept apart; `cache` and `traversal` build on the
//! [`PageSource`](crate::algebras::PageSource) algebra rather than on HTTP.

pub mod cache;
pub mod client;
pub mod parser;
pub mod responses;
pub mod traversal;

pub use cache::{CachedPageSource, DiskCache};
pub use client::{ApiResponse, ClientOptions, NotionHttpClient};
pub use traversal::{discover_child_pages, CrawlOptions, SpaceCrawler};
