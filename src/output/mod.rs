// src/output/mod.rs
//! Output handling with planning separated from execution.
//!
//! [`render`] turns a site map into text without touching the filesystem;
//! [`deliver`] executes an [`OutputPlan`] and reports what happened.

mod render;
mod types;
mod writer;

pub use render::{page_url, render, render_json, render_sitemap_xml};
pub use types::{CompletedOperation, DeliveryTarget, FailedOperation, OutputPlan, OutputReport};
pub use writer::deliver;
