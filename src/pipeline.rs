// src/pipeline.rs
//! Pipeline capability traits: the two stages of a site-map run.
//!
//! Each trait describes a single capability, so each stage can be tested in
//! isolation.

use crate::error::AppError;
use crate::output::OutputReport;
use crate::site_map::SiteMap;

/// Produces the site map for the configured site.
#[async_trait::async_trait]
pub trait SiteMapSource {
    async fn site_map(&self) -> Result<SiteMap, AppError>;
}

/// Renders a site map and delivers it to its destination.
pub trait SiteMapDelivery {
    fn deliver(&self, site_map: &SiteMap) -> Result<OutputReport, AppError>;
}
