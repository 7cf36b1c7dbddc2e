// src/output/render.rs
//! Renders a site map as JSON or as a sitemap.xml document.

use crate::analytics::SiteMapStats;
use crate::config::{OutputFormat, SiteConfig};
use crate::error::AppError;
use crate::site_map::{CanonicalPageMap, SiteMap};
use crate::types::ValidationError;
use chrono::SecondsFormat;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt::Write;
use url::Url;

const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SiteMapDocument<'a> {
    site: &'a SiteConfig,
    /// Crawled page ids in crawl order, each marked with whether it loaded.
    page_map: IndexMap<&'a str, bool>,
    canonical_page_map: &'a CanonicalPageMap,
    stats: &'a SiteMapStats,
}

pub fn render(site_map: &SiteMap, format: OutputFormat) -> Result<String, AppError> {
    match format {
        OutputFormat::Json => render_json(site_map),
        OutputFormat::SitemapXml => render_sitemap_xml(site_map),
    }
}

/// Pretty JSON of the site, the page map, the canonical page map and the
/// build stats.
///
/// The page map lists every crawled page id; the record maps themselves are
/// left out.
pub fn render_json(site_map: &SiteMap) -> Result<String, AppError> {
    let document = SiteMapDocument {
        site: &site_map.site,
        page_map: site_map
            .page_map
            .iter()
            .map(|(page_id, record_map)| (page_id.as_str(), record_map.is_some()))
            .collect(),
        canonical_page_map: &site_map.canonical_page_map,
        stats: &site_map.stats,
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// A sitemap listing the site root followed by every published slug.
///
/// Pages with an unknown modification time (the epoch) get no `<lastmod>`.
pub fn render_sitemap_xml(site_map: &SiteMap) -> Result<String, AppError> {
    let root = site_map.site.domain.root_url()?;

    let mut xml = String::new();
    writeln!(xml, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(xml, r#"<urlset xmlns="{}">"#, SITEMAP_NAMESPACE)?;
    write_url(&mut xml, root.as_str(), None)?;

    for (slug, page) in site_map.canonical_page_map.iter() {
        let loc = page_url(&root, slug)?;
        let lastmod = Some(page.last_modified_time)
            .filter(|time| time.timestamp_millis() != 0)
            .map(|time| time.to_rfc3339_opts(SecondsFormat::Secs, true));
        write_url(&mut xml, loc.as_str(), lastmod.as_deref())?;
    }

    writeln!(xml, "</urlset>")?;
    Ok(xml)
}

/// `https://{domain}/{slug}`, with the slug percent-encoded as one segment.
pub fn page_url(root: &Url, slug: &str) -> Result<Url, ValidationError> {
    let mut url = root.clone();
    url.path_segments_mut()
        .map_err(|_| ValidationError::InvalidUrl {
            url: root.to_string(),
            reason: "cannot be a base URL".to_string(),
        })?
        .pop_if_empty()
        .push(slug);
    Ok(url)
}

fn write_url(xml: &mut String, loc: &str, lastmod: Option<&str>) -> std::fmt::Result {
    writeln!(xml, "  <url>")?;
    writeln!(xml, "    <loc>{}</loc>", escape_xml(loc))?;
    if let Some(lastmod) = lastmod {
        writeln!(xml, "    <lastmod>{}</lastmod>", lastmod)?;
    }
    writeln!(xml, "  </url>")
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
