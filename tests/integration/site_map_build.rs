// tests/integration/site_map_build.rs
//! Whole builds against the fixture workspace.

use super::workspace::*;
use notion_site_map::{
    render, AppError, CrawlOptions, OutputFormat, PageId, SiteConfig, SiteDomain, SiteMap,
    SiteMapBuilder, SpaceCrawler, SpaceId,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn site() -> SiteConfig {
    SiteConfig::new(
        "Fixture Blog",
        SiteDomain::parse("blog.example.com").unwrap(),
        PageId::new(ROOT_ID),
    )
}

fn builder(workspace: FakeWorkspace) -> SiteMapBuilder {
    SiteMapBuilder::for_site(
        &site(),
        Arc::new(SpaceCrawler::default()),
        Arc::new(workspace),
    )
}

async fn build(builder: &SiteMapBuilder) -> Result<SiteMap, AppError> {
    builder
        .build_site_map(&PageId::new(ROOT_ID), None, site())
        .await
}

fn canonical(site_map: &SiteMap) -> Vec<(String, String)> {
    site_map
        .canonical_page_map
        .iter()
        .map(|(slug, data)| (slug.clone(), data.page_id.normalized()))
        .collect()
}

#[tokio::test]
async fn publishes_every_public_page_except_the_root() {
    let site_map = build(&builder(FakeWorkspace::blog())).await.unwrap();

    assert_eq!(
        canonical(&site_map),
        vec![
            ("about-us".to_string(), PageId::new(ABOUT_ID).normalized()),
            ("blog-posts".to_string(), PageId::new(BLOG_ID).normalized()),
            ("hello-world".to_string(), PageId::new(POST_ID).normalized()),
        ]
    );

    let crawled: Vec<String> = site_map.page_map.keys().map(PageId::normalized).collect();
    assert_eq!(
        crawled,
        vec![
            PageId::new(ROOT_ID).normalized(),
            PageId::new(ABOUT_ID).normalized(),
            PageId::new(BLOG_ID).normalized(),
            PageId::new(POST_ID).normalized(),
            PageId::new(DRAFT_ID).normalized(),
        ]
    );

    assert_eq!(site_map.stats.crawled, 5);
    assert_eq!(site_map.stats.private, 1);
    assert_eq!(site_map.stats.published, 3);
    assert!(site_map.stats.collisions.is_empty());
}

#[tokio::test]
async fn last_modified_times_come_from_the_blocks() {
    let site_map = build(&builder(FakeWorkspace::blog())).await.unwrap();
    let time = |slug: &str| site_map.canonical_page_map[slug].last_modified_time.timestamp_millis();

    // edited post, created-only page, collection page with neither
    assert_eq!(time("hello-world"), 1_615_248_000_000);
    assert_eq!(time("about-us"), 1_614_902_400_000);
    assert_eq!(time("blog-posts"), 0);
}

#[tokio::test]
async fn unloadable_page_fails_the_build() {
    let workspace = FakeWorkspace::blog().without_page(DRAFT_ID);

    let err = build(&builder(workspace)).await.unwrap_err();

    assert!(matches!(err, AppError::PageNotLoaded { .. }));
    assert_eq!(
        err.to_string(),
        format!("Error loading page \"{}\"", DRAFT_ID)
    );
}

#[tokio::test]
async fn foreign_root_space_yields_an_empty_site() {
    let site_map = builder(FakeWorkspace::blog())
        .build_site_map(&PageId::new(ROOT_ID), Some(&SpaceId::new("another-space")), site())
        .await
        .unwrap();

    assert!(site_map.page_map.is_empty());
    assert!(site_map.canonical_page_map.is_empty());
}

#[tokio::test]
async fn raw_ids_can_be_appended_to_slugs() {
    let mut site = site();
    site.include_notion_id_in_urls = true;
    let builder = SiteMapBuilder::for_site(
        &site,
        Arc::new(SpaceCrawler::default()),
        Arc::new(FakeWorkspace::blog()),
    );

    let site_map = builder
        .build_site_map(&PageId::new(ROOT_ID), None, site)
        .await
        .unwrap();

    assert_eq!(
        site_map.slugs().collect::<Vec<_>>(),
        vec![
            "about-us-7a1c6a355f0b4a5e9b430c4c1a6a1c01",
            "blog-posts-b3a4f7c21d2e4f3a8b9c0d1e2f3a4b5c",
            "hello-world-f1e2d3c4b5a649788695a4b3c2d1e0f9",
        ]
    );
}

#[tokio::test]
async fn collections_can_be_skipped() {
    let builder = SiteMapBuilder::for_site(
        &site(),
        Arc::new(SpaceCrawler::new(CrawlOptions {
            traverse_collections: false,
            ..CrawlOptions::default()
        })),
        Arc::new(FakeWorkspace::blog()),
    );

    let site_map = build(&builder).await.unwrap();

    assert_eq!(
        site_map.slugs().collect::<Vec<_>>(),
        vec!["about-us", "blog-posts"]
    );
}

#[tokio::test]
async fn sitemap_xml_lists_published_urls() {
    let site_map = build(&builder(FakeWorkspace::blog())).await.unwrap();

    let xml = render(&site_map, OutputFormat::SitemapXml).unwrap();

    assert!(xml.contains("<loc>https://blog.example.com/</loc>"));
    assert!(xml.contains("<loc>https://blog.example.com/hello-world</loc>"));
    assert!(xml.contains("<lastmod>2021-03-09T00:00:00Z</lastmod>"));
    assert!(!xml.contains(&PageId::new(DRAFT_ID).normalized()));
    assert_eq!(xml.matches("<url>").count(), 4);
}

#[tokio::test]
async fn json_output_carries_site_and_pages() {
    let site_map = build(&builder(FakeWorkspace::blog())).await.unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&render(&site_map, OutputFormat::Json).unwrap()).unwrap();

    assert_eq!(json["site"]["name"], "Fixture Blog");
    assert_eq!(json["canonicalPageMap"]["hello-world"]["pageId"], POST_ID);
    assert_eq!(json["stats"]["published"], 3);
    assert_eq!(json["pageMap"].as_object().unwrap().len(), 5);
    assert_eq!(json["pageMap"][POST_ID], true);
}
