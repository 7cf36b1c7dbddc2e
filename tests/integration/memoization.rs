// tests/integration/memoization.rs
//! Repeat and concurrent builds share one crawl per root.

use super::workspace::*;
use notion_site_map::{PageId, SiteConfig, SiteDomain, SiteMapBuilder, SpaceCrawler, SpaceId};
use std::sync::Arc;
use std::time::Duration;

fn site() -> SiteConfig {
    SiteConfig::new(
        "Fixture Blog",
        SiteDomain::parse("blog.example.com").unwrap(),
        PageId::new(ROOT_ID),
    )
}

fn builder(workspace: Arc<FakeWorkspace>) -> SiteMapBuilder {
    SiteMapBuilder::for_site(&site(), Arc::new(SpaceCrawler::default()), workspace)
}

#[tokio::test]
async fn second_build_does_not_fetch_again() {
    let workspace = Arc::new(FakeWorkspace::blog());
    let builder = builder(workspace.clone());
    let root = PageId::new(ROOT_ID);

    let first = builder.build_site_map(&root, None, site()).await.unwrap();
    assert_eq!(workspace.fetch_count(), 5);

    let second = builder.build_site_map(&root, None, site()).await.unwrap();
    assert_eq!(workspace.fetch_count(), 5);
    assert!(Arc::ptr_eq(&first.page_map, &second.page_map));
    assert!(Arc::ptr_eq(
        &first.canonical_page_map,
        &second.canonical_page_map
    ));
}

#[tokio::test]
async fn each_page_is_fetched_once_per_crawl() {
    let workspace = Arc::new(FakeWorkspace::blog());
    builder(workspace.clone())
        .build_site_map(&PageId::new(ROOT_ID), None, site())
        .await
        .unwrap();

    let mut log = workspace.fetch_log();
    let total = log.len();
    log.sort();
    log.dedup();
    assert_eq!(log.len(), total);
}

#[tokio::test]
async fn concurrent_builds_share_one_crawl() {
    let workspace = Arc::new(FakeWorkspace::blog().with_delay(Duration::from_millis(25)));
    let builder = builder(workspace.clone());
    let root = PageId::new(ROOT_ID);

    let (first, second) = tokio::join!(
        builder.build_site_map(&root, None, site()),
        builder.build_site_map(&root, None, site()),
    );
    let (first, second) = (first.unwrap(), second.unwrap());

    assert_eq!(workspace.fetch_count(), 5);
    assert!(first.shares_pages_with(&second));
}

#[tokio::test]
async fn cloned_builders_share_the_cache() {
    let workspace = Arc::new(FakeWorkspace::blog());
    let builder = builder(workspace.clone());
    let clone = builder.clone();
    let root = PageId::new(ROOT_ID);

    let first = builder.build_site_map(&root, None, site()).await.unwrap();
    let second = clone.build_site_map(&root, None, site()).await.unwrap();

    assert_eq!(workspace.fetch_count(), 5);
    assert!(first.shares_pages_with(&second));
}

#[tokio::test]
async fn root_and_space_form_the_key() {
    let workspace = Arc::new(FakeWorkspace::blog());
    let builder = builder(workspace.clone());
    let root = PageId::new(ROOT_ID);
    let space = SpaceId::new(SPACE_ID);

    let auto = builder.build_site_map(&root, None, site()).await.unwrap();
    let pinned = builder
        .build_site_map(&root, Some(&space), site())
        .await
        .unwrap();

    assert_eq!(workspace.fetch_count(), 10);
    assert!(!auto.shares_pages_with(&pinned));
    assert_eq!(
        auto.slugs().collect::<Vec<_>>(),
        pinned.slugs().collect::<Vec<_>>()
    );
    assert_eq!(builder.cache().len(), 2);
}
