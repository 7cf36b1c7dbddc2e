// tests/integration/workspace.rs
//! An in-memory Notion workspace built from the API fixtures.

use async_trait::async_trait;
use notion_site_map::{
    normalize_id, parser, ApiResponse, BlockRecord, CollectionRecord, FetchError, PageId,
    PageSource, RecordMap, SchemaProperty, SpaceId,
};
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub const ROOT_ID: &str = "067dd719a912471ea9a3ac10710e7fdf";
pub const SPACE_ID: &str = "e1f2a3b4-c5d6-4e7f-8a9b-0c1d2e3f4a5b";
pub const ABOUT_ID: &str = "7a1c6a35-5f0b-4a5e-9b43-0c4c1a6a1c01";
pub const BLOG_ID: &str = "b3a4f7c2-1d2e-4f3a-8b9c-0d1e2f3a4b5c";
pub const POST_ID: &str = "f1e2d3c4-b5a6-4978-8695-a4b3c2d1e0f9";
pub const DRAFT_ID: &str = "a9b8c7d6-e5f4-4a3b-9c2d-1e0f9a8b7c6d";
pub const COLLECTION_ID: &str = "5d4c3b2a-1f0e-4d9c-8b7a-6f5e4d3c2b1a";

/// Parses a `loadPageChunk` fixture the way the HTTP client does.
pub fn load_fixture(json: &str) -> RecordMap {
    let response = ApiResponse {
        data: json.to_string(),
        status: StatusCode::OK,
        url: "https://www.notion.so/api/v3/loadPageChunk".to_string(),
        retry_after_seconds: None,
    };
    parser::parse_page_chunk_response(response)
        .expect("fixture should parse")
        .record_map
}

pub fn root_chunk() -> RecordMap {
    load_fixture(include_str!("../fixtures/api_responses/load_page_chunk_root.json"))
}

pub fn post_chunk() -> RecordMap {
    load_fixture(include_str!("../fixtures/api_responses/load_page_chunk_post.json"))
}

fn blog_collection() -> CollectionRecord {
    CollectionRecord::new(COLLECTION_ID)
        .with_name("Blog Posts")
        .with_property("title", SchemaProperty::new("Name", "title"))
        .with_property("Pb!x", SchemaProperty::new("Public", "checkbox"))
        .with_property("s;lg", SchemaProperty::new("Slug", "text"))
}

/// A page source serving fixed record maps, counting every fetch.
pub struct FakeWorkspace {
    pages: HashMap<String, RecordMap>,
    fetches: AtomicUsize,
    fetch_log: Mutex<Vec<String>>,
    delay: Option<Duration>,
}

impl FakeWorkspace {
    pub fn empty() -> Self {
        Self {
            pages: HashMap::new(),
            fetches: AtomicUsize::new(0),
            fetch_log: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Home, an "About Us" page, a blog collection with one public post and
    /// one unpublished draft.
    pub fn blog() -> Self {
        let about = RecordMap::new().with_block(
            BlockRecord::new(ABOUT_ID, "page")
                .with_space(SPACE_ID)
                .with_parent(ROOT_ID, "block")
                .with_title("About Us")
                .with_times(Some(1_614_902_400_000), None),
        );
        let blog = RecordMap::new()
            .with_block(
                BlockRecord::new(BLOG_ID, "collection_view_page")
                    .with_space(SPACE_ID)
                    .with_parent(ROOT_ID, "block")
                    .with_collection(COLLECTION_ID, vec![]),
            )
            .with_collection(blog_collection());
        let draft = RecordMap::new()
            .with_block(
                BlockRecord::new(DRAFT_ID, "page")
                    .with_space(SPACE_ID)
                    .with_parent(COLLECTION_ID, "collection")
                    .with_title("Unfinished thoughts"),
            )
            .with_collection(blog_collection());

        Self::empty()
            .with_page(ROOT_ID, root_chunk())
            .with_page(ABOUT_ID, about)
            .with_page(BLOG_ID, blog)
            .with_page(POST_ID, post_chunk())
            .with_page(DRAFT_ID, draft)
    }

    pub fn with_page(mut self, page_id: &str, record_map: RecordMap) -> Self {
        self.pages.insert(normalize_id(page_id), record_map);
        self
    }

    pub fn without_page(mut self, page_id: &str) -> Self {
        self.pages.remove(&normalize_id(page_id));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn fetch_log(&self) -> Vec<String> {
        self.fetch_log.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageSource for FakeWorkspace {
    async fn fetch_page(
        &self,
        page_id: &PageId,
        _space_id: Option<&SpaceId>,
    ) -> Result<RecordMap, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.fetch_log.lock().unwrap().push(page_id.normalized());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.pages
            .get(&page_id.normalized())
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                id: page_id.as_str().to_string(),
            })
    }
}
