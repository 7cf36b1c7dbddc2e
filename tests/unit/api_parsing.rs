// tests/unit/api_parsing.rs
//! Parsing of recorded web API responses and reading what the site map needs.

use notion_site_map::{
    block_title, discover_child_pages, parser, read_boolean_property, read_page_property,
    ApiResponse, FetchError, PageId, PropertyValue, RecordMap, SpaceId,
};
use pretty_assertions::assert_eq;
use reqwest::StatusCode;

const ROOT_ID: &str = "067dd719-a912-471e-a9a3-ac10710e7fdf";
const POST_ID: &str = "f1e2d3c4-b5a6-4978-8695-a4b3c2d1e0f9";

fn ok(json: &str) -> ApiResponse<String> {
    ApiResponse {
        data: json.to_string(),
        status: StatusCode::OK,
        url: "https://www.notion.so/api/v3/loadPageChunk".to_string(),
        retry_after_seconds: None,
    }
}

fn root_chunk() -> RecordMap {
    parser::parse_page_chunk_response(ok(include_str!(
        "../fixtures/api_responses/load_page_chunk_root.json"
    )))
    .unwrap()
    .record_map
}

fn post_chunk() -> RecordMap {
    parser::parse_page_chunk_response(ok(include_str!(
        "../fixtures/api_responses/load_page_chunk_post.json"
    )))
    .unwrap()
    .record_map
}

#[test]
fn root_chunk_parses_with_unknown_tables_kept() {
    let record_map = root_chunk();

    assert_eq!(record_map.block.len(), 5);
    assert_eq!(record_map.collection.len(), 1);
    assert!(record_map.extra.contains_key("notion_user"));

    let root = record_map.page_block(&PageId::new(ROOT_ID)).unwrap();
    assert_eq!(root.space_id.as_deref(), Some("e1f2a3b4-c5d6-4e7f-8a9b-0c1d2e3f4a5b"));
    assert_eq!(root.last_edited_time, Some(1_617_494_400_000));
    assert!(root.extra.contains_key("format"));
}

#[test]
fn compact_ids_find_dashed_blocks() {
    let record_map = root_chunk();
    let compact = PageId::new("067dd719a912471ea9a3ac10710e7fdf");

    assert_eq!(
        block_title(record_map.page_block(&compact).unwrap(), &record_map).as_deref(),
        Some("Home")
    );
}

#[test]
fn children_are_live_pages_then_collection_rows() {
    let record_map = root_chunk();
    let space = SpaceId::new("e1f2a3b4c5d64e7f8a9b0c1d2e3f4a5b");

    let children: Vec<String> = discover_child_pages(&record_map, Some(&space), true)
        .iter()
        .map(|id| id.as_str().to_string())
        .collect();

    assert_eq!(
        children,
        vec![
            ROOT_ID,
            "7a1c6a35-5f0b-4a5e-9b43-0c4c1a6a1c01",
            "b3a4f7c2-1d2e-4f3a-8b9c-0d1e2f3a4b5c",
            POST_ID,
            "a9b8c7d6-e5f4-4a3b-9c2d-1e0f9a8b7c6d",
        ]
    );

    let without_rows = discover_child_pages(&record_map, Some(&space), false);
    assert_eq!(without_rows.len(), 3);

    let other_space = discover_child_pages(&record_map, Some(&SpaceId::new("elsewhere")), true);
    assert_eq!(other_space.len(), 2);
}

#[test]
fn collection_page_is_titled_by_its_collection() {
    let record_map = root_chunk();
    let blog = record_map.block("b3a4f7c2-1d2e-4f3a-8b9c-0d1e2f3a4b5c").unwrap();

    assert_eq!(block_title(blog, &record_map).as_deref(), Some("Blog Posts"));
    assert_eq!(
        record_map.collection_views().len(),
        1,
        "one view of one collection"
    );
}

#[test]
fn post_properties_decode_by_schema_type() {
    let record_map = post_chunk();
    let post = record_map.page_block(&PageId::new(POST_ID)).unwrap();

    assert_eq!(read_boolean_property("Public", post, &record_map), Some(true));
    assert_eq!(read_boolean_property("public", post, &record_map), Some(true));
    assert_eq!(
        read_page_property("Slug", post, &record_map),
        Some(PropertyValue::Text("hello-world".to_string()))
    );
    assert_eq!(
        read_page_property("Published", post, &record_map),
        Some(PropertyValue::Timestamp(1_614_816_000_000))
    );
    assert_eq!(read_page_property("Tags", post, &record_map), None);
    assert_eq!(
        block_title(post, &record_map).as_deref(),
        Some("Hello, Notion!")
    );
}

#[test]
fn pages_outside_collections_have_no_properties_to_read() {
    let record_map = root_chunk();
    let about = record_map.block("7a1c6a35-5f0b-4a5e-9b43-0c4c1a6a1c01").unwrap();

    assert_eq!(read_boolean_property("Public", about, &record_map), None);
    assert_eq!(block_title(about, &record_map).as_deref(), Some("About Us"));
}

#[test]
fn error_statuses_become_fetch_errors() {
    let response = ApiResponse {
        data: r#"{"errorId":"e1","name":"UnauthorizedError","message":"Unauthorized"}"#
            .to_string(),
        status: StatusCode::UNAUTHORIZED,
        url: "https://www.notion.so/api/v3/loadPageChunk".to_string(),
        retry_after_seconds: None,
    };

    let err = parser::parse_page_chunk_response(response).unwrap_err();

    assert!(matches!(err, FetchError::Unauthorized { .. }));
    assert!(!err.is_retryable());
}
