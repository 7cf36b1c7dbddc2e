// src/api/responses.rs
//! Wire shapes of the Notion web API responses this crate reads.

use crate::model::{CollectionQueryResult, RecordMap};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body of `loadPageChunk`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadPageChunkRequest {
    pub page_id: String,
    pub limit: u32,
    pub cursor: Cursor,
    pub chunk_number: u32,
    pub vertical_columns: bool,
}

/// Pagination cursor of `loadPageChunk`; an empty stack means "done".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cursor {
    #[serde(default)]
    pub stack: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadPageChunkResponse {
    #[serde(default)]
    pub record_map: RecordMap,
    #[serde(default)]
    pub cursor: Option<Cursor>,
}

impl LoadPageChunkResponse {
    pub fn has_more(&self) -> bool {
        self.cursor
            .as_ref()
            .is_some_and(|cursor| !cursor.stack.is_empty())
    }
}

/// Request body of `queryCollection` using the reducer loader.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryCollectionRequest {
    pub collection: IdRef,
    pub collection_view: IdRef,
    pub loader: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct IdRef {
    pub id: String,
}

impl QueryCollectionRequest {
    pub fn new(collection_id: &str, view_id: &str, limit: u32, user_time_zone: &str) -> Self {
        Self {
            collection: IdRef {
                id: collection_id.to_string(),
            },
            collection_view: IdRef {
                id: view_id.to_string(),
            },
            loader: serde_json::json!({
                "type": "reducer",
                "reducers": {
                    "collection_group_results": { "type": "results", "limit": limit }
                },
                "searchQuery": "",
                "userTimeZone": user_time_zone,
            }),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryCollectionResponse {
    #[serde(default)]
    pub result: QueryResult,
    #[serde(default)]
    pub record_map: RecordMap,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    #[serde(default)]
    pub reducer_results: ReducerResults,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReducerResults {
    #[serde(default)]
    pub collection_group_results: Option<CollectionQueryResult>,
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotionErrorBody {
    #[serde(default)]
    pub error_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub message: String,
}
