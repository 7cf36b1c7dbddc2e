// src/model/record_map.rs
//! The record map: everything the content source knows about one page.
//!
//! Notion returns records keyed by dashed UUID, each wrapped in a
//! `{ role, value }` envelope. Only the fields the site map reads are typed;
//! the rest ride along in `extra` so a serialized map stays faithful.

use crate::types::{normalize_id, CollectionId, PageId, SpaceId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Block types that are themselves pages in the published site.
pub const PAGE_BLOCK_TYPES: &[&str] = &["page", "collection_view_page"];

/// Block types that host a collection (and so get a collection query).
pub const COLLECTION_BLOCK_TYPES: &[&str] = &["collection_view", "collection_view_page"];

/// A `{ role, value }` envelope around one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default = "Option::default")]
    pub value: Option<T>,
}

impl<T> Record<T> {
    pub fn new(value: T) -> Self {
        Self {
            role: Some("reader".to_string()),
            value: Some(value),
        }
    }
}

/// One block record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub id: String,
    #[serde(rename = "type", default)]
    pub block_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alive: Option<bool>,
    /// Property id -> rich-text decorations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_ids: Option<Vec<String>>,
    /// Epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<i64>,
    /// Epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_edited_time: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BlockRecord {
    pub fn new(id: impl Into<String>, block_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            block_type: block_type.into(),
            alive: Some(true),
            ..Default::default()
        }
    }

    pub fn is_page(&self) -> bool {
        PAGE_BLOCK_TYPES.contains(&self.block_type.as_str())
    }

    pub fn is_collection_host(&self) -> bool {
        COLLECTION_BLOCK_TYPES.contains(&self.block_type.as_str())
    }

    /// Deleted blocks come back with `alive: false`; absent means alive.
    pub fn is_alive(&self) -> bool {
        self.alive != Some(false)
    }

    pub fn space(&self) -> Option<SpaceId> {
        self.space_id.as_deref().map(SpaceId::new)
    }

    pub fn with_space(mut self, space_id: impl Into<String>) -> Self {
        self.space_id = Some(space_id.into());
        self
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>, table: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self.parent_table = Some(table.into());
        self
    }

    /// Sets a plain-text property value.
    pub fn with_text_property(mut self, property_id: &str, text: &str) -> Self {
        self.properties
            .get_or_insert_with(IndexMap::new)
            .insert(property_id.to_string(), serde_json::json!([[text]]));
        self
    }

    pub fn with_title(self, title: &str) -> Self {
        self.with_text_property("title", title)
    }

    pub fn with_times(mut self, created: Option<i64>, last_edited: Option<i64>) -> Self {
        self.created_time = created;
        self.last_edited_time = last_edited;
        self
    }

    pub fn with_collection(mut self, collection_id: impl Into<String>, view_ids: Vec<String>) -> Self {
        self.collection_id = Some(collection_id.into());
        self.view_ids = Some(view_ids);
        self
    }

    pub fn with_alive(mut self, alive: bool) -> Self {
        self.alive = Some(alive);
        self
    }
}

/// One column of a collection schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaProperty {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub property_type: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SchemaProperty {
    pub fn new(name: impl Into<String>, property_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            property_type: property_type.into(),
            extra: Map::new(),
        }
    }
}

/// A collection (database): its name and property schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionRecord {
    pub id: String,
    /// Rich-text decorations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(default)]
    pub schema: IndexMap<String, SchemaProperty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CollectionRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(serde_json::json!([[name]]));
        self
    }

    pub fn with_property(mut self, property_id: &str, property: SchemaProperty) -> Self {
        self.schema.insert(property_id.to_string(), property);
        self
    }
}

/// Result of querying one collection view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionQueryResult {
    #[serde(rename = "blockIds", default)]
    pub block_ids: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Everything loaded for one page: blocks, collections, views and
/// collection query results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordMap {
    #[serde(default)]
    pub block: IndexMap<String, Record<BlockRecord>>,
    #[serde(default)]
    pub collection: IndexMap<String, Record<CollectionRecord>>,
    #[serde(default)]
    pub collection_view: IndexMap<String, Record<Value>>,
    /// collection id -> view id -> query result
    #[serde(default)]
    pub collection_query: IndexMap<String, IndexMap<String, CollectionQueryResult>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RecordMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a block by ID, tolerating dashed/compact mismatches.
    pub fn block(&self, id: &str) -> Option<&BlockRecord> {
        if let Some(record) = self.block.get(id) {
            return record.value.as_ref();
        }
        let wanted = normalize_id(id);
        self.block
            .iter()
            .find(|(key, _)| normalize_id(key) == wanted)
            .and_then(|(_, record)| record.value.as_ref())
    }

    /// The block record of a page, the page's "primary block".
    pub fn page_block(&self, page_id: &PageId) -> Option<&BlockRecord> {
        self.block(page_id.as_str())
    }

    pub fn collection(&self, id: &str) -> Option<&CollectionRecord> {
        if let Some(record) = self.collection.get(id) {
            return record.value.as_ref();
        }
        let wanted = normalize_id(id);
        self.collection
            .iter()
            .find(|(key, _)| normalize_id(key) == wanted)
            .and_then(|(_, record)| record.value.as_ref())
    }

    /// Every block id listed by any collection query in this map, in order.
    pub fn collection_item_ids(&self) -> impl Iterator<Item = &str> {
        self.collection_query
            .values()
            .flat_map(|views| views.values())
            .flat_map(|result| result.block_ids.iter().map(String::as_str))
    }

    /// Collection hosts embedded in this map: `(collection, view)` pairs.
    pub fn collection_views(&self) -> Vec<(CollectionId, String)> {
        self.block
            .values()
            .filter_map(|record| record.value.as_ref())
            .filter(|block| block.is_alive() && block.is_collection_host())
            .filter_map(|block| {
                let collection_id = block.collection_id.as_ref()?;
                Some(
                    block
                        .view_ids
                        .iter()
                        .flatten()
                        .map(|view| (CollectionId::new(collection_id.as_str()), view.clone()))
                        .collect::<Vec<_>>(),
                )
            })
            .flatten()
            .collect()
    }

    pub fn with_block(mut self, block: BlockRecord) -> Self {
        self.block.insert(block.id.clone(), Record::new(block));
        self
    }

    pub fn with_collection(mut self, collection: CollectionRecord) -> Self {
        self.collection
            .insert(collection.id.clone(), Record::new(collection));
        self
    }

    pub fn with_query_result(
        mut self,
        collection_id: &str,
        view_id: &str,
        block_ids: Vec<String>,
    ) -> Self {
        self.collection_query
            .entry(collection_id.to_string())
            .or_default()
            .insert(
                view_id.to_string(),
                CollectionQueryResult {
                    block_ids,
                    extra: Map::new(),
                },
            );
        self
    }

    /// Folds another record map into this one. Existing records win, so the
    /// page chunk's own view of a block is never replaced by a query result.
    pub fn merge(&mut self, other: RecordMap) {
        for (id, record) in other.block {
            self.block.entry(id).or_insert(record);
        }
        for (id, record) in other.collection {
            self.collection.entry(id).or_insert(record);
        }
        for (id, record) in other.collection_view {
            self.collection_view.entry(id).or_insert(record);
        }
        for (collection_id, views) in other.collection_query {
            let entry = self.collection_query.entry(collection_id).or_default();
            for (view_id, result) in views {
                entry.entry(view_id).or_insert(result);
            }
        }
        for (key, value) in other.extra {
            self.extra.entry(key).or_insert(value);
        }
    }
}
