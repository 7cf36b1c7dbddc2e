//! Domain model for content loaded from a Notion workspace.
//!
//! The content source hands back one [`RecordMap`] per page. The site map
//! never renders these, it only reads identity, visibility, timestamps and
//! titles out of them.

pub mod properties;
mod record_map;

pub use properties::{
    block_title, normalize_title, read_boolean_property, read_page_property, text_content,
    PropertyValue,
};
pub use record_map::{
    BlockRecord, CollectionQueryResult, CollectionRecord, Record, RecordMap, SchemaProperty,
    COLLECTION_BLOCK_TYPES, PAGE_BLOCK_TYPES,
};
