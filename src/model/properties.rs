// src/model/properties.rs
//! Reading page properties out of a record map.
//!
//! A page that lives in a collection stores its property values under opaque
//! property ids; the column names live in the parent collection's schema.
//! Lookups therefore always need the page's own record map.

use super::record_map::{BlockRecord, RecordMap};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

/// A decoded page property.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Text(String),
    Checkbox(bool),
    MultiSelect(Vec<String>),
    /// Epoch milliseconds.
    Timestamp(i64),
}

impl PropertyValue {
    /// Truthiness of the value when read as a flag.
    ///
    /// Checkboxes are themselves; text is true when non-empty.
    pub fn as_flag(&self) -> bool {
        match self {
            Self::Checkbox(checked) => *checked,
            Self::Text(text) => !text.is_empty(),
            Self::MultiSelect(items) => !items.is_empty(),
            Self::Timestamp(_) => true,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Concatenates the text runs of a rich-text decoration array.
///
/// Decorations look like `[["Hello "], ["world", [["b"]]]]`.
pub fn text_content(decorations: &Value) -> String {
    match decorations {
        Value::Array(runs) => runs
            .iter()
            .filter_map(|run| match run {
                Value::Array(parts) => parts.first().and_then(Value::as_str),
                Value::String(text) => Some(text.as_str()),
                _ => None,
            })
            .collect(),
        Value::String(text) => text.clone(),
        _ => String::new(),
    }
}

/// Reads a named property of a page block.
///
/// Returns `None` when the block has no properties, its parent collection is
/// not in `record_map`, or the collection has no column called `name`
/// (matched case-insensitively).
pub fn read_page_property(
    name: &str,
    block: &BlockRecord,
    record_map: &RecordMap,
) -> Option<PropertyValue> {
    let properties = block.properties.as_ref()?;
    if record_map.collection.is_empty() {
        return None;
    }

    let collection = record_map.collection(block.parent_id.as_deref()?)?;
    let wanted = name.to_lowercase();
    let (property_id, schema) = collection
        .schema
        .iter()
        .find(|(_, schema)| schema.name.to_lowercase() == wanted)?;

    let raw = properties.get(property_id);
    let content = raw.map(text_content).unwrap_or_default();

    let value = match schema.property_type.as_str() {
        "created_time" => PropertyValue::Timestamp(block.created_time?),
        "last_edited_time" => PropertyValue::Timestamp(block.last_edited_time?),
        "checkbox" => PropertyValue::Checkbox(content == "Yes"),
        "multi_select" => PropertyValue::MultiSelect(
            content
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        "date" => PropertyValue::Timestamp(date_start_millis(raw?)?),
        _ => PropertyValue::Text(content),
    };

    Some(value)
}

/// Reads a property as a flag; `None` when the property is absent.
pub fn read_boolean_property(
    name: &str,
    block: &BlockRecord,
    record_map: &RecordMap,
) -> Option<bool> {
    read_page_property(name, block, record_map).map(|value| value.as_flag())
}

/// Finds the `start_date` of a date mention inside a decoration array.
///
/// Date properties look like `[["‣", [["d", {"type": "date", "start_date": "2021-03-04"}]]]]`.
fn date_start_millis(decorations: &Value) -> Option<i64> {
    let runs = decorations.as_array()?;
    let date = runs
        .iter()
        .filter_map(|run| run.as_array()?.get(1)?.as_array())
        .flatten()
        .filter_map(Value::as_array)
        .find(|annotation| annotation.first().and_then(Value::as_str) == Some("d"))?
        .get(1)?;

    let start = date.get("start_date")?.as_str()?;
    let day = NaiveDate::parse_from_str(start, "%Y-%m-%d").ok()?;
    Some(day.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis())
}

/// The display title of a page block.
///
/// Collection pages are titled by their collection's name.
pub fn block_title(block: &BlockRecord, record_map: &RecordMap) -> Option<String> {
    let title = if block.is_collection_host() {
        block
            .collection_id
            .as_deref()
            .and_then(|id| record_map.collection(id))
            .and_then(|collection| collection.name.as_ref())
            .map(text_content)
    } else {
        None
    };

    let title = title.or_else(|| {
        block
            .properties
            .as_ref()
            .and_then(|properties| properties.get("title"))
            .map(text_content)
    })?;

    let title = title.trim();
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}

fn is_slug_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c == '-'
        || ('\u{4e00}'..='\u{9fff}').contains(&c)
        || ('\u{3041}'..='\u{3096}').contains(&c)
        || ('\u{30a1}'..='\u{30fc}').contains(&c)
        || ('\u{3000}'..='\u{303f}').contains(&c)
}

/// Turns a title into a URL slug: spaces become dashes, everything outside
/// ASCII alphanumerics and the CJK ranges is dropped.
///
/// Dashes are cleaned up in a single pass: each non-overlapping `--` becomes
/// `-`, then one dash is cut from each end. Published URLs depend on this
/// exact form, so `"Foo - Bar"` stays `foo--bar`.
pub fn normalize_title(title: &str) -> String {
    let dashed: String = title
        .replace(' ', "-")
        .chars()
        .filter(|c| is_slug_char(*c))
        .collect();

    let halved = dashed.replace("--", "-");
    let trimmed = halved.strip_suffix('-').unwrap_or(&halved);
    let trimmed = trimmed.strip_prefix('-').unwrap_or(trimmed);

    trimmed.trim().to_lowercase()
}
