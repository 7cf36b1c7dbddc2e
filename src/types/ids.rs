use super::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use uuid::Uuid;

/// Strong typing for IDs with phantom types.
///
/// The raw value is kept exactly as the content source reported it (record
/// map keys are dashed UUIDs, URLs carry the compact form). Comparisons across
/// formats go through [`Id::normalized`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T> {
    value: String,
    _phantom: PhantomData<T>,
}

/// Marker types for different ID kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpaceMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionMarker;

/// Type aliases for specific ID types
pub type PageId = Id<PageMarker>;
pub type SpaceId = Id<SpaceMarker>;
pub type CollectionId = Id<CollectionMarker>;

impl<T> Id<T> {
    /// Wraps an identifier as reported by the content source, without validation.
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            value: raw.into(),
            _phantom: PhantomData,
        }
    }

    /// Parses user input (dashed UUID, compact hex, or a Notion URL) into a
    /// validated, compact ID.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let cleaned = input.trim().trim_end_matches('/');

        if cleaned.is_empty() {
            return Err(ValidationError::EmptyField("id"));
        }

        // 1. UUID format with dashes
        if let Ok(uuid) = Uuid::parse_str(cleaned) {
            return Ok(Self::new(uuid.as_simple().to_string()));
        }

        // 2. Direct 32-char hex ID
        if cleaned.len() == 32 && cleaned.chars().all(|c| c.is_ascii_hexdigit()) {
            return Ok(Self::new(cleaned.to_lowercase()));
        }

        // 3. Extract from URLs
        if cleaned.contains("notion") {
            return Self::extract_from_url(cleaned);
        }

        Err(ValidationError::InvalidId(format!(
            "Could not parse Notion ID from: {}",
            input
        )))
    }

    /// Extracts ID from Notion URLs.
    fn extract_from_url(url: &str) -> Result<Self, ValidationError> {
        lazy_static::lazy_static! {
            static ref ID_REGEX: Regex = Regex::new(
                r"(?:[/-])([a-fA-F0-9]{32}|[a-fA-F0-9]{8}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{12})(?:[/?#]|$)"
            ).expect("Failed to compile Notion ID regex - this is a bug in the code");
        }

        if let Some(captures) = ID_REGEX.captures(url) {
            if let Some(id_match) = captures.get(1) {
                return Ok(Self::new(id_match.as_str().replace('-', "").to_lowercase()));
            }
        }

        Err(ValidationError::InvalidId(format!(
            "No valid ID found in URL: {}",
            url
        )))
    }

    /// Get the ID as a string reference
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// The format-independent form used for comparisons and URLs.
    pub fn normalized(&self) -> String {
        normalize_id(&self.value)
    }

    /// Whether two IDs name the same object regardless of dashes or case.
    pub fn same_as<U>(&self, other: &Id<U>) -> bool {
        self.normalized() == other.normalized()
    }

    /// Get the ID with dashes for API calls
    pub fn to_dashed(&self) -> String {
        let compact = self.normalized();
        if compact.len() == 32 {
            format!(
                "{}-{}-{}-{}-{}",
                &compact[0..8],
                &compact[8..12],
                &compact[12..16],
                &compact[16..20],
                &compact[20..32]
            )
        } else {
            self.value.clone()
        }
    }
}

/// Strips dashes and lowercases, so `550e8400-e29b-...` and `550E8400E29B...`
/// compare equal.
pub fn normalize_id(raw: &str) -> String {
    raw.trim().replace('-', "").to_lowercase()
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> From<&str> for Id<T> {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl<T> From<String> for Id<T> {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.value.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::new(value))
    }
}
