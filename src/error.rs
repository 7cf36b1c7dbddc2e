// src/error.rs
//! Application error types with structured error handling.
//!
//! Error types form the vocabulary for failure modes in the system.
//! A site map is either built completely or not at all, so every variant
//! here aborts the build; expected irregularities (slug collisions, missing
//! properties) are logged instead and never become errors.

use crate::algebras::TrackError;
use std::sync::Arc;
use thiserror::Error;

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    /// A page was discovered by the crawl but its record never loaded.
    ///
    /// Publishing without it would silently drop a page, so the whole build fails.
    #[error("Error loading page \"{page_id}\"")]
    PageNotLoaded { page_id: String },

    #[error("Visit tracking failed: {0}")]
    Tracking(#[from] TrackError),

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output delivery failed: {}", failures.join(", "))]
    DeliveryFailed { failures: Vec<String> },

    #[error("Internal error: {message}")]
    InternalError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    ValidationError(#[from] crate::types::ValidationError),

    /// The failure of a build that several callers awaited together.
    #[error(transparent)]
    SharedBuild(Arc<AppError>),
}

// Allow converting from anyhow::Error, preserving error chain
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError {
            message: format!("{:#}", err),
            source: None,
        }
    }
}

impl From<std::fmt::Error> for AppError {
    fn from(err: std::fmt::Error) -> Self {
        AppError::InternalError {
            message: "Formatting error".to_string(),
            source: Some(Box::new(err)),
        }
    }
}

/// Result type alias for convenience
pub type Result<T, E = AppError> = std::result::Result<T, E>;
