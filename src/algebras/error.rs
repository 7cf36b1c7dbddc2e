//! Error types for algebra traits.
//!
//! These errors are used by the algebra layer and are intentionally
//! domain-specific rather than generic. Each error tells a story about
//! what went wrong in the algebra's operation.

use std::fmt;

/// Error that can occur while loading a page from the content source.
///
/// This is the error type for [`PageSource`](super::PageSource) operations.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The requested page was not found (404).
    NotFound { id: String },

    /// The session token is missing, invalid or lacks access to the page.
    Unauthorized { reason: String },

    /// The API rate limit was exceeded.
    RateLimited { retry_after_seconds: Option<u64> },

    /// Notion returned an error status.
    ApiError {
        status: u16,
        name: String,
        message: String,
    },

    /// Network or transport error.
    Transport { message: String },

    /// The response could not be parsed.
    MalformedResponse { reason: String },

    /// An operation timed out.
    Timeout { operation: String },

    /// Some other error occurred.
    Other { message: String },
}

impl FetchError {
    /// Returns `true` if this error is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. }
                | Self::Timeout { .. }
                | Self::Transport { .. }
                | Self::ApiError {
                    status: 408 | 429 | 500..=599,
                    ..
                }
        )
    }

    /// Returns `true` if this error means the page doesn't exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { id } => write!(f, "Page not found: {}", id),
            Self::Unauthorized { reason } => write!(f, "Unauthorized: {}", reason),
            Self::RateLimited {
                retry_after_seconds,
            } => {
                write!(f, "Rate limited")?;
                if let Some(seconds) = retry_after_seconds {
                    write!(f, " (retry after {}s)", seconds)?;
                }
                Ok(())
            }
            Self::ApiError {
                status,
                name,
                message,
            } => write!(f, "Notion API error {} [{}]: {}", status, name, message),
            Self::Transport { message } => write!(f, "Transport error: {}", message),
            Self::MalformedResponse { reason } => write!(f, "Malformed response: {}", reason),
            Self::Timeout { operation } => write!(f, "Timeout during: {}", operation),
            Self::Other { message } => write!(f, "Error: {}", message),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                operation: err
                    .url()
                    .map(|u| u.to_string())
                    .unwrap_or_else(|| "request".to_string()),
            }
        } else if err.is_decode() {
            Self::MalformedResponse {
                reason: err.to_string(),
            }
        } else {
            Self::Transport {
                message: err.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedResponse {
            reason: err.to_string(),
        }
    }
}

/// Error that can occur during visit tracking operations.
///
/// This is the error type for [`VisitTracker`](super::VisitTracker) operations.
/// Visit tracking is a simple operation, so errors are minimal.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackError {
    /// The tracker is full and cannot accept more visits.
    CapacityExceeded { max: usize },

    /// An operation failed for some other reason.
    Other { message: String },
}

impl fmt::Display for TrackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded { max } => {
                write!(f, "Visit tracker capacity exceeded (max: {})", max)
            }
            Self::Other { message } => write!(f, "Track error: {}", message),
        }
    }
}

impl std::error::Error for TrackError {}
