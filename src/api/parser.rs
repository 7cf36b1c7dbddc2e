// src/api/parser.rs
//! Turns raw API responses into domain values or typed fetch errors.

use super::client::ApiResponse;
use super::responses::{LoadPageChunkResponse, NotionErrorBody, QueryCollectionResponse};
use crate::algebras::FetchError;
use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use reqwest::StatusCode;

/// Parse any Notion web API response.
pub fn parse_api_response<T>(result: ApiResponse<String>) -> Result<T, FetchError>
where
    T: serde::de::DeserializeOwned,
{
    if result.status.is_success() {
        parse_body(&result.data, &result.url)
    } else {
        Err(classify_error_response(&result))
    }
}

pub fn parse_page_chunk_response(
    result: ApiResponse<String>,
) -> Result<LoadPageChunkResponse, FetchError> {
    parse_api_response(result)
}

pub fn parse_query_collection_response(
    result: ApiResponse<String>,
) -> Result<QueryCollectionResponse, FetchError> {
    parse_api_response(result)
}

fn parse_body<T>(body: &str, url: &str) -> Result<T, FetchError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(body).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", url, e);
        FetchError::MalformedResponse {
            reason: format!("{} (body: {})", e, preview(body)),
        }
    })
}

/// Maps a non-success response onto the fetch error vocabulary.
fn classify_error_response(result: &ApiResponse<String>) -> FetchError {
    let body = serde_json::from_str::<NotionErrorBody>(&result.data).ok();
    let (name, message) = match body {
        Some(body) => (body.name, body.message),
        None => (String::new(), preview(&result.data)),
    };

    match result.status {
        StatusCode::NOT_FOUND => FetchError::NotFound {
            id: if message.is_empty() {
                result.url.clone()
            } else {
                message
            },
        },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => FetchError::Unauthorized {
            reason: if message.is_empty() { name } else { message },
        },
        StatusCode::TOO_MANY_REQUESTS => FetchError::RateLimited {
            retry_after_seconds: result.retry_after_seconds,
        },
        status => FetchError::ApiError {
            status: status.as_u16(),
            name,
            message,
        },
    }
}

fn preview(body: &str) -> String {
    if body.chars().count() > ERROR_BODY_PREVIEW_LENGTH {
        let cut: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
        format!("{}...", cut)
    } else {
        body.to_string()
    }
}
