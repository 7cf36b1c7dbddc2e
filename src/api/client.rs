// src/api/client.rs
//! HTTP page source over Notion's web API.
//!
//! This is the API the Notion web app uses: `loadPageChunk` returns the
//! record map of a page and `queryCollection` lists the rows of every
//! collection view embedded in it. Public workspaces need no credentials;
//! private ones need the `token_v2` session cookie.

use super::parser;
use super::responses::{Cursor, LoadPageChunkRequest, QueryCollectionRequest};
use crate::algebras::{FetchError, PageSource};
use crate::constants::{
    COLLECTION_QUERY_LIMIT, HTTP_REQUEST_TIMEOUT, NOTION_API_BASE_URL, PAGE_CHUNK_LIMIT,
};
use crate::error::AppError;
use crate::error_recovery::{retry_with_backoff, RetryPolicy};
use crate::model::{CollectionQueryResult, RecordMap};
use crate::types::{AuthToken, CollectionId, PageId, SpaceId};
use async_trait::async_trait;
use reqwest::{header, Client, Response, StatusCode};
use serde::Serialize;
use std::time::Duration;

/// Upper bound on `loadPageChunk` round-trips for one page.
const MAX_PAGE_CHUNKS: u32 = 20;

/// Raw response text plus the status it came with.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: StatusCode,
    pub url: String,
    pub retry_after_seconds: Option<u64>,
}

/// Connection settings for [`NotionHttpClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub api_base_url: String,
    pub auth_token: Option<AuthToken>,
    pub active_user: Option<String>,
    pub user_time_zone: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api_base_url: NOTION_API_BASE_URL.to_string(),
            auth_token: None,
            active_user: None,
            user_time_zone: "UTC".to_string(),
            timeout: HTTP_REQUEST_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }
}

/// A thin wrapper around a reqwest client for Notion web API requests.
#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
    api_base_url: String,
    user_time_zone: String,
    retry: RetryPolicy,
}

impl NotionHttpClient {
    pub fn new(options: ClientOptions) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(&options)?)
            .timeout(options.timeout)
            .build()?;
        Ok(Self {
            client,
            api_base_url: options.api_base_url.trim_end_matches('/').to_string(),
            user_time_zone: options.user_time_zone,
            retry: options.retry,
        })
    }

    /// Creates the default headers, including the session cookie when given.
    fn create_headers(options: &ClientOptions) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        if let Some(token) = &options.auth_token {
            let cookie = format!("token_v2={}", token.as_str());
            headers.insert(
                header::COOKIE,
                header::HeaderValue::from_str(&cookie).map_err(|e| {
                    AppError::MissingConfiguration(format!("Invalid auth token format: {}", e))
                })?,
            );
        }

        if let Some(user) = &options.active_user {
            headers.insert(
                "x-notion-active-user-header",
                header::HeaderValue::from_str(user).map_err(|e| {
                    AppError::MissingConfiguration(format!("Invalid active user: {}", e))
                })?,
            );
        }

        Ok(headers)
    }

    /// Makes a POST request with a JSON body and returns the raw response text.
    pub async fn post<T: Serialize>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> Result<ApiResponse<String>, FetchError> {
        let url = format!("{}/{}", self.api_base_url, endpoint);
        log::debug!("POST {}", url);

        let response = self.client.post(&url).json(body).send().await?;
        extract_response_text(response).await
    }

    /// Loads every chunk of a page's record map.
    pub async fn load_page_chunks(&self, page_id: &PageId) -> Result<RecordMap, FetchError> {
        let mut record_map = RecordMap::new();
        let mut cursor = Cursor::default();

        for chunk_number in 0..MAX_PAGE_CHUNKS {
            let request = LoadPageChunkRequest {
                page_id: page_id.to_dashed(),
                limit: PAGE_CHUNK_LIMIT,
                cursor: cursor.clone(),
                chunk_number,
                vertical_columns: false,
            };

            let response = retry_with_backoff(
                || async { parser::parse_page_chunk_response(self.post("loadPageChunk", &request).await?) },
                self.retry,
            )
            .await?;

            let has_more = response.has_more();
            record_map.merge(response.record_map);

            match response.cursor {
                Some(next) if has_more => cursor = next,
                _ => return Ok(record_map),
            }
        }

        log::warn!(
            "Page {} still had content after {} chunks; keeping what was loaded",
            page_id,
            MAX_PAGE_CHUNKS
        );
        Ok(record_map)
    }

    /// Lists the rows of one collection view.
    pub async fn query_collection(
        &self,
        collection_id: &CollectionId,
        view_id: &str,
    ) -> Result<(CollectionQueryResult, RecordMap), FetchError> {
        let request = QueryCollectionRequest::new(
            collection_id.as_str(),
            view_id,
            COLLECTION_QUERY_LIMIT,
            &self.user_time_zone,
        );

        let response = retry_with_backoff(
            || async {
                parser::parse_query_collection_response(
                    self.post("queryCollection", &request).await?,
                )
            },
            self.retry,
        )
        .await?;

        let results = response
            .result
            .reducer_results
            .collection_group_results
            .unwrap_or_default();
        Ok((results, response.record_map))
    }
}

#[async_trait]
impl PageSource for NotionHttpClient {
    async fn fetch_page(
        &self,
        page_id: &PageId,
        _space_id: Option<&SpaceId>,
    ) -> Result<RecordMap, FetchError> {
        let mut record_map = self.load_page_chunks(page_id).await?;

        if record_map.page_block(page_id).is_none() {
            return Err(FetchError::NotFound {
                id: page_id.as_str().to_string(),
            });
        }

        // Collection rows are pages too; the query results make them discoverable.
        for (collection_id, view_id) in record_map.collection_views() {
            match self.query_collection(&collection_id, &view_id).await {
                Ok((results, rows)) => {
                    record_map.merge(rows);
                    record_map
                        .collection_query
                        .entry(collection_id.as_str().to_string())
                        .or_default()
                        .insert(view_id, results);
                }
                Err(e) => {
                    log::warn!(
                        "Collection query failed for {} view {} on page {}: {}",
                        collection_id,
                        view_id,
                        page_id,
                        e
                    );
                }
            }
        }

        Ok(record_map)
    }
}

/// Reads the body of a response as text, whatever its status.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, FetchError> {
    let status = response.status();
    let url = response.url().to_string();
    let retry_after_seconds = response
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok());

    let data = response.text().await?;

    if !status.is_success() {
        log::debug!("{} returned {}", url, status);
    }

    Ok(ApiResponse {
        data,
        status,
        url,
        retry_after_seconds,
    })
}
