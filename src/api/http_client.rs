//! HTTP implementation of the bookmarks API, backed by `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use super::ApiClientTrait;
use crate::types::bookmark::{Bookmark, BookmarkUpdate, Collection, NewBookmark, Tag};
use crate::types::errors::ApiError;
use crate::types::settings::ClientSettings;
use crate::types::submission::{NewSubmission, Submission};
use crate::types::summary::{SavedSummary, SummarizeRequest, SummaryResponse};

/// Stateless JSON client for the bookmarks API.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    client: Client,
    base_url: String,
}

impl HttpApiClient {
    /// Creates a client for `base_url` with the given per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self, ApiError> {
        Self::new(
            &settings.api_base_url,
            Duration::from_secs(settings.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!(method = "GET", path, "api request");
        self.send(self.client.get(self.url(path)), path).await
    }

    async fn post<B: serde::Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        debug!(method = "POST", path, "api request");
        self.send(self.client.post(self.url(path)).json(body), path).await
    }

    async fn put<B: serde::Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        debug!(method = "PUT", path, "api request");
        self.send(self.client.put(self.url(path)).json(body), path).await
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder, path: &str) -> Result<T, ApiError> {
        let resp = req
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Server {
                status: status.as_u16(),
                message: server_message(status, &body),
            });
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Picks the most useful message out of an error response body.
fn server_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(msg) = value.get("error").and_then(|v| v.as_str()) {
            return msg.to_string();
        }
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    status.canonical_reason().unwrap_or("").to_string()
}

#[async_trait]
impl ApiClientTrait for HttpApiClient {
    async fn create_bookmark(&self, bookmark: &NewBookmark) -> Result<Bookmark, ApiError> {
        self.post("/api/bookmarks", bookmark).await
    }

    async fn list_bookmarks(&self) -> Result<Vec<Bookmark>, ApiError> {
        self.get("/api/bookmarks").await
    }

    async fn get_bookmark(&self, id: i64) -> Result<Bookmark, ApiError> {
        self.get(&format!("/api/bookmarks/{}", id)).await
    }

    async fn update_bookmark(&self, id: i64, update: &BookmarkUpdate) -> Result<Bookmark, ApiError> {
        self.put(&format!("/api/bookmarks/{}", id), update).await
    }

    async fn list_collections(&self) -> Result<Vec<Collection>, ApiError> {
        self.get("/api/collections").await
    }

    async fn create_collection(&self, name: &str) -> Result<Collection, ApiError> {
        self.post("/api/collections", &json!({ "name": name })).await
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, ApiError> {
        self.get("/api/tags").await
    }

    async fn create_tag(&self, name: &str) -> Result<Tag, ApiError> {
        self.post("/api/tags", &json!({ "name": name })).await
    }

    async fn bookmarks_by_tag(&self, tag_id: i64) -> Result<Vec<Bookmark>, ApiError> {
        self.get(&format!("/api/tags/{}/bookmarks", tag_id)).await
    }

    async fn bookmarks_by_collection(&self, collection_id: i64) -> Result<Vec<Bookmark>, ApiError> {
        self.get(&format!("/api/collections/{}/bookmarks", collection_id))
            .await
    }

    async fn get_bookmark_summary(&self, bookmark_id: i64) -> Result<SummaryResponse, ApiError> {
        self.get(&format!("/api/bookmarks/{}/summary", bookmark_id))
            .await
    }

    async fn save_bookmark_summary(&self, bookmark_id: i64) -> Result<SavedSummary, ApiError> {
        self.post(&format!("/api/bookmarks/{}/summary", bookmark_id), &json!({}))
            .await
    }

    async fn summarize_text(&self, text: &str) -> Result<SummaryResponse, ApiError> {
        let body = SummarizeRequest {
            text: text.to_string(),
        };
        self.post("/api/summarize", &body).await
    }

    async fn create_submission(&self, text: &str) -> Result<Submission, ApiError> {
        let body = NewSubmission {
            text: text.to_string(),
        };
        self.post("/api/submissions", &body).await
    }

    async fn list_submissions(&self) -> Result<Vec<Submission>, ApiError> {
        self.get("/api/submissions").await
    }

    async fn get_submission(&self, id: i64) -> Result<Submission, ApiError> {
        self.get(&format!("/api/submissions/{}", id)).await
    }
}
