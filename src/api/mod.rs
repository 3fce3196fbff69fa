//! Bookmarks API access.
//!
//! `ApiClientTrait` is the seam every view and workflow talks through; the
//! production implementation is [`HttpApiClient`], tests substitute in-memory
//! fakes.

pub mod http_client;

use async_trait::async_trait;

use crate::types::bookmark::{Bookmark, BookmarkUpdate, Collection, NewBookmark, Tag};
use crate::types::errors::ApiError;
use crate::types::submission::Submission;
use crate::types::summary::{SavedSummary, SummaryResponse};

pub use http_client::HttpApiClient;

/// One method per server operation. Every call is a single round trip with no retry.
#[async_trait]
pub trait ApiClientTrait: Send + Sync {
    async fn create_bookmark(&self, bookmark: &NewBookmark) -> Result<Bookmark, ApiError>;
    async fn list_bookmarks(&self) -> Result<Vec<Bookmark>, ApiError>;
    async fn get_bookmark(&self, id: i64) -> Result<Bookmark, ApiError>;
    async fn update_bookmark(&self, id: i64, update: &BookmarkUpdate) -> Result<Bookmark, ApiError>;

    async fn list_collections(&self) -> Result<Vec<Collection>, ApiError>;
    async fn create_collection(&self, name: &str) -> Result<Collection, ApiError>;
    async fn list_tags(&self) -> Result<Vec<Tag>, ApiError>;
    async fn create_tag(&self, name: &str) -> Result<Tag, ApiError>;
    async fn bookmarks_by_tag(&self, tag_id: i64) -> Result<Vec<Bookmark>, ApiError>;
    async fn bookmarks_by_collection(&self, collection_id: i64) -> Result<Vec<Bookmark>, ApiError>;

    /// Previously saved summary; `ApiError::NotFound` when none exists yet.
    async fn get_bookmark_summary(&self, bookmark_id: i64) -> Result<SummaryResponse, ApiError>;
    /// Generates a summary server-side and saves it against the bookmark.
    async fn save_bookmark_summary(&self, bookmark_id: i64) -> Result<SavedSummary, ApiError>;
    /// Stateless one-shot summary; nothing is persisted.
    async fn summarize_text(&self, text: &str) -> Result<SummaryResponse, ApiError>;

    async fn create_submission(&self, text: &str) -> Result<Submission, ApiError>;
    async fn list_submissions(&self) -> Result<Vec<Submission>, ApiError>;
    async fn get_submission(&self, id: i64) -> Result<Submission, ApiError>;
}
