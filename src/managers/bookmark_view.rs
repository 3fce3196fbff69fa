//! Flat bookmarks screen.

use std::sync::Arc;

use tracing::info;

use crate::api::ApiClientTrait;
use crate::managers::aggregation;
use crate::services::summary_cache::SummaryCache;
use crate::types::bookmark::Bookmark;
use crate::types::errors::{ApiError, SummaryError};
use crate::types::route::Route;
use crate::types::summary::SummaryState;

pub const EMPTY_PLACEHOLDER: &str = "No bookmarks yet";

pub struct BookmarksView {
    bookmarks: Vec<Bookmark>,
    query: String,
    summaries: Arc<SummaryCache>,
}

impl BookmarksView {
    pub async fn load(api: &dyn ApiClientTrait, summaries: Arc<SummaryCache>) -> Result<Self, ApiError> {
        let bookmarks = api.list_bookmarks().await?;
        info!(count = bookmarks.len(), "bookmarks view loaded");
        Ok(Self::from_bookmarks(bookmarks, summaries))
    }

    pub fn from_bookmarks(bookmarks: Vec<Bookmark>, summaries: Arc<SummaryCache>) -> Self {
        Self {
            bookmarks,
            query: String::new(),
            summaries,
        }
    }

    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn visible(&self) -> Vec<Bookmark> {
        aggregation::filter_bookmarks(&self.bookmarks, &self.query)
    }

    pub fn placeholder(&self) -> Option<&'static str> {
        if self.bookmarks.is_empty() {
            Some(EMPTY_PLACEHOLDER)
        } else if self.visible().is_empty() {
            Some(crate::managers::grouped_view::NO_MATCHES_PLACEHOLDER)
        } else {
            None
        }
    }

    /// Screens reachable from a bookmark card: its collection, then each tag.
    pub fn routes_for(bookmark: &Bookmark) -> Vec<Route> {
        let mut routes = Vec::with_capacity(bookmark.tags.len() + 1);
        if let Some(cid) = bookmark.collection_id {
            routes.push(Route::Collections(Some(cid)));
        }
        routes.extend(bookmark.tags.iter().map(|t| Route::Tags(Some(t.id))));
        routes
    }

    pub fn summary_state(&self, bookmark_id: i64) -> SummaryState {
        self.summaries.state(bookmark_id)
    }

    pub async fn request_summary(&self, bookmark_id: i64) -> Result<String, SummaryError> {
        self.summaries.request(bookmark_id).await
    }
}
