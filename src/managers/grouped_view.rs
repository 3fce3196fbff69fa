//! Collections and tags screens.
//!
//! Both screens show bookmarks grouped under a named entity. The view keeps
//! the canonical grouping as loaded and derives the filtered projection on
//! every read, so there is never a second list to keep in sync.

use std::sync::Arc;

use tracing::info;

use crate::api::ApiClientTrait;
use crate::managers::aggregation::{self, BookmarkGroup, FilterScope};
use crate::services::summary_cache::SummaryCache;
use crate::types::errors::{ApiError, SummaryError};
use crate::types::summary::SummaryState;

/// Which entity the groups are keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Collections,
    Tags,
}

impl GroupKind {
    fn scope(self) -> FilterScope {
        match self {
            GroupKind::Collections => FilterScope::Collections,
            GroupKind::Tags => FilterScope::Tags,
        }
    }

    pub fn empty_placeholder(self) -> &'static str {
        match self {
            GroupKind::Collections => "No collections yet",
            GroupKind::Tags => "No tags yet",
        }
    }
}

pub const NO_MATCHES_PLACEHOLDER: &str = "No matches";

pub struct GroupedView {
    kind: GroupKind,
    route_id: Option<i64>,
    groups: Vec<BookmarkGroup>,
    query: String,
    summaries: Arc<SummaryCache>,
}

impl GroupedView {
    /// Loads the collections screen.
    ///
    /// With a route id only that collection's bookmarks are fetched; an
    /// unknown id yields an empty view.
    pub async fn collections(
        api: &dyn ApiClientTrait,
        summaries: Arc<SummaryCache>,
        route_id: Option<i64>,
    ) -> Result<Self, ApiError> {
        let collections = api.list_collections().await?;
        let groups = match route_id {
            Some(id) => {
                let bookmarks = api.bookmarks_by_collection(id).await?;
                collections
                    .into_iter()
                    .find(|c| c.id == id)
                    .map(|c| {
                        vec![BookmarkGroup {
                            id: c.id,
                            name: c.name,
                            bookmarks,
                        }]
                    })
                    .unwrap_or_default()
            }
            None => {
                let bookmarks = api.list_bookmarks().await?;
                aggregation::group_by_collection(&collections, &bookmarks)
            }
        };
        info!(groups = groups.len(), ?route_id, "collections view loaded");
        Ok(Self::from_groups(GroupKind::Collections, route_id, groups, summaries))
    }

    /// Loads the tags screen. Same narrowing rules as [`GroupedView::collections`].
    pub async fn tags(
        api: &dyn ApiClientTrait,
        summaries: Arc<SummaryCache>,
        route_id: Option<i64>,
    ) -> Result<Self, ApiError> {
        let tags = api.list_tags().await?;
        let groups = match route_id {
            Some(id) => {
                let bookmarks = api.bookmarks_by_tag(id).await?;
                tags.into_iter()
                    .find(|t| t.id == id)
                    .map(|t| {
                        vec![BookmarkGroup {
                            id: t.id,
                            name: t.name,
                            bookmarks,
                        }]
                    })
                    .unwrap_or_default()
            }
            None => {
                let bookmarks = api.list_bookmarks().await?;
                aggregation::group_by_tag(&tags, &bookmarks)
            }
        };
        info!(groups = groups.len(), ?route_id, "tags view loaded");
        Ok(Self::from_groups(GroupKind::Tags, route_id, groups, summaries))
    }

    pub fn from_groups(
        kind: GroupKind,
        route_id: Option<i64>,
        groups: Vec<BookmarkGroup>,
        summaries: Arc<SummaryCache>,
    ) -> Self {
        Self {
            kind,
            route_id,
            groups,
            query: String::new(),
            summaries,
        }
    }

    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    pub fn route_id(&self) -> Option<i64> {
        self.route_id
    }

    /// The canonical grouping, unfiltered.
    pub fn groups(&self) -> &[BookmarkGroup] {
        &self.groups
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Groups after applying the current query.
    pub fn visible(&self) -> Vec<BookmarkGroup> {
        aggregation::filter_groups(&self.groups, &self.query, self.kind.scope())
    }

    /// Text to show instead of cards, if nothing is visible.
    pub fn placeholder(&self) -> Option<&'static str> {
        if self.groups.is_empty() {
            Some(self.kind.empty_placeholder())
        } else if self.visible().is_empty() {
            Some(NO_MATCHES_PLACEHOLDER)
        } else {
            None
        }
    }

    pub fn summary_state(&self, bookmark_id: i64) -> SummaryState {
        self.summaries.state(bookmark_id)
    }

    pub async fn request_summary(&self, bookmark_id: i64) -> Result<String, SummaryError> {
        self.summaries.request(bookmark_id).await
    }
}
