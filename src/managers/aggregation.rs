//! Client-side grouping and free-text filtering of bookmarks.
//!
//! Everything here is pure: inputs are borrowed flat lists as fetched from the
//! server, outputs are freshly derived groupings. Fetch order is preserved
//! throughout.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::bookmark::{Bookmark, Collection, Tag};

/// One collection or tag together with the bookmarks that reference it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmarkGroup {
    pub id: i64,
    pub name: String,
    pub bookmarks: Vec<Bookmark>,
}

/// Which screen a filter runs for. The tags screen also matches on the
/// bookmark's collection name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterScope {
    Collections,
    Tags,
}

/// Groups bookmarks under the collection they reference.
///
/// Every collection yields a group, empty or not. Bookmarks without a
/// collection, or pointing at a collection not in `collections`, land nowhere.
pub fn group_by_collection(collections: &[Collection], bookmarks: &[Bookmark]) -> Vec<BookmarkGroup> {
    let mut by_collection: HashMap<i64, Vec<Bookmark>> = HashMap::new();
    for bookmark in bookmarks {
        if let Some(cid) = bookmark.collection_id {
            by_collection.entry(cid).or_default().push(bookmark.clone());
        }
    }

    collections
        .iter()
        .map(|c| BookmarkGroup {
            id: c.id,
            name: c.name.clone(),
            bookmarks: by_collection.remove(&c.id).unwrap_or_default(),
        })
        .collect()
}

/// Groups bookmarks under every tag they carry.
pub fn group_by_tag(tags: &[Tag], bookmarks: &[Bookmark]) -> Vec<BookmarkGroup> {
    let mut by_tag: HashMap<i64, Vec<Bookmark>> = HashMap::new();
    for bookmark in bookmarks {
        let mut seen: Vec<i64> = Vec::with_capacity(bookmark.tags.len());
        for tag in &bookmark.tags {
            if seen.contains(&tag.id) {
                continue;
            }
            seen.push(tag.id);
            by_tag.entry(tag.id).or_default().push(bookmark.clone());
        }
    }

    tags.iter()
        .map(|t| BookmarkGroup {
            id: t.id,
            name: t.name.clone(),
            bookmarks: by_tag.remove(&t.id).unwrap_or_default(),
        })
        .collect()
}

/// Normalises a raw query: trimmed and lower-cased. `None` means "no filter".
pub fn normalize_query(query: &str) -> Option<String> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        None
    } else {
        Some(q)
    }
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Whether `bookmark` matches an already-normalised query.
pub fn bookmark_matches(bookmark: &Bookmark, needle: &str, include_collection: bool) -> bool {
    if bookmark.title.as_deref().is_some_and(|t| contains(t, needle)) {
        return true;
    }
    if contains(&bookmark.text, needle) {
        return true;
    }
    if bookmark.tags.iter().any(|t| contains(&t.name, needle)) {
        return true;
    }
    include_collection
        && bookmark
            .collection_name
            .as_deref()
            .is_some_and(|c| contains(c, needle))
}

/// Filters groups by a free-text query.
///
/// A group whose own name matches is kept whole. Any other group keeps only
/// its matching bookmarks and is dropped when none match. An empty query
/// returns the groups unchanged.
pub fn filter_groups(groups: &[BookmarkGroup], query: &str, scope: FilterScope) -> Vec<BookmarkGroup> {
    let Some(needle) = normalize_query(query) else {
        return groups.to_vec();
    };
    let include_collection = scope == FilterScope::Tags;

    groups
        .iter()
        .filter_map(|group| {
            if contains(&group.name, &needle) {
                return Some(group.clone());
            }
            let bookmarks: Vec<Bookmark> = group
                .bookmarks
                .iter()
                .filter(|b| bookmark_matches(b, &needle, include_collection))
                .cloned()
                .collect();
            if bookmarks.is_empty() {
                None
            } else {
                Some(BookmarkGroup {
                    id: group.id,
                    name: group.name.clone(),
                    bookmarks,
                })
            }
        })
        .collect()
}

/// Filters a flat bookmark list; collection names count as matchable text.
pub fn filter_bookmarks(bookmarks: &[Bookmark], query: &str) -> Vec<Bookmark> {
    match normalize_query(query) {
        None => bookmarks.to_vec(),
        Some(needle) => bookmarks
            .iter()
            .filter(|b| bookmark_matches(b, &needle, true))
            .cloned()
            .collect(),
    }
}
