//! Property-based tests for client-side grouping.
//!
//! For arbitrary collections, tags and bookmarks these check that grouping
//! by collection places each bookmark at most once, under the collection it
//! references, and that grouping by tag places it under every tag it carries.

use proptest::prelude::*;
use scrollwise::managers::aggregation::{group_by_collection, group_by_tag};
use scrollwise::types::bookmark::{Bookmark, Collection, Tag};

// --- Strategies ---

fn arb_name() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

/// Entities with ids 1..=n; names are arbitrary and may repeat.
fn arb_collections() -> impl Strategy<Value = Vec<Collection>> {
    prop::collection::vec(arb_name(), 0..5).prop_map(|names| {
        names
            .into_iter()
            .enumerate()
            .map(|(i, name)| Collection { id: i as i64 + 1, name })
            .collect()
    })
}

fn arb_tags() -> impl Strategy<Value = Vec<Tag>> {
    prop::collection::vec(arb_name(), 0..5).prop_map(|names| {
        names
            .into_iter()
            .enumerate()
            .map(|(i, name)| Tag { id: i as i64 + 1, name })
            .collect()
    })
}

/// Bookmarks that may reference ids outside the generated entity lists.
fn arb_bookmarks() -> impl Strategy<Value = Vec<Bookmark>> {
    prop::collection::vec(
        (
            arb_name(),
            prop::option::of(0i64..7),
            prop::collection::vec(0i64..7, 0..4),
        ),
        0..12,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (text, collection_id, tag_ids))| Bookmark {
                id: i as i64 + 1,
                text,
                title: None,
                collection_id,
                collection_name: None,
                tags: tag_ids
                    .into_iter()
                    .map(|id| Tag { id, name: format!("t{}", id) })
                    .collect(),
                created_at: String::new(),
            })
            .collect()
    })
}

proptest! {
    /// Every collection yields exactly one group, in input order.
    #[test]
    fn collection_groups_follow_collections(
        collections in arb_collections(),
        bookmarks in arb_bookmarks(),
    ) {
        let groups = group_by_collection(&collections, &bookmarks);

        let group_ids: Vec<i64> = groups.iter().map(|g| g.id).collect();
        let collection_ids: Vec<i64> = collections.iter().map(|c| c.id).collect();
        prop_assert_eq!(group_ids, collection_ids);
    }

    /// A bookmark appears in at most one collection group, and only in the
    /// one it references.
    #[test]
    fn bookmark_lands_in_at_most_one_collection(
        collections in arb_collections(),
        bookmarks in arb_bookmarks(),
    ) {
        let groups = group_by_collection(&collections, &bookmarks);

        for bookmark in &bookmarks {
            let homes: Vec<i64> = groups
                .iter()
                .filter(|g| g.bookmarks.iter().any(|b| b.id == bookmark.id))
                .map(|g| g.id)
                .collect();
            let known = bookmark
                .collection_id
                .filter(|cid| collections.iter().any(|c| c.id == *cid));
            prop_assert_eq!(homes, known.into_iter().collect::<Vec<_>>());
        }
    }

    /// Grouping preserves fetch order inside each group.
    #[test]
    fn collection_groups_keep_fetch_order(
        collections in arb_collections(),
        bookmarks in arb_bookmarks(),
    ) {
        for group in group_by_collection(&collections, &bookmarks) {
            let ids: Vec<i64> = group.bookmarks.iter().map(|b| b.id).collect();
            let mut sorted = ids.clone();
            sorted.sort_unstable();
            prop_assert_eq!(ids, sorted);
        }
    }

    /// A bookmark appears once under every known tag it carries and nowhere else.
    #[test]
    fn bookmark_lands_under_every_tag(
        tags in arb_tags(),
        bookmarks in arb_bookmarks(),
    ) {
        let groups = group_by_tag(&tags, &bookmarks);
        prop_assert_eq!(groups.len(), tags.len());

        for group in &groups {
            for bookmark in &bookmarks {
                let count = group.bookmarks.iter().filter(|b| b.id == bookmark.id).count();
                let expected = usize::from(bookmark.has_tag(group.id));
                prop_assert_eq!(count, expected);
            }
        }
    }
}
