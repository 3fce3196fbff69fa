//! Property-based tests for free-text filtering of groups and bookmarks.
//!
//! Filtering derives a projection of the canonical data and never invents
//! anything: the result is always a subset, a blank query is the identity,
//! and case never matters.

use proptest::prelude::*;
use scrollwise::managers::aggregation::{
    filter_bookmarks, filter_groups, BookmarkGroup, FilterScope,
};
use scrollwise::types::bookmark::{Bookmark, Tag};

// --- Strategies ---

fn arb_bookmark() -> impl Strategy<Value = Bookmark> {
    (
        1i64..50,
        "[a-zA-Z ]{0,16}",
        prop::option::of("[a-zA-Z]{1,8}"),
        prop::option::of("[a-zA-Z]{1,8}"),
        prop::collection::vec("[a-z]{1,6}", 0..3),
    )
        .prop_map(|(id, text, title, collection_name, tag_names)| Bookmark {
            id,
            text,
            title,
            collection_id: collection_name.as_ref().map(|_| 1),
            collection_name,
            tags: tag_names
                .into_iter()
                .enumerate()
                .map(|(i, name)| Tag { id: i as i64 + 1, name })
                .collect(),
            created_at: String::new(),
        })
}

fn arb_groups() -> impl Strategy<Value = Vec<BookmarkGroup>> {
    prop::collection::vec(
        ("[a-z]{1,8}", prop::collection::vec(arb_bookmark(), 0..5)),
        0..5,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (name, bookmarks))| BookmarkGroup {
                id: i as i64 + 1,
                name,
                bookmarks,
            })
            .collect()
    })
}

fn arb_scope() -> impl Strategy<Value = FilterScope> {
    prop_oneof![Just(FilterScope::Collections), Just(FilterScope::Tags)]
}

proptest! {
    /// A blank query returns the groups unchanged.
    #[test]
    fn blank_query_is_identity(groups in arb_groups(), blank in "[ \t]{0,3}", scope in arb_scope()) {
        prop_assert_eq!(filter_groups(&groups, &blank, scope), groups);
    }

    /// Every filtered group is one of the input groups, and its bookmarks
    /// are a subsequence of that group's bookmarks.
    #[test]
    fn filtered_groups_are_subsets(
        groups in arb_groups(),
        query in "[a-z]{1,3}",
        scope in arb_scope(),
    ) {
        let filtered = filter_groups(&groups, &query, scope);
        prop_assert!(filtered.len() <= groups.len());

        for group in &filtered {
            let original = groups.iter().find(|g| g.id == group.id);
            prop_assert!(original.is_some());
            let original = original.unwrap();
            prop_assert_eq!(&group.name, &original.name);
            prop_assert!(!group.bookmarks.is_empty() || original.name.contains(query.as_str()));

            let mut remaining = original.bookmarks.iter();
            for b in &group.bookmarks {
                prop_assert!(remaining.any(|o| o == b), "bookmark {} out of order or invented", b.id);
            }
        }
    }

    /// Matching ignores case in both the query and the data.
    #[test]
    fn filtering_ignores_case(groups in arb_groups(), query in "[a-z]{1,3}", scope in arb_scope()) {
        prop_assert_eq!(
            filter_groups(&groups, &query.to_uppercase(), scope),
            filter_groups(&groups, &query, scope)
        );
    }

    /// The tags screen matches at least everything the collections screen does.
    #[test]
    fn tag_scope_is_wider(groups in arb_groups(), query in "[a-z]{1,3}") {
        let narrow = filter_groups(&groups, &query, FilterScope::Collections);
        let wide = filter_groups(&groups, &query, FilterScope::Tags);

        for group in &narrow {
            let wider = wide.iter().find(|g| g.id == group.id);
            prop_assert!(wider.is_some());
            prop_assert!(wider.unwrap().bookmarks.len() >= group.bookmarks.len());
        }
    }

    /// Flat filtering keeps fetch order and never adds bookmarks.
    #[test]
    fn filtered_bookmarks_are_subsequence(
        bookmarks in prop::collection::vec(arb_bookmark(), 0..10),
        query in "[a-z]{0,3}",
    ) {
        let filtered = filter_bookmarks(&bookmarks, &query);
        let mut remaining = bookmarks.iter();
        for b in &filtered {
            prop_assert!(remaining.any(|o| o == b));
        }
        if query.is_empty() {
            prop_assert_eq!(filtered.len(), bookmarks.len());
        }
    }
}
