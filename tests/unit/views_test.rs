//! Unit tests for the bookmarks, collections and tags screens.
//!
//! Covers loading (client-side grouping and route-narrowed loads), the
//! placeholder rules, query filtering and the summary state shared between
//! screens.

#[path = "../common/fake_api.rs"]
mod fake_api;

use std::sync::Arc;

use fake_api::{bookmark, collection, in_collection, tag, titled, with_tags, FakeApi};
use rstest::rstest;
use scrollwise::managers::bookmark_view::{BookmarksView, EMPTY_PLACEHOLDER};
use scrollwise::managers::grouped_view::{GroupKind, GroupedView, NO_MATCHES_PLACEHOLDER};
use scrollwise::services::summary_cache::SummaryCache;
use scrollwise::types::route::Route;
use scrollwise::types::summary::SummaryState;

/// A small library: two collections, two tags, four bookmarks.
fn library() -> FakeApi {
    let reading = collection(1, "Reading");
    let work = collection(2, "Work");
    let news = tag(5, "news");
    let rust = tag(6, "rust");
    FakeApi::new().with_state(|s| {
        s.collections = vec![reading.clone(), work.clone()];
        s.tags = vec![news.clone(), rust.clone()];
        s.bookmarks = vec![
            with_tags(bookmark(1, "hello"), &[news.clone()]),
            titled(
                in_collection(with_tags(bookmark(2, "async book"), &[rust.clone(), news.clone()]), &reading),
                "Tokio",
            ),
            in_collection(bookmark(3, "quarterly plan"), &work),
            in_collection(bookmark(4, "weekend novel"), &reading),
        ];
    })
}

fn setup(api: FakeApi) -> (Arc<FakeApi>, Arc<SummaryCache>) {
    let api = Arc::new(api);
    let summaries = Arc::new(SummaryCache::new(api.clone()));
    (api, summaries)
}

fn ids(view: &[scrollwise::managers::aggregation::BookmarkGroup]) -> Vec<(String, Vec<i64>)> {
    view.iter()
        .map(|g| (g.name.clone(), g.bookmarks.iter().map(|b| b.id).collect()))
        .collect()
}

// ─── Collections ───

#[tokio::test]
async fn test_empty_collections_show_placeholder() {
    let (api, summaries) = setup(FakeApi::new());

    let view = GroupedView::collections(api.as_ref(), summaries, None).await.unwrap();

    assert!(view.groups().is_empty());
    assert!(view.visible().is_empty());
    assert_eq!(view.placeholder(), Some("No collections yet"));
}

#[tokio::test]
async fn test_collections_group_client_side_without_route() {
    let (api, summaries) = setup(library());

    let view = GroupedView::collections(api.as_ref(), summaries, None).await.unwrap();

    assert_eq!(view.kind(), GroupKind::Collections);
    assert_eq!(
        ids(view.groups()),
        vec![("Reading".to_string(), vec![2, 4]), ("Work".to_string(), vec![3])]
    );
    assert_eq!(view.placeholder(), None);
    assert_eq!(api.calls("list_bookmarks"), 1);
    assert_eq!(api.calls("bookmarks_by_collection"), 0);
}

#[tokio::test]
async fn test_collection_route_uses_server_endpoint() {
    let (api, summaries) = setup(library());

    let view = GroupedView::collections(api.as_ref(), summaries, Some(2)).await.unwrap();

    assert_eq!(view.route_id(), Some(2));
    assert_eq!(ids(view.groups()), vec![("Work".to_string(), vec![3])]);
    assert_eq!(api.calls("bookmarks_by_collection"), 1);
    assert_eq!(api.calls("list_bookmarks"), 0);
}

#[tokio::test]
async fn test_unknown_collection_route_yields_empty_view() {
    let (api, summaries) = setup(library());

    let view = GroupedView::collections(api.as_ref(), summaries, Some(99)).await.unwrap();

    assert!(view.groups().is_empty());
    assert_eq!(view.placeholder(), Some("No collections yet"));
}

// ─── Tags ───

#[tokio::test]
async fn test_bookmark_without_collection_appears_under_its_tag() {
    let (api, summaries) = setup(library());

    let mut tags = GroupedView::tags(api.as_ref(), summaries.clone(), None).await.unwrap();
    tags.set_query("news");
    let visible = tags.visible();
    let news = visible.iter().find(|g| g.name == "news").unwrap();
    assert!(news.bookmarks.iter().any(|b| b.id == 1));

    let collections = GroupedView::collections(api.as_ref(), summaries, None).await.unwrap();
    assert!(collections
        .groups()
        .iter()
        .all(|g| g.bookmarks.iter().all(|b| b.id != 1)));
}

#[tokio::test]
async fn test_bookmark_appears_under_every_tag() {
    let (api, summaries) = setup(library());

    let view = GroupedView::tags(api.as_ref(), summaries, None).await.unwrap();

    assert_eq!(
        ids(view.groups()),
        vec![("news".to_string(), vec![1, 2]), ("rust".to_string(), vec![2])]
    );
}

#[tokio::test]
async fn test_tag_route_uses_server_endpoint() {
    let (api, summaries) = setup(library());

    let view = GroupedView::tags(api.as_ref(), summaries, Some(6)).await.unwrap();

    assert_eq!(ids(view.groups()), vec![("rust".to_string(), vec![2])]);
    assert_eq!(api.calls("bookmarks_by_tag"), 1);
    assert_eq!(api.calls("list_bookmarks"), 0);
}

#[tokio::test]
async fn test_empty_tags_show_placeholder() {
    let (api, summaries) = setup(FakeApi::new());

    let view = GroupedView::tags(api.as_ref(), summaries, None).await.unwrap();

    assert_eq!(view.placeholder(), Some("No tags yet"));
}

// ─── Filtering ───

#[rstest]
#[case::group_name_keeps_whole_group("read", vec![("Reading", vec![2, 4])])]
#[case::bookmark_title("tokio", vec![("Reading", vec![2])])]
#[case::bookmark_text_case_insensitive("QUARTERLY", vec![("Work", vec![3])])]
#[case::tag_name("rust", vec![("Reading", vec![2])])]
#[case::blank_query_is_identity("   ", vec![("Reading", vec![2, 4]), ("Work", vec![3])])]
#[tokio::test]
async fn test_collections_query(#[case] query: &str, #[case] expected: Vec<(&str, Vec<i64>)>) {
    let (api, summaries) = setup(library());
    let mut view = GroupedView::collections(api.as_ref(), summaries, None).await.unwrap();

    view.set_query(query);

    let expected: Vec<(String, Vec<i64>)> =
        expected.into_iter().map(|(n, b)| (n.to_string(), b)).collect();
    assert_eq!(ids(&view.visible()), expected);
}

#[tokio::test]
async fn test_tags_query_matches_collection_name() {
    let (api, summaries) = setup(library());
    let mut view = GroupedView::tags(api.as_ref(), summaries, None).await.unwrap();

    view.set_query("reading");

    assert_eq!(
        ids(&view.visible()),
        vec![("news".to_string(), vec![2]), ("rust".to_string(), vec![2])]
    );
}

#[tokio::test]
async fn test_query_without_matches_shows_no_matches() {
    let (api, summaries) = setup(library());
    let mut view = GroupedView::collections(api.as_ref(), summaries, None).await.unwrap();

    view.set_query("zzz");

    assert!(view.visible().is_empty());
    assert_eq!(view.placeholder(), Some(NO_MATCHES_PLACEHOLDER));
    // The canonical grouping is untouched.
    assert_eq!(view.groups().len(), 2);
    view.set_query("");
    assert_eq!(view.placeholder(), None);
}

// ─── Bookmarks list ───

#[tokio::test]
async fn test_bookmarks_view_lists_and_filters() {
    let (api, summaries) = setup(library());
    let mut view = BookmarksView::load(api.as_ref(), summaries).await.unwrap();

    assert_eq!(view.bookmarks().len(), 4);
    view.set_query("work");
    let visible: Vec<i64> = view.visible().iter().map(|b| b.id).collect();
    assert_eq!(visible, vec![3]);
    assert_eq!(view.query(), "work");
}

#[tokio::test]
async fn test_empty_bookmarks_view_placeholder() {
    let (api, summaries) = setup(FakeApi::new());

    let view = BookmarksView::load(api.as_ref(), summaries).await.unwrap();

    assert_eq!(view.placeholder(), Some(EMPTY_PLACEHOLDER));
}

#[test]
fn test_routes_for_lists_collection_then_tags() {
    let b = in_collection(
        with_tags(bookmark(2, "x"), &[tag(6, "rust"), tag(5, "news")]),
        &collection(1, "Reading"),
    );

    assert_eq!(
        BookmarksView::routes_for(&b),
        vec![Route::Collections(Some(1)), Route::Tags(Some(6)), Route::Tags(Some(5))]
    );
    assert!(BookmarksView::routes_for(&bookmark(3, "bare")).is_empty());
}

// ─── Shared summaries ───

#[tokio::test]
async fn test_summary_fetched_on_one_screen_shows_on_another() {
    let (api, summaries) = setup(library());
    let bookmarks = BookmarksView::load(api.as_ref(), summaries.clone()).await.unwrap();
    let tags = GroupedView::tags(api.as_ref(), summaries, None).await.unwrap();

    assert_eq!(tags.summary_state(2), SummaryState::Absent);
    bookmarks.request_summary(2).await.unwrap();

    assert_eq!(tags.summary_state(2), SummaryState::Present("summary of 2".to_string()));
    assert_eq!(tags.request_summary(2).await.unwrap(), "summary of 2");
    assert_eq!(api.calls("get_bookmark_summary"), 1);
}

#[tokio::test]
async fn test_load_failure_propagates() {
    let (api, summaries) = setup(FakeApi::new().with_state(|s| {
        s.fail_list = Some(scrollwise::types::errors::ApiError::Network("down".to_string()));
    }));

    assert!(BookmarksView::load(api.as_ref(), summaries.clone()).await.is_err());
    assert!(GroupedView::tags(api.as_ref(), summaries, None).await.is_err());
}
