//! Plain-text rendering of the screens for terminal output.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDateTime};

use crate::managers::bookmark_view::BookmarksView;
use crate::managers::grouped_view::GroupedView;
use crate::managers::submission_view::SubmissionsView;
use crate::types::bookmark::Bookmark;
use crate::types::summary::SummaryState;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Formats a server timestamp as `YYYY-MM-DD HH:MM`. Unrecognised input is
/// returned unchanged.
pub fn format_timestamp(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return dt.format("%Y-%m-%d %H:%M").to_string();
        }
    }
    raw.to_string()
}

fn write_summary(out: &mut String, indent: &str, state: &SummaryState) {
    match state {
        SummaryState::Absent => {}
        SummaryState::Loading => {
            let _ = writeln!(out, "{}Loading summary...", indent);
        }
        SummaryState::Present(text) => {
            let _ = writeln!(out, "{}Summary: {}", indent, text);
        }
    }
}

/// One bookmark card. `show_collection` is off inside a collection group,
/// where the collection is already the heading.
pub fn render_bookmark(bookmark: &Bookmark, state: &SummaryState, indent: &str, show_collection: bool) -> String {
    let mut out = String::new();
    let inner = format!("{}  ", indent);
    let _ = writeln!(out, "{}[{}] {}", indent, bookmark.id, bookmark.display_title());
    let _ = writeln!(out, "{}{}", inner, bookmark.text);
    if show_collection {
        if let Some(name) = &bookmark.collection_name {
            let _ = writeln!(out, "{}Collection: {}", inner, name);
        }
    }
    if !bookmark.tags.is_empty() {
        let names: Vec<&str> = bookmark.tags.iter().map(|t| t.name.as_str()).collect();
        let _ = writeln!(out, "{}Tags: {}", inner, names.join(", "));
    }
    if !bookmark.created_at.is_empty() {
        let _ = writeln!(out, "{}{}", inner, format_timestamp(&bookmark.created_at));
    }
    write_summary(&mut out, &inner, state);
    out
}

pub fn render_grouped(view: &GroupedView) -> String {
    if let Some(placeholder) = view.placeholder() {
        return format!("{}\n", placeholder);
    }
    let show_collection = view.kind() == crate::managers::grouped_view::GroupKind::Tags;
    let mut out = String::new();
    for group in view.visible() {
        let _ = writeln!(out, "# {} ({})", group.name, group.bookmarks.len());
        for bookmark in &group.bookmarks {
            let state = view.summary_state(bookmark.id);
            out.push_str(&render_bookmark(bookmark, &state, "  ", show_collection));
        }
    }
    out
}

pub fn render_bookmarks(view: &BookmarksView) -> String {
    if let Some(placeholder) = view.placeholder() {
        return format!("{}\n", placeholder);
    }
    let mut out = String::new();
    for bookmark in view.visible() {
        let state = view.summary_state(bookmark.id);
        out.push_str(&render_bookmark(&bookmark, &state, "", true));
    }
    out
}

pub fn render_submissions(view: &SubmissionsView) -> String {
    if let Some(placeholder) = view.placeholder() {
        return format!("{}\n", placeholder);
    }
    let mut out = String::new();
    for submission in view.submissions() {
        let _ = writeln!(out, "[{}] {}", submission.id, submission.text);
        if !submission.created_at.is_empty() {
            let _ = writeln!(out, "  {}", format_timestamp(&submission.created_at));
        }
        write_summary(&mut out, "  ", &view.summary_state(submission.id));
    }
    out
}
