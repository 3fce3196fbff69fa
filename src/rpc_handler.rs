//! RPC method handler for the ScrollWise JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! The `handle_method` function dispatches JSON-RPC method calls to the
//! views and workflows owned by the `App` struct; `serve` runs the request
//! loop over any line-oriented input.

use std::sync::Arc;
use std::time::Instant;

use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinSet;
use tracing::{error, warn};

use crate::app::App;
use crate::managers::aggregation::BookmarkGroup;
use crate::managers::bookmark_view::BookmarksView;
use crate::managers::grouped_view::GroupedView;
use crate::types::bookmark::{Bookmark, BookmarkUpdate, NewBookmark};
use crate::types::summary::SummaryState;

fn param_i64(params: &Value, key: &str) -> Result<i64, String> {
    params
        .get(key)
        .and_then(|v| v.as_i64())
        .ok_or_else(|| format!("missing {}", key))
}

fn param_str<'a>(params: &'a Value, key: &str) -> Result<&'a str, String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", key))
}

fn opt_i64(params: &Value, key: &str) -> Option<i64> {
    params.get(key).and_then(|v| v.as_i64())
}

fn opt_str(params: &Value, key: &str) -> Option<String> {
    params.get(key).and_then(|v| v.as_str()).map(str::to_string)
}

fn opt_ids(params: &Value, key: &str) -> Result<Option<Vec<i64>>, String> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| v.as_i64().ok_or_else(|| format!("{} must be an array of integers", key)))
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(_) => Err(format!("{} must be an array of integers", key)),
    }
}

/// A bookmark with its summary state merged in under `"summary"`.
fn bookmark_json(bookmark: &Bookmark, state: &SummaryState) -> Value {
    let mut obj = match serde_json::to_value(bookmark) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };
    obj.insert("display_title".to_string(), json!(bookmark.display_title()));
    obj.insert("summary".to_string(), json!(state));
    Value::Object(obj)
}

fn groups_json(view: &GroupedView, groups: &[BookmarkGroup]) -> Value {
    let groups: Vec<Value> = groups
        .iter()
        .map(|g| {
            let bookmarks: Vec<Value> = g
                .bookmarks
                .iter()
                .map(|b| bookmark_json(b, &view.summary_state(b.id)))
                .collect();
            json!({"id": g.id, "name": g.name, "bookmarks": bookmarks})
        })
        .collect();
    json!({"groups": groups, "placeholder": view.placeholder()})
}

fn bookmarks_json(view: &BookmarksView) -> Value {
    let items: Vec<Value> = view
        .visible()
        .iter()
        .map(|b| {
            let mut v = bookmark_json(b, &view.summary_state(b.id));
            v["routes"] = json!(BookmarksView::routes_for(b));
            v
        })
        .collect();
    json!({"items": items, "placeholder": view.placeholder()})
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
/// Summary failures carry the alert text rather than the raw error.
pub async fn handle_method(app: &App, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Bookmarks ───
        "bookmark.add" => {
            let text = param_str(params, "text")?;
            let new = NewBookmark {
                text: text.to_string(),
                title: opt_str(params, "title"),
                collection_id: opt_i64(params, "collection_id"),
                tag_ids: opt_ids(params, "tag_ids")?,
            };
            let bm = app.add_bookmark(new).await.map_err(|e| e.to_string())?;
            serde_json::to_value(bm).map_err(|e| e.to_string())
        }
        "bookmark.get" => {
            let id = param_i64(params, "id")?;
            let bm = app.get_bookmark(id).await.map_err(|e| e.to_string())?;
            Ok(bookmark_json(&bm, &app.summaries().state(id)))
        }
        "bookmark.update" => {
            let id = param_i64(params, "id")?;
            let update = BookmarkUpdate {
                title: opt_str(params, "title"),
                collection_id: opt_i64(params, "collection_id"),
                tag_ids: opt_ids(params, "tag_ids")?,
            };
            let bm = app.update_bookmark(id, update).await.map_err(|e| e.to_string())?;
            serde_json::to_value(bm).map_err(|e| e.to_string())
        }
        "bookmark.list" => {
            let mut view = app.bookmarks_view().await.map_err(|e| e.to_string())?;
            if let Some(q) = opt_str(params, "query") {
                view.set_query(q);
            }
            Ok(bookmarks_json(&view))
        }

        // ─── Collections & tags ───
        "collection.add" => {
            let name = param_str(params, "name")?;
            let c = app.add_collection(name).await.map_err(|e| e.to_string())?;
            serde_json::to_value(c).map_err(|e| e.to_string())
        }
        "collection.view" => {
            let mut view = app
                .collections_view(opt_i64(params, "id"))
                .await
                .map_err(|e| e.to_string())?;
            if let Some(q) = opt_str(params, "query") {
                view.set_query(q);
            }
            Ok(groups_json(&view, &view.visible()))
        }
        "tag.add" => {
            let name = param_str(params, "name")?;
            let t = app.add_tag(name).await.map_err(|e| e.to_string())?;
            serde_json::to_value(t).map_err(|e| e.to_string())
        }
        "tag.view" => {
            let mut view = app
                .tags_view(opt_i64(params, "id"))
                .await
                .map_err(|e| e.to_string())?;
            if let Some(q) = opt_str(params, "query") {
                view.set_query(q);
            }
            Ok(groups_json(&view, &view.visible()))
        }

        // ─── Summaries ───
        "summary.get" => {
            let id = param_i64(params, "id")?;
            let summary = app
                .summaries()
                .request(id)
                .await
                .map_err(|e| e.user_message())?;
            Ok(json!({"id": id, "summary": summary}))
        }
        "summary.regenerate" => {
            let id = param_i64(params, "id")?;
            let summary = app
                .summaries()
                .regenerate(id)
                .await
                .map_err(|e| e.user_message())?;
            Ok(json!({"id": id, "summary": summary}))
        }
        "summary.state" => {
            let id = param_i64(params, "id")?;
            Ok(json!({"id": id, "summary": app.summaries().state(id)}))
        }

        // ─── Submissions ───
        "submission.add" => {
            let text = param_str(params, "text")?;
            let s = app.submit(text).await.map_err(|e| e.to_string())?;
            serde_json::to_value(s).map_err(|e| e.to_string())
        }
        "submission.list" => {
            let items = app.reload_submissions().await.map_err(|e| e.to_string())?;
            let placeholder = if items.is_empty() {
                Some(crate::managers::submission_view::EMPTY_PLACEHOLDER)
            } else {
                None
            };
            Ok(json!({"items": items, "placeholder": placeholder}))
        }
        "submission.summary" => {
            let id = param_i64(params, "id")?;
            let summary = app
                .toggle_submission_summary(id)
                .await
                .map_err(|e| e.user_message())?;
            Ok(json!({"id": id, "summary": summary}))
        }

        // ─── Settings ───
        "settings.get" => {
            let settings = app.stored_settings().map_err(|e| e.to_string())?;
            serde_json::to_value(settings).map_err(|e| e.to_string())
        }
        "settings.set" => {
            let key = param_str(params, "key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            app.set_setting(key, value).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "settings.reset" => {
            let settings = app.reset_settings().map_err(|e| e.to_string())?;
            serde_json::to_value(settings).map_err(|e| e.to_string())
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}

/// Simple rate limiter: max requests per second.
pub struct RateLimiter {
    window_start: Instant,
    request_count: u32,
    max_per_second: u32,
}

impl RateLimiter {
    pub fn new(max_per_second: u32) -> Self {
        Self { window_start: Instant::now(), request_count: 0, max_per_second }
    }

    /// Returns true if the request is allowed, false if rate-limited.
    pub fn check(&mut self) -> bool {
        if self.window_start.elapsed().as_secs() >= 1 {
            self.window_start = Instant::now();
            self.request_count = 0;
        }
        self.request_count += 1;
        self.request_count <= self.max_per_second
    }
}

/// Reads newline-delimited requests from `input` until EOF and sends one
/// response per request to `responses`.
///
/// Each request runs as its own task, so responses arrive in completion order
/// and a slow summary does not hold up `summary.state` for the same bookmark.
/// Returns once every started request has answered.
pub async fn serve<R>(app: Arc<App>, input: R, responses: UnboundedSender<Value>, max_per_second: u32)
where
    R: AsyncBufRead + Unpin,
{
    let mut rate_limiter = RateLimiter::new(max_per_second);
    let mut lines = input.lines();
    let mut tasks = JoinSet::new();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line,
            Some(_) = tasks.join_next(), if !tasks.is_empty() => continue,
        };
        let line = match line {
            Ok(Some(l)) => l,
            Ok(None) => break,
            Err(e) => {
                error!(error = %e, "input read failed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                let _ = responses.send(json!({"id": null, "error": format!("parse error: {}", e)}));
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);

        if !rate_limiter.check() {
            warn!("rate limit exceeded");
            let _ = responses.send(json!({"id": id, "error": "rate limit exceeded"}));
            continue;
        }

        let app = Arc::clone(&app);
        let responses = responses.clone();
        tasks.spawn(async move {
            let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
            let params = req.get("params").cloned().unwrap_or(json!({}));

            let response = match handle_method(&app, method, &params).await {
                Ok(val) => json!({"id": id, "result": val}),
                Err(err) => {
                    warn!(method, error = %err, "rpc call failed");
                    json!({"id": id, "error": err})
                }
            };
            let _ = responses.send(response);
        });
    }

    while tasks.join_next().await.is_some() {}
}
