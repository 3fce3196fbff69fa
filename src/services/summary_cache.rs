//! Session-scoped cache of per-bookmark summaries.
//!
//! Summaries follow a single contract: look up the saved summary, and when the
//! server has none, ask it to generate and save one. Results stay cached for
//! the life of the cache and are only replaced by an explicit regeneration.
//!
//! Each bookmark id has at most one request in flight. A second request for
//! the same id joins the pending one instead of issuing another round trip.
//! Requests run as spawned tasks so their outcome is recorded even when every
//! caller has stopped waiting; closing the cache cancels them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::ApiClientTrait;
use crate::types::errors::SummaryError;
use crate::types::summary::SummaryState;

type PendingSummary = Shared<BoxFuture<'static, Result<String, SummaryError>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SummaryMode {
    /// Saved summary if any, otherwise generate and save.
    FetchOrGenerate,
    /// Always generate and save, replacing whatever was saved.
    Regenerate,
}

enum Entry {
    Loading { generation: u64, pending: PendingSummary },
    Present(String),
}

#[derive(Default)]
struct Inner {
    entries: HashMap<i64, Entry>,
    next_generation: u64,
}

/// Keyed summary cache with in-flight request joining.
pub struct SummaryCache {
    api: Arc<dyn ApiClientTrait>,
    inner: Arc<Mutex<Inner>>,
    cancel: CancellationToken,
}

impl SummaryCache {
    pub fn new(api: Arc<dyn ApiClientTrait>) -> Self {
        Self {
            api,
            inner: Arc::new(Mutex::new(Inner::default())),
            cancel: CancellationToken::new(),
        }
    }

    fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
        inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Current lifecycle state for a bookmark.
    pub fn state(&self, bookmark_id: i64) -> SummaryState {
        match Self::lock(&self.inner).entries.get(&bookmark_id) {
            None => SummaryState::Absent,
            Some(Entry::Loading { .. }) => SummaryState::Loading,
            Some(Entry::Present(text)) => SummaryState::Present(text.clone()),
        }
    }

    /// Cached summary text, if one is present.
    pub fn cached(&self, bookmark_id: i64) -> Option<String> {
        match Self::lock(&self.inner).entries.get(&bookmark_id) {
            Some(Entry::Present(text)) => Some(text.clone()),
            _ => None,
        }
    }

    /// Number of requests currently in flight.
    pub fn in_flight(&self) -> usize {
        Self::lock(&self.inner)
            .entries
            .values()
            .filter(|e| matches!(e, Entry::Loading { .. }))
            .count()
    }

    /// Returns the summary for `bookmark_id`, fetching or generating it if needed.
    pub async fn request(&self, bookmark_id: i64) -> Result<String, SummaryError> {
        self.run(bookmark_id, SummaryMode::FetchOrGenerate).await
    }

    /// Discards any cached summary and has the server generate a fresh one.
    ///
    /// If a request for the same id is already running, joins it instead.
    pub async fn regenerate(&self, bookmark_id: i64) -> Result<String, SummaryError> {
        self.run(bookmark_id, SummaryMode::Regenerate).await
    }

    /// Forgets every cached summary. Running requests finish without
    /// recording their results.
    pub fn clear(&self) {
        Self::lock(&self.inner).entries.clear();
    }

    /// Cancels running requests and refuses new ones.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    async fn run(&self, bookmark_id: i64, mode: SummaryMode) -> Result<String, SummaryError> {
        if self.cancel.is_cancelled() {
            return Err(SummaryError::Cancelled);
        }

        let pending = {
            let mut inner = Self::lock(&self.inner);
            match inner.entries.get(&bookmark_id) {
                Some(Entry::Present(text)) if mode == SummaryMode::FetchOrGenerate => {
                    return Ok(text.clone());
                }
                Some(Entry::Loading { pending, .. }) => {
                    debug!(bookmark_id, "joining in-flight summary request");
                    pending.clone()
                }
                _ => {
                    let generation = inner.next_generation;
                    inner.next_generation += 1;
                    let pending = self.spawn(bookmark_id, generation, mode);
                    inner.entries.insert(
                        bookmark_id,
                        Entry::Loading {
                            generation,
                            pending: pending.clone(),
                        },
                    );
                    pending
                }
            }
        };

        pending.await
    }

    fn spawn(&self, bookmark_id: i64, generation: u64, mode: SummaryMode) -> PendingSummary {
        let api = Arc::clone(&self.api);
        let inner = Arc::clone(&self.inner);
        let token = self.cancel.clone();

        let handle = tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                _ = token.cancelled() => Err(SummaryError::Cancelled),
                res = fetch(api.as_ref(), bookmark_id, mode) => res,
            };
            settle(&inner, bookmark_id, generation, &result);
            result
        });

        async move { handle.await.unwrap_or(Err(SummaryError::Cancelled)) }
            .boxed()
            .shared()
    }
}

impl Drop for SummaryCache {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn fetch(
    api: &dyn ApiClientTrait,
    bookmark_id: i64,
    mode: SummaryMode,
) -> Result<String, SummaryError> {
    if mode == SummaryMode::FetchOrGenerate {
        match api.get_bookmark_summary(bookmark_id).await {
            Ok(saved) => return Ok(saved.summary),
            Err(e) if e.is_not_found() => {
                debug!(bookmark_id, "no saved summary, generating");
            }
            Err(e) => return Err(e.into()),
        }
    }
    let saved = api.save_bookmark_summary(bookmark_id).await?;
    Ok(saved.summary)
}

// Only the request that owns the entry may move it out of `Loading`.
fn settle(inner: &Mutex<Inner>, bookmark_id: i64, generation: u64, result: &Result<String, SummaryError>) {
    let mut inner = SummaryCache::lock(inner);
    let owned = matches!(
        inner.entries.get(&bookmark_id),
        Some(Entry::Loading { generation: g, .. }) if *g == generation
    );
    if !owned {
        return;
    }
    match result {
        Ok(text) => {
            inner.entries.insert(bookmark_id, Entry::Present(text.clone()));
        }
        Err(e) => {
            warn!(bookmark_id, error = %e, "summary request failed");
            inner.entries.remove(&bookmark_id);
        }
    }
}
