//! Submissions screen and the submit form.
//!
//! Submission summaries are stateless one-shot calls: nothing is saved
//! server-side, and selecting a summarized submission again hides it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use crate::api::ApiClientTrait;
use crate::types::errors::ApiError;
use crate::types::submission::Submission;
use crate::types::summary::SummaryState;

pub const EMPTY_PLACEHOLDER: &str = "No submissions yet";

/// Validation state of the submit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitForm {
    text: String,
}

impl SubmitForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_valid(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// The text to submit, or `InvalidInput` when blank.
    pub fn validated(&self) -> Result<&str, ApiError> {
        let trimmed = self.text.trim();
        if trimmed.is_empty() {
            return Err(ApiError::InvalidInput("submission text is required".to_string()));
        }
        Ok(trimmed)
    }
}

/// Shared by reference: creating submissions and toggling summaries both
/// take `&self`, so one screen can serve concurrent callers.
pub struct SubmissionsView {
    api: Arc<dyn ApiClientTrait>,
    submissions: Mutex<Vec<Submission>>,
    summaries: Mutex<HashMap<i64, SummaryState>>,
}

impl SubmissionsView {
    pub async fn load(api: Arc<dyn ApiClientTrait>) -> Result<Self, ApiError> {
        let submissions = api.list_submissions().await?;
        info!(count = submissions.len(), "submissions view loaded");
        Ok(Self {
            api,
            submissions: Mutex::new(submissions),
            summaries: Mutex::new(HashMap::new()),
        })
    }

    fn summaries(&self) -> MutexGuard<'_, HashMap<i64, SummaryState>> {
        self.summaries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn list(&self) -> MutexGuard<'_, Vec<Submission>> {
        self.submissions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Snapshot of the loaded submissions, in server order.
    pub fn submissions(&self) -> Vec<Submission> {
        self.list().clone()
    }

    pub fn placeholder(&self) -> Option<&'static str> {
        if self.list().is_empty() {
            Some(EMPTY_PLACEHOLDER)
        } else {
            None
        }
    }

    /// Stores a new submission and appends it to the list.
    pub async fn create(&self, text: &str) -> Result<Submission, ApiError> {
        let mut form = SubmitForm::new();
        form.set_text(text);
        let text = form.validated()?;
        let submission = self.api.create_submission(text).await?;
        self.list().push(submission.clone());
        Ok(submission)
    }

    pub fn summary_state(&self, submission_id: i64) -> SummaryState {
        self.summaries()
            .get(&submission_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Shows or hides the summary of a submission.
    ///
    /// Returns `Some(text)` when a summary was fetched and is now shown, and
    /// `None` when a shown summary was hidden or a request is already running.
    pub async fn toggle_summary(&self, submission_id: i64) -> Result<Option<String>, ApiError> {
        let text = {
            let list = self.list();
            list.iter()
                .find(|s| s.id == submission_id)
                .map(|s| s.text.clone())
        };
        let text = text.ok_or_else(|| ApiError::NotFound(format!("submission {}", submission_id)))?;

        {
            let mut summaries = self.summaries();
            match summaries.get(&submission_id) {
                Some(SummaryState::Present(_)) => {
                    summaries.remove(&submission_id);
                    return Ok(None);
                }
                Some(SummaryState::Loading) => {
                    debug!(submission_id, "summary already loading");
                    return Ok(None);
                }
                _ => {
                    summaries.insert(submission_id, SummaryState::Loading);
                }
            }
        }

        match self.api.summarize_text(&text).await {
            Ok(resp) => {
                self.summaries()
                    .insert(submission_id, SummaryState::Present(resp.summary.clone()));
                Ok(Some(resp.summary))
            }
            Err(e) => {
                warn!(submission_id, error = %e, "submission summary failed");
                self.summaries().remove(&submission_id);
                Err(e)
            }
        }
    }
}
