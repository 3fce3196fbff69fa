//! App Core for ScrollWise.
//!
//! Central struct holding the API client, the session summary cache and the
//! loaded settings. Views are created on demand and share the summary cache,
//! so a summary fetched on one screen shows up on every other.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::api::{ApiClientTrait, HttpApiClient};
use crate::managers::bookmark_view::BookmarksView;
use crate::managers::grouped_view::GroupedView;
use crate::managers::submission_view::{SubmissionsView, SubmitForm};
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::services::summary_cache::SummaryCache;
use crate::types::bookmark::{dedup_ids, Bookmark, BookmarkUpdate, Collection, NewBookmark, Tag};
use crate::types::errors::{ApiError, SettingsError};
use crate::types::settings::ClientSettings;
use crate::types::submission::Submission;

pub struct App {
    /// Effective settings for this run, environment overrides included.
    pub settings: ClientSettings,
    config_path: String,
    api: Arc<dyn ApiClientTrait>,
    summaries: Arc<SummaryCache>,
    submissions: Mutex<Option<Arc<SubmissionsView>>>,
}

impl App {
    /// Creates an App talking HTTP to the configured server.
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let api: Arc<dyn ApiClientTrait> = Arc::new(HttpApiClient::from_settings(&settings)?);
        Ok(Self::with_api(api, settings))
    }

    /// Creates an App over any API implementation. The settings file is the
    /// default one; see [`App::with_config_path`].
    pub fn with_api(api: Arc<dyn ApiClientTrait>, settings: ClientSettings) -> Self {
        let summaries = Arc::new(SummaryCache::new(Arc::clone(&api)));
        Self {
            settings,
            config_path: SettingsEngine::new(None).get_config_path().to_string(),
            api,
            summaries,
            submissions: Mutex::new(None),
        }
    }

    /// Points the stored-settings operations at another file.
    pub fn with_config_path(mut self, path: impl Into<String>) -> Self {
        self.config_path = path.into();
        self
    }

    /// Loads settings from disk (or `path_override`), applies environment
    /// overrides, and builds the App.
    pub fn from_config(path_override: Option<String>) -> Result<Self, Box<dyn std::error::Error>> {
        let mut engine = SettingsEngine::new(path_override);
        engine.load()?;
        engine.apply_env_overrides()?;
        let settings = engine.get_settings().clone();
        let config_path = engine.get_config_path().to_string();
        Ok(Self::new(settings)?.with_config_path(config_path))
    }

    pub fn config_path(&self) -> &str {
        &self.config_path
    }

    pub fn api(&self) -> &Arc<dyn ApiClientTrait> {
        &self.api
    }

    pub fn summaries(&self) -> &Arc<SummaryCache> {
        &self.summaries
    }

    // ─── Stored settings ───
    // These read and write the settings file only. Environment overrides are
    // never persisted, and changes take effect on the next start.

    fn settings_engine(&self) -> Result<SettingsEngine, SettingsError> {
        let mut engine = SettingsEngine::new(Some(self.config_path.clone()));
        engine.load()?;
        Ok(engine)
    }

    pub fn stored_settings(&self) -> Result<ClientSettings, SettingsError> {
        Ok(self.settings_engine()?.get_settings().clone())
    }

    pub fn set_setting(&self, key: &str, value: serde_json::Value) -> Result<ClientSettings, SettingsError> {
        let mut engine = self.settings_engine()?;
        engine.set_value(key, value)?;
        Ok(engine.get_settings().clone())
    }

    pub fn reset_settings(&self) -> Result<ClientSettings, SettingsError> {
        let mut engine = SettingsEngine::new(Some(self.config_path.clone()));
        engine.reset()?;
        Ok(engine.get_settings().clone())
    }

    // ─── Screens ───

    pub async fn bookmarks_view(&self) -> Result<BookmarksView, ApiError> {
        BookmarksView::load(self.api.as_ref(), Arc::clone(&self.summaries)).await
    }

    pub async fn collections_view(&self, route_id: Option<i64>) -> Result<GroupedView, ApiError> {
        GroupedView::collections(self.api.as_ref(), Arc::clone(&self.summaries), route_id).await
    }

    pub async fn tags_view(&self, route_id: Option<i64>) -> Result<GroupedView, ApiError> {
        GroupedView::tags(self.api.as_ref(), Arc::clone(&self.summaries), route_id).await
    }

    /// Reloads the submissions screen, dropping any shown summaries.
    pub async fn reload_submissions(&self) -> Result<Vec<Submission>, ApiError> {
        let view = Arc::new(SubmissionsView::load(Arc::clone(&self.api)).await?);
        let items = view.submissions();
        *self.submissions.lock().await = Some(view);
        Ok(items)
    }

    /// The current submissions screen, loading it first if needed. The lock
    /// is released before the caller awaits anything on the view.
    async fn submissions_view(&self) -> Result<Arc<SubmissionsView>, ApiError> {
        let mut guard = self.submissions.lock().await;
        if let Some(view) = guard.as_ref() {
            return Ok(Arc::clone(view));
        }
        let view = Arc::new(SubmissionsView::load(Arc::clone(&self.api)).await?);
        *guard = Some(Arc::clone(&view));
        Ok(view)
    }

    /// Toggles the summary of a submission on the current submissions screen.
    /// Different submissions load independently.
    pub async fn toggle_submission_summary(&self, submission_id: i64) -> Result<Option<String>, ApiError> {
        let view = self.submissions_view().await?;
        view.toggle_summary(submission_id).await
    }

    /// Text rendering of the current submissions screen, if loaded.
    pub async fn render_submissions(&self) -> Option<String> {
        let view = self.submissions.lock().await.clone();
        view.map(|v| crate::ui::text::render_submissions(&v))
    }

    /// Creates a submission from form text.
    pub async fn submit(&self, text: &str) -> Result<Submission, ApiError> {
        let view = self.submissions.lock().await.clone();
        match view {
            Some(view) => view.create(text).await,
            None => {
                let mut form = SubmitForm::new();
                form.set_text(text);
                self.api.create_submission(form.validated()?).await
            }
        }
    }

    pub async fn add_bookmark(&self, bookmark: NewBookmark) -> Result<Bookmark, ApiError> {
        if bookmark.text.trim().is_empty() {
            return Err(ApiError::InvalidInput("bookmark text is required".to_string()));
        }
        let bookmark = NewBookmark {
            tag_ids: bookmark.tag_ids.map(dedup_ids),
            ..bookmark
        };
        self.api.create_bookmark(&bookmark).await
    }

    pub async fn get_bookmark(&self, id: i64) -> Result<Bookmark, ApiError> {
        self.api.get_bookmark(id).await
    }

    pub async fn update_bookmark(&self, id: i64, update: BookmarkUpdate) -> Result<Bookmark, ApiError> {
        if update.is_empty() {
            return Err(ApiError::InvalidInput("nothing to update".to_string()));
        }
        let update = BookmarkUpdate {
            tag_ids: update.tag_ids.map(dedup_ids),
            ..update
        };
        self.api.update_bookmark(id, &update).await
    }

    pub async fn add_collection(&self, name: &str) -> Result<Collection, ApiError> {
        let name = required_name(name, "collection")?;
        self.api.create_collection(name).await
    }

    pub async fn add_tag(&self, name: &str) -> Result<Tag, ApiError> {
        let name = required_name(name, "tag")?;
        self.api.create_tag(name).await
    }

    /// Cancels in-flight summary requests.
    pub fn shutdown(&self) {
        self.summaries.close();
    }
}

fn required_name<'a>(name: &'a str, what: &str) -> Result<&'a str, ApiError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidInput(format!("{} name is required", what)));
    }
    Ok(trimmed)
}
