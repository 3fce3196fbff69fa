use serde::{Deserialize, Serialize};

/// Body of `GET /api/bookmarks/{id}/summary` and `POST /api/summarize`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryResponse {
    pub summary: String,
}

/// Body of `POST /api/bookmarks/{id}/summary`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedSummary {
    pub id: i64,
    pub summary: String,
}

/// Request body for `POST /api/summarize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeRequest {
    pub text: String,
}

/// Per-item summary lifecycle held in view state.
///
/// A single value per item, so an entry is never both loading and present.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "summary", rename_all = "snake_case")]
pub enum SummaryState {
    #[default]
    Absent,
    Loading,
    Present(String),
}

impl SummaryState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SummaryState::Loading)
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            SummaryState::Present(t) => Some(t),
            _ => None,
        }
    }
}
