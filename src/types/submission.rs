use serde::{Deserialize, Serialize};

/// A standalone saved text/URL record, unrelated to bookmarks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Submission {
    pub id: i64,
    pub text: String,
    #[serde(default)]
    pub created_at: String,
}

/// Request body for `POST /api/submissions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSubmission {
    pub text: String,
}
