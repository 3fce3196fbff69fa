use serde::{Deserialize, Deserializer, Serialize};

/// Represents a saved bookmark as returned by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bookmark {
    pub id: i64,
    pub text: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub collection_id: Option<i64>,
    #[serde(default)]
    pub collection_name: Option<String>,
    #[serde(default, deserialize_with = "unique_tags")]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub created_at: String,
}

impl Bookmark {
    /// Title shown on cards: the bookmark title, or `Bookmark #<id>` when untitled.
    pub fn display_title(&self) -> String {
        match self.title.as_deref() {
            Some(t) if !t.trim().is_empty() => t.to_string(),
            _ => format!("Bookmark #{}", self.id),
        }
    }

    pub fn has_tag(&self, tag_id: i64) -> bool {
        self.tags.iter().any(|t| t.id == tag_id)
    }
}

/// A named label; a bookmark may carry many.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

/// A named grouping; a bookmark belongs to at most one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Collection {
    pub id: i64,
    pub name: String,
}

/// Request body for `POST /api/bookmarks`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewBookmark {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<i64>>,
}

impl NewBookmark {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_collection(mut self, collection_id: i64) -> Self {
        self.collection_id = Some(collection_id);
        self
    }

    /// Sets the tag ids, dropping repeats while keeping first-seen order.
    pub fn with_tags(mut self, tag_ids: impl IntoIterator<Item = i64>) -> Self {
        self.tag_ids = Some(dedup_ids(tag_ids));
        self
    }
}

/// Request body for `PUT /api/bookmarks/{id}`. Unset fields are left out of the body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BookmarkUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<i64>>,
}

impl BookmarkUpdate {
    pub fn with_tags(mut self, tag_ids: impl IntoIterator<Item = i64>) -> Self {
        self.tag_ids = Some(dedup_ids(tag_ids));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.collection_id.is_none() && self.tag_ids.is_none()
    }
}

pub(crate) fn dedup_ids(ids: impl IntoIterator<Item = i64>) -> Vec<i64> {
    let mut out: Vec<i64> = Vec::new();
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

// Accepts `null` as well as a missing field, and keeps the first occurrence of each tag id.
fn unique_tags<'de, D>(deserializer: D) -> Result<Vec<Tag>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Tag>> = Option::deserialize(deserializer)?;
    let mut tags: Vec<Tag> = Vec::new();
    for tag in raw.unwrap_or_default() {
        if !tags.iter().any(|t| t.id == tag.id) {
            tags.push(tag);
        }
    }
    Ok(tags)
}
