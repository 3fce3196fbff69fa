use serde::{Deserialize, Serialize};

/// Link from a bookmark to a grouped screen. An id narrows the screen to a
/// single collection or tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "screen", content = "id", rename_all = "snake_case")]
pub enum Route {
    Collections(Option<i64>),
    Tags(Option<i64>),
}
