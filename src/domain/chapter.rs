use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One released chapter of a tracked work.
///
/// The chapter `title` is the natural key: it is unique within a work and
/// stable across scrape runs, so it is the only field used to decide whether
/// a chapter has been seen before. `id` is assigned by the store on first
/// insertion and stays `None` on freshly extracted records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub work_title: String,
    pub title: String,
    pub url: String,
    pub release_date: DateTime<Utc>,
    #[serde(default)]
    pub is_read: bool,
}

impl Chapter {
    pub fn new(
        work_title: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
        release_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            work_title: work_title.into(),
            title: title.into(),
            url: url.into(),
            release_date,
            is_read: false,
        }
    }

    /// Human-readable label used by notification sinks: `"<work>: <chapter>"`.
    pub fn label(&self) -> String {
        format!("{}: {}", self.work_title, self.title)
    }
}
