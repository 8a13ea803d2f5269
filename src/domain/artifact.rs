use crate::domain::Chapter;

/// Everything one scrape cycle produced for a single work.
///
/// Ephemeral: artifacts are never persisted as a unit, the reconciler
/// persists their chapters individually.
#[derive(Debug, Clone)]
pub struct WorkArtifact {
    pub title: String,
    pub chapters: Vec<Chapter>,
}

impl WorkArtifact {
    pub fn new(title: impl Into<String>, chapters: Vec<Chapter>) -> Self {
        Self {
            title: title.into(),
            chapters,
        }
    }
}
