use crate::app::Result;
use crate::domain::Chapter;

/// What a delivery channel needs to announce one unseen chapter: a
/// human-readable label, the read URL, and an action token that `ack`
/// resolves back to a storage id.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseNote {
    pub label: String,
    pub url: String,
    pub token: String,
}

impl ReleaseNote {
    /// Build a note for a reconciled chapter. Returns `None` for a chapter
    /// that was never persisted, since there is nothing to acknowledge.
    pub fn from_chapter(chapter: &Chapter) -> Option<Self> {
        let id = chapter.id?;
        Some(Self {
            label: chapter.label(),
            url: chapter.url.clone(),
            token: id.to_string(),
        })
    }
}

/// Delivery-channel seam. Bots, webhooks and the like live behind this
/// trait; the crate only ships a console implementation.
pub trait NotificationSink {
    fn notify(&self, note: &ReleaseNote) -> Result<()>;
}

/// Prints releases to stdout, one block per chapter.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn notify(&self, note: &ReleaseNote) -> Result<()> {
        println!("● {}", note.label);
        println!("  read: {}", note.url);
        println!("  ack:  shinkan ack {}", note.token);
        Ok(())
    }
}
