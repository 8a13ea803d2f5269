//! Read-state reconciliation.
//!
//! A chapter's first sighting is also its persistence event: `reconcile`
//! inserts anything it has never seen and reports as unseen everything whose
//! persisted read flag is still false. Chapters surfaced before but never
//! acknowledged come back every cycle until someone acknowledges them.

use tracing::debug;

use crate::app::Result;
use crate::domain::{Chapter, WorkArtifact};
use crate::store::Store;

/// Compare a freshly extracted artifact against the work's collection and
/// return the unseen chapters, newest first.
///
/// Every returned chapter carries its storage id, whether it was inserted
/// just now or found from a prior cycle.
pub fn reconcile<S: Store>(store: &S, artifact: &WorkArtifact) -> Result<Vec<Chapter>> {
    let mut unseen = Vec::new();

    for chapter in &artifact.chapters {
        match store.find_one(&artifact.title, &chapter.title)? {
            None => {
                let mut chapter = chapter.clone();
                let id = store.insert_one(&artifact.title, &chapter)?;
                chapter.id = Some(id);
                unseen.push(chapter);
            }
            Some(stored) if !stored.is_read => {
                let mut chapter = chapter.clone();
                chapter.id = stored.id;
                unseen.push(chapter);
            }
            Some(_) => {}
        }
    }

    debug!(
        work = %artifact.title,
        extracted = artifact.chapters.len(),
        unseen = unseen.len(),
        "reconciled"
    );

    // Extraction order is page order, not chronology
    unseen.sort_by(|a, b| b.release_date.cmp(&a.release_date));
    Ok(unseen)
}

/// Mark the chapter with the given storage id as read.
///
/// Collections share no id space, so this scans every collection in turn.
/// Returns the acknowledged chapter, or `None` when no collection holds the
/// id (nothing is mutated in that case). Acknowledging an already-read
/// chapter is a no-op that still returns the chapter.
pub fn acknowledge<S: Store>(store: &S, id: i64) -> Result<Option<Chapter>> {
    for collection in store.list_collection_names()? {
        if let Some(mut chapter) = store.find_by_id(&collection, id)? {
            store.mark_read(&collection, id)?;
            chapter.is_read = true;
            return Ok(Some(chapter));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;
    use chrono::{TimeZone, Utc};

    fn chapter(work: &str, title: &str, month: u32, day: u32) -> Chapter {
        Chapter::new(
            work,
            title,
            format!("https://mangalib.me/{work}/{title}"),
            Utc.with_ymd_and_hms(2024, month, day, 0, 0, 0).unwrap(),
        )
    }

    fn artifact(work: &str, chapters: Vec<Chapter>) -> WorkArtifact {
        WorkArtifact::new(work, chapters)
    }

    #[test]
    fn test_first_pass_inserts_and_returns_everything() {
        let store = SqliteStore::in_memory().unwrap();
        let art = artifact(
            "W",
            vec![chapter("W", "c1", 1, 1), chapter("W", "c2", 1, 2)],
        );

        let unseen = reconcile(&store, &art).unwrap();
        assert_eq!(unseen.len(), 2);
        assert!(unseen.iter().all(|c| c.id.is_some()));
        assert_eq!(store.find_all("W").unwrap().len(), 2);
    }

    #[test]
    fn test_second_pass_is_insert_idempotent_but_resurfaces_unread() {
        let store = SqliteStore::in_memory().unwrap();
        let art = artifact(
            "W",
            vec![chapter("W", "c1", 1, 1), chapter("W", "c2", 1, 2)],
        );

        let first = reconcile(&store, &art).unwrap();
        let second = reconcile(&store, &art).unwrap();

        // No duplicate inserts, but the same unacknowledged set comes back
        assert_eq!(store.find_all("W").unwrap().len(), 2);
        let titles = |v: &[Chapter]| v.iter().map(|c| c.title.clone()).collect::<Vec<_>>();
        assert_eq!(titles(&first), titles(&second));
    }

    #[test]
    fn test_unseen_sorted_newest_first() {
        let store = SqliteStore::in_memory().unwrap();
        let art = artifact(
            "W",
            vec![
                chapter("W", "january", 1, 1),
                chapter("W", "march", 3, 1),
                chapter("W", "february", 2, 1),
            ],
        );

        let unseen = reconcile(&store, &art).unwrap();
        let titles: Vec<_> = unseen.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["march", "february", "january"]);
    }

    #[test]
    fn test_acknowledged_chapter_is_excluded() {
        let store = SqliteStore::in_memory().unwrap();
        let art = artifact(
            "W",
            vec![chapter("W", "c1", 1, 1), chapter("W", "c2", 1, 2)],
        );

        let unseen = reconcile(&store, &art).unwrap();
        let read_id = unseen
            .iter()
            .find(|c| c.title == "c1")
            .and_then(|c| c.id)
            .unwrap();

        let acked = acknowledge(&store, read_id).unwrap().unwrap();
        assert!(acked.is_read);
        assert_eq!(acked.title, "c1");

        let unseen = reconcile(&store, &art).unwrap();
        assert_eq!(unseen.len(), 1);
        assert_eq!(unseen[0].title, "c2");
    }

    #[test]
    fn test_acknowledge_unknown_id_is_not_found() {
        let store = SqliteStore::in_memory().unwrap();
        let art = artifact("W", vec![chapter("W", "c1", 1, 1)]);
        reconcile(&store, &art).unwrap();

        assert!(acknowledge(&store, 9999).unwrap().is_none());

        // Nothing mutated
        let unseen = reconcile(&store, &art).unwrap();
        assert_eq!(unseen.len(), 1);
    }

    #[test]
    fn test_acknowledge_scans_across_collections() {
        let store = SqliteStore::in_memory().unwrap();
        reconcile(&store, &artifact("A", vec![chapter("A", "c1", 1, 1)])).unwrap();
        let unseen = reconcile(&store, &artifact("B", vec![chapter("B", "c1", 1, 2)])).unwrap();

        let id = unseen[0].id.unwrap();
        let acked = acknowledge(&store, id).unwrap().unwrap();
        assert_eq!(acked.work_title, "B");

        // A's identically-titled chapter is untouched
        assert_eq!(store.unread_count("A").unwrap(), 1);
        assert_eq!(store.unread_count("B").unwrap(), 0);
    }

    #[test]
    fn test_acknowledge_twice_is_idempotent() {
        let store = SqliteStore::in_memory().unwrap();
        let unseen =
            reconcile(&store, &artifact("W", vec![chapter("W", "c1", 1, 1)])).unwrap();
        let id = unseen[0].id.unwrap();

        assert!(acknowledge(&store, id).unwrap().unwrap().is_read);
        assert!(acknowledge(&store, id).unwrap().unwrap().is_read);
    }

    #[test]
    fn test_known_unread_chapter_carries_persisted_id() {
        let store = SqliteStore::in_memory().unwrap();
        let art = artifact("W", vec![chapter("W", "c1", 1, 1)]);

        let first = reconcile(&store, &art).unwrap();
        let second = reconcile(&store, &art).unwrap();
        assert_eq!(first[0].id, second[0].id);
        assert!(second[0].id.is_some());
    }
}
