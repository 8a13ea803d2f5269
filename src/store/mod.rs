pub mod sqlite;

use crate::app::Result;
use crate::domain::Chapter;

pub use sqlite::SqliteStore;

/// Document-oriented chapter storage, one collection per work title.
///
/// Operations are collection-scoped; there is no global chapter id space.
/// Callers that only hold an id (acknowledgment) scan collections via
/// [`Store::list_collection_names`].
pub trait Store {
    /// Look up a chapter document by its natural key within one collection.
    fn find_one(&self, collection: &str, title: &str) -> Result<Option<Chapter>>;

    /// Insert a chapter document and return its storage-assigned id.
    fn insert_one(&self, collection: &str, chapter: &Chapter) -> Result<i64>;

    /// Look up a chapter document by storage id within one collection.
    fn find_by_id(&self, collection: &str, id: i64) -> Result<Option<Chapter>>;

    /// Set the document's read flag to true.
    ///
    /// Fails with [`ShinkanError::MissingReadFlag`](crate::app::ShinkanError)
    /// when the persisted document has no read-flag field at all.
    fn mark_read(&self, collection: &str, id: i64) -> Result<()>;

    /// Names of every collection that holds at least one document.
    fn list_collection_names(&self) -> Result<Vec<String>>;

    /// Every chapter document in one collection, newest first.
    fn find_all(&self, collection: &str) -> Result<Vec<Chapter>>;

    /// Count of unread documents in one collection.
    fn unread_count(&self, collection: &str) -> Result<usize> {
        Ok(self
            .find_all(collection)?
            .iter()
            .filter(|c| !c.is_read)
            .count())
    }
}
