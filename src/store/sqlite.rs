use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};
use rusqlite_migration::{Migrations, M};
use serde_json::Value;

use crate::app::{Result, ShinkanError};
use crate::domain::Chapter;
use crate::store::Store;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.lock()?;
        migrations
            .to_latest(&mut conn)
            .map_err(|_| ShinkanError::Database(rusqlite::Error::InvalidQuery))?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            ShinkanError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })
    }

    fn decode(id: i64, doc: &str) -> Result<Chapter> {
        let mut chapter: Chapter = serde_json::from_str(doc)?;
        chapter.id = Some(id);
        Ok(chapter)
    }
}

impl Store for SqliteStore {
    fn find_one(&self, collection: &str, title: &str) -> Result<Option<Chapter>> {
        let conn = self.lock()?;

        let row = conn
            .query_row(
                "SELECT id, doc FROM chapters WHERE collection = ?1 AND title = ?2",
                params![collection, title],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        match row {
            Some((id, doc)) => Ok(Some(Self::decode(id, &doc)?)),
            None => Ok(None),
        }
    }

    fn insert_one(&self, collection: &str, chapter: &Chapter) -> Result<i64> {
        let conn = self.lock()?;

        let doc = serde_json::to_string(chapter)?;
        conn.execute(
            "INSERT INTO chapters (collection, title, doc) VALUES (?1, ?2, ?3)",
            params![collection, chapter.title, doc],
        )?;

        Ok(conn.last_insert_rowid())
    }

    fn find_by_id(&self, collection: &str, id: i64) -> Result<Option<Chapter>> {
        let conn = self.lock()?;

        let doc = conn
            .query_row(
                "SELECT doc FROM chapters WHERE collection = ?1 AND id = ?2",
                params![collection, id],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        match doc {
            Some(doc) => Ok(Some(Self::decode(id, &doc)?)),
            None => Ok(None),
        }
    }

    fn mark_read(&self, collection: &str, id: i64) -> Result<()> {
        let conn = self.lock()?;

        let doc: String = conn.query_row(
            "SELECT doc FROM chapters WHERE collection = ?1 AND id = ?2",
            params![collection, id],
            |row| row.get(0),
        )?;

        let mut value: Value = serde_json::from_str(&doc)?;
        match value.get_mut("is_read") {
            Some(flag) => *flag = Value::Bool(true),
            None => return Err(ShinkanError::MissingReadFlag { id }),
        }

        conn.execute(
            "UPDATE chapters SET doc = ?1 WHERE collection = ?2 AND id = ?3",
            params![value.to_string(), collection, id],
        )?;

        Ok(())
    }

    fn list_collection_names(&self) -> Result<Vec<String>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare("SELECT DISTINCT collection FROM chapters ORDER BY collection")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(names)
    }

    fn find_all(&self, collection: &str) -> Result<Vec<Chapter>> {
        let conn = self.lock()?;

        let mut stmt =
            conn.prepare("SELECT id, doc FROM chapters WHERE collection = ?1 ORDER BY id")?;
        let rows = stmt
            .query_map(params![collection], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut chapters = rows
            .iter()
            .map(|(id, doc)| Self::decode(*id, doc))
            .collect::<Result<Vec<_>>>()?;

        chapters.sort_by(|a, b| b.release_date.cmp(&a.release_date));
        Ok(chapters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn chapter(work: &str, title: &str, day: u32) -> Chapter {
        Chapter::new(
            work,
            title,
            format!("https://mangalib.me/{work}/c{day}"),
            Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_insert_and_find_one() {
        let store = SqliteStore::in_memory().unwrap();
        let id = store
            .insert_one("One Piece", &chapter("One Piece", "Chapter 1", 1))
            .unwrap();

        let found = store.find_one("One Piece", "Chapter 1").unwrap().unwrap();
        assert_eq!(found.id, Some(id));
        assert_eq!(found.title, "Chapter 1");
        assert!(!found.is_read);
    }

    #[test]
    fn test_find_one_scoped_to_collection() {
        let store = SqliteStore::in_memory().unwrap();
        store
            .insert_one("One Piece", &chapter("One Piece", "Chapter 1", 1))
            .unwrap();

        // Same title in a different collection does not collide
        assert!(store.find_one("Berserk", "Chapter 1").unwrap().is_none());
        store
            .insert_one("Berserk", &chapter("Berserk", "Chapter 1", 2))
            .unwrap();
        assert!(store.find_one("Berserk", "Chapter 1").unwrap().is_some());
    }

    #[test]
    fn test_duplicate_title_in_collection_rejected() {
        let store = SqliteStore::in_memory().unwrap();
        let c = chapter("One Piece", "Chapter 1", 1);
        store.insert_one("One Piece", &c).unwrap();
        assert!(store.insert_one("One Piece", &c).is_err());
    }

    #[test]
    fn test_mark_read_round_trips() {
        let store = SqliteStore::in_memory().unwrap();
        let id = store
            .insert_one("One Piece", &chapter("One Piece", "Chapter 1", 1))
            .unwrap();

        store.mark_read("One Piece", id).unwrap();
        let found = store.find_by_id("One Piece", id).unwrap().unwrap();
        assert!(found.is_read);

        // Idempotent
        store.mark_read("One Piece", id).unwrap();
        assert!(store.find_by_id("One Piece", id).unwrap().unwrap().is_read);
    }

    #[test]
    fn test_mark_read_missing_flag_is_invariant_violation() {
        let store = SqliteStore::in_memory().unwrap();

        // A document that lost its read flag, written behind the trait's back
        let id = {
            let conn = store.conn.lock().unwrap();
            conn.execute(
                "INSERT INTO chapters (collection, title, doc) VALUES (?1, ?2, ?3)",
                params![
                    "One Piece",
                    "Chapter 1",
                    r#"{"work_title":"One Piece","title":"Chapter 1","url":"u","release_date":"2024-01-01T00:00:00Z"}"#
                ],
            )
            .unwrap();
            conn.last_insert_rowid()
        };

        let err = store.mark_read("One Piece", id).unwrap_err();
        assert!(matches!(err, ShinkanError::MissingReadFlag { id: e } if e == id));

        // Nothing was mutated
        let found = store.find_by_id("One Piece", id).unwrap().unwrap();
        assert!(!found.is_read);
    }

    #[test]
    fn test_list_collection_names() {
        let store = SqliteStore::in_memory().unwrap();
        store
            .insert_one("One Piece", &chapter("One Piece", "Chapter 1", 1))
            .unwrap();
        store
            .insert_one("One Piece", &chapter("One Piece", "Chapter 2", 2))
            .unwrap();
        store
            .insert_one("Berserk", &chapter("Berserk", "Chapter 377", 3))
            .unwrap();

        assert_eq!(
            store.list_collection_names().unwrap(),
            vec!["Berserk".to_string(), "One Piece".to_string()]
        );
    }

    #[test]
    fn test_find_by_id_wrong_collection() {
        let store = SqliteStore::in_memory().unwrap();
        let id = store
            .insert_one("One Piece", &chapter("One Piece", "Chapter 1", 1))
            .unwrap();

        assert!(store.find_by_id("Berserk", id).unwrap().is_none());
        assert!(store.find_by_id("One Piece", id).unwrap().is_some());
    }

    #[test]
    fn test_find_all_newest_first() {
        let store = SqliteStore::in_memory().unwrap();
        store
            .insert_one("W", &chapter("W", "Chapter 1", 1))
            .unwrap();
        store
            .insert_one("W", &chapter("W", "Chapter 3", 20))
            .unwrap();
        store
            .insert_one("W", &chapter("W", "Chapter 2", 10))
            .unwrap();

        let titles: Vec<_> = store
            .find_all("W")
            .unwrap()
            .into_iter()
            .map(|c| c.title)
            .collect();
        assert_eq!(titles, vec!["Chapter 3", "Chapter 2", "Chapter 1"]);
    }

    #[test]
    fn test_unread_count() {
        let store = SqliteStore::in_memory().unwrap();
        let id = store
            .insert_one("W", &chapter("W", "Chapter 1", 1))
            .unwrap();
        store
            .insert_one("W", &chapter("W", "Chapter 2", 2))
            .unwrap();

        assert_eq!(store.unread_count("W").unwrap(), 2);
        store.mark_read("W", id).unwrap();
        assert_eq!(store.unread_count("W").unwrap(), 1);
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shinkan.db");

        {
            let store = SqliteStore::new(&path).unwrap();
            store
                .insert_one("W", &chapter("W", "Chapter 1", 1))
                .unwrap();
        }

        let store = SqliteStore::new(&path).unwrap();
        assert!(store.find_one("W", "Chapter 1").unwrap().is_some());
    }
}
