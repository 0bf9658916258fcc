use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum FavoriteStoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Could not create favorites directory: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FavoriteStoreError>;

/// Favorites are namespaced so that different listings keep separate sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FavoriteKind {
    #[default]
    Popular,
    Trending,
}

impl FavoriteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FavoriteKind::Popular => "popular",
            FavoriteKind::Trending => "trending",
        }
    }
}

impl std::fmt::Display for FavoriteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A favorite as it sits on disk
#[derive(Debug, Clone, PartialEq)]
pub struct StoredFavorite {
    pub key: String,
    pub data: String,
    pub saved_at: DateTime<Utc>,
}

/// Favorites store using SQLite
///
/// Every operation is scoped to the store's [`FavoriteKind`]. Values are
/// opaque strings; callers decide the serialization.
pub struct FavoriteStore {
    conn: Connection,
    kind: FavoriteKind,
}

impl FavoriteStore {
    pub fn open(db_path: impl AsRef<Path>, kind: FavoriteKind) -> Result<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        debug!(path = %db_path.display(), %kind, "opening favorites store");
        let conn = Connection::open(db_path)?;
        Self::init_schema(&conn)?;

        Ok(Self { conn, kind })
    }

    pub fn open_in_memory(kind: FavoriteKind) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self { conn, kind })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS favorites (
                kind TEXT NOT NULL,
                key TEXT NOT NULL,
                data TEXT NOT NULL,
                saved_at INTEGER NOT NULL,
                PRIMARY KEY (kind, key)
            )",
            [],
        )?;
        Ok(())
    }

    /// All favorite keys for this kind. An empty store gives an empty set.
    pub fn keys(&self) -> Result<HashSet<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM favorites WHERE kind = ?1")?;
        let keys = stmt
            .query_map(params![self.kind.as_str()], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<HashSet<_>>>()?;
        Ok(keys)
    }

    /// Insert or overwrite a favorite
    pub fn save(&self, key: &str, data: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO favorites (kind, key, data, saved_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(kind, key) DO UPDATE SET data = excluded.data, saved_at = excluded.saved_at",
            params![self.kind.as_str(), key, data, Utc::now().timestamp()],
        )?;
        debug!(key, kind = %self.kind, "favorite saved");
        Ok(())
    }

    /// Remove a favorite. Removing a missing key is not an error.
    pub fn remove(&self, key: &str) -> Result<bool> {
        let removed = self.conn.execute(
            "DELETE FROM favorites WHERE kind = ?1 AND key = ?2",
            params![self.kind.as_str(), key],
        )?;
        debug!(key, kind = %self.kind, removed, "favorite removed");
        Ok(removed > 0)
    }

    pub fn get(&self, key: &str) -> Result<Option<StoredFavorite>> {
        let row = self
            .conn
            .query_row(
                "SELECT key, data, saved_at FROM favorites WHERE kind = ?1 AND key = ?2",
                params![self.kind.as_str(), key],
                |row| {
                    Ok(StoredFavorite {
                        key: row.get(0)?,
                        data: row.get(1)?,
                        saved_at: timestamp_to_utc(row.get(2)?),
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    /// Every saved favorite, newest first. Saves within the same second
    /// fall back to insertion order.
    pub fn items(&self) -> Result<Vec<StoredFavorite>> {
        let mut stmt = self.conn.prepare(
            "SELECT key, data, saved_at FROM favorites WHERE kind = ?1
             ORDER BY saved_at DESC, rowid DESC",
        )?;
        let items = stmt
            .query_map(params![self.kind.as_str()], |row| {
                Ok(StoredFavorite {
                    key: row.get(0)?,
                    data: row.get(1)?,
                    saved_at: timestamp_to_utc(row.get(2)?),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }
}

fn timestamp_to_utc(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).single().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_store_has_no_keys() {
        let store = FavoriteStore::open_in_memory(FavoriteKind::Popular).unwrap();
        assert!(store.keys().unwrap().is_empty());
        assert!(store.items().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_keys() {
        let store = FavoriteStore::open_in_memory(FavoriteKind::Popular).unwrap();
        store.save("1", r#"{"id":1}"#).unwrap();
        store.save("42", r#"{"id":42}"#).unwrap();

        let keys = store.keys().unwrap();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains("1"));
        assert!(keys.contains("42"));
    }

    #[test]
    fn test_save_overwrites_data() {
        let store = FavoriteStore::open_in_memory(FavoriteKind::Popular).unwrap();
        store.save("7", "old").unwrap();
        store.save("7", "new").unwrap();

        assert_eq!(store.keys().unwrap().len(), 1);
        assert_eq!(store.get("7").unwrap().unwrap().data, "new");
    }

    #[test]
    fn test_remove() {
        let store = FavoriteStore::open_in_memory(FavoriteKind::Popular).unwrap();
        store.save("42", "{}").unwrap();

        assert!(store.remove("42").unwrap());
        assert!(!store.keys().unwrap().contains("42"));
        // second remove is a no-op
        assert!(!store.remove("42").unwrap());
    }

    #[test]
    fn test_items_newest_first_not_by_key_text() {
        let store = FavoriteStore::open_in_memory(FavoriteKind::Popular).unwrap();
        store.save("10", "{}").unwrap();
        store.save("9", "{}").unwrap();

        let keys: Vec<_> = store.items().unwrap().into_iter().map(|i| i.key).collect();
        assert_eq!(keys, vec!["9", "10"]);
    }

    #[test]
    fn test_kinds_are_isolated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("favorites.db");

        let popular = FavoriteStore::open(&path, FavoriteKind::Popular).unwrap();
        popular.save("1", "{}").unwrap();

        let trending = FavoriteStore::open(&path, FavoriteKind::Trending).unwrap();
        assert!(trending.keys().unwrap().is_empty());
        assert!(trending.get("1").unwrap().is_none());
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("favorites.db");

        {
            let store = FavoriteStore::open(&path, FavoriteKind::Popular).unwrap();
            store.save("99", r#"{"id":99}"#).unwrap();
        }

        let store = FavoriteStore::open(&path, FavoriteKind::Popular).unwrap();
        let items = store.items().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].key, "99");
        assert_eq!(items[0].data, r#"{"id":99}"#);
    }
}
