//! Key-value persistence surface.
//!
//! The clinic data is stored as whole JSON collections under fixed string
//! keys, mirroring browser local storage. Two backends:
//! - `SqliteKeyValueStore`: one row per key in `storage_entries`
//! - `MemoryKeyValueStore`: shared in-process map (tests, previews)

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection};

use super::sqlite::{open_database, open_memory_database};
use super::DatabaseError;

/// Synchronous get/set/remove by string key. Values are JSON text.
pub trait KeyValueStore {
    fn load(&self, key: &str) -> Result<Option<String>, DatabaseError>;
    fn save(&self, key: &str, value: &str) -> Result<(), DatabaseError>;
    fn remove(&self, key: &str) -> Result<(), DatabaseError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn load(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        (**self).save(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), DatabaseError> {
        (**self).remove(key)
    }
}

// ═══════════════════════════════════════════
// SQLite backend
// ═══════════════════════════════════════════

pub struct SqliteKeyValueStore {
    conn: Connection,
}

impl SqliteKeyValueStore {
    /// Open (or create) the database file and run migrations.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        Ok(Self {
            conn: open_database(path)?,
        })
    }

    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        Ok(Self {
            conn: open_memory_database()?,
        })
    }

    /// All stored keys, sorted.
    pub fn keys(&self) -> Result<Vec<String>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT key FROM storage_entries ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn load(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT value FROM storage_entries WHERE key = ?1")?;
        match stmt.query_row([key], |row| row.get::<_, String>(0)) {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DatabaseError::from(e)),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO storage_entries (key, value, updated_at)
             VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), DatabaseError> {
        self.conn.execute("DELETE FROM storage_entries WHERE key = ?1", [key])?;
        Ok(())
    }
}

// ═══════════════════════════════════════════
// In-memory backend
// ═══════════════════════════════════════════

/// Cloning shares the underlying map, so a second store built from a clone
/// sees everything the first one wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, DatabaseError> {
        let entries = self.entries.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        Ok(entries.len())
    }

    pub fn is_empty(&self) -> Result<bool, DatabaseError> {
        Ok(self.len()? == 0)
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn load(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let entries = self.entries.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        let mut entries = self.entries.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), DatabaseError> {
        let mut entries = self.entries.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        entries.remove(key);
        Ok(())
    }
}
