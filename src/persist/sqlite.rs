//! SQLite-backed key/value storage.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{Connection, OptionalExtension, params};

use super::{PersistResult, StorageBackend};

/// SQLite implementation of [`crate::persist::StorageBackend`].
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens or creates a SQLite key/value store at `path`.
    ///
    /// Enables WAL mode and sets `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>) -> PersistResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_connection(conn)
    }

    /// Opens an in-memory SQLite store.
    pub fn open_in_memory() -> PersistResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn)
    }

    fn init_connection(conn: Connection) -> PersistResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(Self { conn })
    }
}

impl StorageBackend for SqliteStorage {
    fn exists(&self, key: &str) -> PersistResult<bool> {
        let found: Option<i64> = self
            .conn
            .query_row("SELECT 1 FROM kv WHERE key = ?1", params![key], |row| row.get(0))
            .optional()?;
        Ok(found.is_some())
    }

    fn read(&self, key: &str) -> PersistResult<Option<Vec<u8>>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn write(&mut self, key: &str, bytes: &[u8]) -> PersistResult<()> {
        self.conn.execute(
            "INSERT INTO kv(key, value, updated_ms) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_ms = excluded.updated_ms",
            params![key, bytes, now_ms() as i64],
        )?;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> PersistResult<()> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_overwrites_value() {
        let mut storage = SqliteStorage::open_in_memory().expect("open");
        storage.write("k", b"one").expect("write");
        storage.write("k", b"two").expect("overwrite");
        assert_eq!(storage.read("k").expect("read"), Some(b"two".to_vec()));
        assert!(storage.exists("k").expect("exists"));

        storage.delete("k").expect("delete");
        storage.delete("k").expect("delete missing");
        assert_eq!(storage.read("k").expect("read"), None);
    }
}
