use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::path::PathBuf;
use std::time::Duration;

use super::{BlobStore, Update};
use crate::error::StoreError;

/// How long a writer waits for another process's transaction to finish.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SELECT_VALUE: &str = "SELECT value FROM kv WHERE key = ?1";
const UPSERT_VALUE: &str = "INSERT INTO kv (key, value) VALUES (?1, ?2)
     ON CONFLICT(key) DO UPDATE SET value = excluded.value";
const DELETE_VALUE: &str = "DELETE FROM kv WHERE key = ?1";

fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )?;

    Ok(())
}

/// SQLite-backed blob store. Open once per command, reuse across all operations.
pub struct SqliteStore {
    path: PathBuf,
    conn: Option<Connection>,
}

impl SqliteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SqliteStore {
            path: path.into(),
            conn: None,
        }
    }

    fn conn(&self) -> Result<&Connection, StoreError> {
        self.conn.as_ref().ok_or(StoreError::Closed)
    }
}

impl BlobStore for SqliteStore {
    fn open(&mut self) -> Result<(), StoreError> {
        if self.conn.is_some() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        init_schema(&conn)?;
        self.conn = Some(conn);
        Ok(())
    }

    fn close(&mut self) -> Result<(), StoreError> {
        if let Some(conn) = self.conn.take() {
            conn.close().map_err(|(_, e)| e)?;
        }
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn()?
            .query_row(SELECT_VALUE, params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn()?.execute(UPSERT_VALUE, params![key, value])?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.conn()?.execute(DELETE_VALUE, params![key])?;
        Ok(())
    }

    fn update(
        &mut self,
        key: &str,
        f: &mut dyn FnMut(Option<String>) -> Update,
    ) -> Result<(), StoreError> {
        let conn = self.conn.as_mut().ok_or(StoreError::Closed)?;

        // IMMEDIATE takes the write lock before the read, so a second
        // process blocks here instead of reading a value we are replacing
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let current: Option<String> =
            tx.query_row(SELECT_VALUE, params![key], |row| row.get(0)).optional()?;

        match f(current) {
            Update::Keep => {}
            Update::Set(value) => {
                tx.execute(UPSERT_VALUE, params![key, value])?;
            }
            Update::Remove => {
                tx.execute(DELETE_VALUE, params![key])?;
            }
        }

        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_and_remove() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = SqliteStore::new(tmp.path().join("qrkeep.db"));
        store.open().unwrap();

        store.set("@qr_history", "[]").unwrap();
        store.set("@qr_history", "[1]").unwrap();
        assert_eq!(store.get("@qr_history").unwrap().as_deref(), Some("[1]"));

        store.remove("@qr_history").unwrap();
        assert_eq!(store.get("@qr_history").unwrap(), None);
    }

    #[test]
    fn update_applies_and_keeps() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = SqliteStore::new(tmp.path().join("qrkeep.db"));
        store.open().unwrap();

        store.update("k", &mut |current| {
            assert_eq!(current, None);
            Update::Set("a".into())
        })
        .unwrap();
        store.update("k", &mut |_| Update::Keep).unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("a"));

        store.update("k", &mut |_| Update::Remove).unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn update_on_closed_store_fails() {
        let mut store = SqliteStore::new("unused.db");
        assert!(matches!(store.update("k", &mut |_| Update::Keep), Err(StoreError::Closed)));
    }

    #[test]
    fn reopen_keeps_values() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("db").join("qrkeep.db");

        let mut store = SqliteStore::new(&path);
        store.open().unwrap();
        store.set("k", "v").unwrap();
        store.close().unwrap();
        assert!(matches!(store.get("k"), Err(StoreError::Closed)));

        store.open().unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}
