//! Directory-backed blob store.
//!
//! Each key maps to `<dir>/<encoded key>.json`. ASCII letters, digits and
//! `-` are kept; every other byte becomes `_XX` (uppercase hex), so distinct
//! keys always land in distinct files. Writes go to a sibling `.tmp` file
//! first and are renamed into place so a crash mid-write never leaves a
//! truncated blob behind.
//!
//! Writers serialize on `<encoded key>.lock`, created exclusively and
//! removed when the write finishes. A lock older than `STALE_LOCK` is
//! assumed to belong to a crashed process and is broken.

use std::fmt::Write as _;
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use super::{BlobStore, Update};
use crate::error::StoreError;

const LOCK_TIMEOUT: Duration = Duration::from_secs(5);
const LOCK_RETRY: Duration = Duration::from_millis(5);
const STALE_LOCK: Duration = Duration::from_secs(30);

pub struct FileStore {
    dir: PathBuf,
    open: bool,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore {
            dir: dir.into(),
            open: false,
        }
    }

    fn encoded(key: &str) -> String {
        let mut name = String::with_capacity(key.len());
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' {
                name.push(char::from(byte));
            } else {
                let _ = write!(name, "_{byte:02X}");
            }
        }
        name
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", Self::encoded(key)))
    }

    fn lock_path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.lock", Self::encoded(key)))
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.open {
            Ok(())
        } else {
            Err(StoreError::Closed)
        }
    }

    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl BlobStore for FileStore {
    fn open(&mut self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        self.open = true;
        Ok(())
    }

    fn close(&mut self) -> Result<(), StoreError> {
        self.open = false;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.ensure_open()?;
        self.read(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.ensure_open()?;
        let _lock = KeyLock::acquire(self.lock_path_for(key))?;
        self.write(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.ensure_open()?;
        let _lock = KeyLock::acquire(self.lock_path_for(key))?;
        self.delete(key)
    }

    fn update(
        &mut self,
        key: &str,
        f: &mut dyn FnMut(Option<String>) -> Update,
    ) -> Result<(), StoreError> {
        self.ensure_open()?;
        let _lock = KeyLock::acquire(self.lock_path_for(key))?;
        match f(self.read(key)?) {
            Update::Keep => Ok(()),
            Update::Set(value) => self.write(key, &value),
            Update::Remove => self.delete(key),
        }
    }
}

/// Exclusive per-key lock file, removed on drop.
struct KeyLock {
    path: PathBuf,
}

impl KeyLock {
    fn acquire(path: PathBuf) -> Result<Self, StoreError> {
        let deadline = Instant::now() + LOCK_TIMEOUT;
        loop {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(_) => return Ok(KeyLock { path }),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    if is_stale(&path) {
                        tracing::warn!("breaking stale lock {}", path.display());
                        let _ = fs::remove_file(&path);
                        continue;
                    }
                    if Instant::now() >= deadline {
                        return Err(StoreError::Locked(path));
                    }
                    thread::sleep(LOCK_RETRY);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl Drop for KeyLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!("failed to release lock {}: {e}", self.path.display());
        }
    }
}

fn is_stale(path: &Path) -> bool {
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .ok()
        .and_then(|modified| modified.elapsed().ok())
        .is_some_and(|age| age > STALE_LOCK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_encoded_into_file_name() {
        let store = FileStore::new("/data");
        assert_eq!(store.path_for("@qr_history"), PathBuf::from("/data/_40qr_5Fhistory.json"));
        assert_eq!(store.path_for("../escape"), PathBuf::from("/data/_2E_2E_2Fescape.json"));
        assert_eq!(store.path_for("plain-key"), PathBuf::from("/data/plain-key.json"));
    }

    #[test]
    fn distinct_keys_never_share_a_file() {
        let store = FileStore::new("/data");
        let keys = ["@qr_history", "_qr_history", "_40qr_history", "a/b", "a_b", "a.b"];
        let mut paths: Vec<PathBuf> = keys.iter().map(|k| store.path_for(k)).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), keys.len());
    }

    #[test]
    fn colliding_sanitized_keys_keep_separate_values() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(tmp.path());
        store.open().unwrap();

        store.set("@qr_history", "at").unwrap();
        store.set("_qr_history", "underscore").unwrap();
        assert_eq!(store.get("@qr_history").unwrap().as_deref(), Some("at"));
        assert_eq!(store.get("_qr_history").unwrap().as_deref(), Some("underscore"));
    }

    #[test]
    fn set_get_remove() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(tmp.path().join("nested"));
        store.open().unwrap();

        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "[1,2]").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("[1,2]"));
        store.set("k", "[3]").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("[3]"));

        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn update_releases_its_lock() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(tmp.path());
        store.open().unwrap();

        store.update("k", &mut |_| Update::Set("v".into())).unwrap();
        assert!(!store.lock_path_for("k").exists());
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));

        store.update("k", &mut |_| Update::Remove).unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn held_lock_times_out() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(tmp.path());
        store.open().unwrap();

        let _held = KeyLock::acquire(store.lock_path_for("k")).unwrap();
        let err = store.set("k", "v").unwrap_err();
        assert!(matches!(err, StoreError::Locked(_)));
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn values_persist_across_instances() {
        let tmp = tempfile::tempdir().unwrap();
        let mut first = FileStore::new(tmp.path());
        first.open().unwrap();
        first.set("k", "v").unwrap();
        first.close().unwrap();

        let mut second = FileStore::new(tmp.path());
        second.open().unwrap();
        assert_eq!(second.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn closed_store_rejects_reads() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path());
        assert!(matches!(store.get("k"), Err(StoreError::Closed)));
    }
}
