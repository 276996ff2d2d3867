//! Key/value blob storage.
//!
//! The history is persisted as a single string value under a fixed key.
//! Backends:
//! - sqlite: a `kv` table in qrkeep.db (default)
//! - file: one json file per key
//! - memory: process-local map, used by tests
//!
//! Every backend has an explicit open/close lifecycle; calls on a closed
//! store fail with `StoreError::Closed`.
//!
//! Several processes may share one backend. `update` is the only safe way to
//! read-modify-write a value: sqlite holds an IMMEDIATE transaction, the file
//! store holds a `<key>.lock` file, for the whole step.

pub mod file;
pub mod memory;
pub mod sqlite;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// What an `update` step does with the value it was handed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Update {
    Keep,
    Set(String),
    Remove,
}

pub trait BlobStore {
    fn open(&mut self) -> Result<(), StoreError>;
    fn close(&mut self) -> Result<(), StoreError>;
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;

    /// Read `key`, hand the current value to `f` and apply its answer,
    /// with no other writer able to touch `key` in between.
    fn update(
        &mut self,
        key: &str,
        f: &mut dyn FnMut(Option<String>) -> Update,
    ) -> Result<(), StoreError>;
}

impl<T: BlobStore + ?Sized> BlobStore for Box<T> {
    fn open(&mut self) -> Result<(), StoreError> {
        (**self).open()
    }

    fn close(&mut self) -> Result<(), StoreError> {
        (**self).close()
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }

    fn update(
        &mut self,
        key: &str,
        f: &mut dyn FnMut(Option<String>) -> Update,
    ) -> Result<(), StoreError> {
        (**self).update(key, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Sqlite,
    File,
}

/// Build an unopened backend rooted at `data_dir`.
pub fn backend_for(backend: Backend, data_dir: &Path) -> Box<dyn BlobStore> {
    match backend {
        Backend::Sqlite => Box::new(SqliteStore::new(data_dir.join("qrkeep.db"))),
        Backend::File => Box::new(FileStore::new(data_dir)),
    }
}
