use std::collections::HashMap;

use super::{BlobStore, Update};
use crate::error::StoreError;

/// In-process blob store. Contents survive close/open, which lets tests
/// simulate a restart by closing the history and reopening the backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    open: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.open {
            Ok(())
        } else {
            Err(StoreError::Closed)
        }
    }
}

impl BlobStore for MemoryStore {
    fn open(&mut self) -> Result<(), StoreError> {
        self.open = true;
        Ok(())
    }

    fn close(&mut self) -> Result<(), StoreError> {
        self.open = false;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.ensure_open()?;
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.ensure_open()?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.ensure_open()?;
        self.entries.remove(key);
        Ok(())
    }

    fn update(
        &mut self,
        key: &str,
        f: &mut dyn FnMut(Option<String>) -> Update,
    ) -> Result<(), StoreError> {
        self.ensure_open()?;
        match f(self.entries.get(key).cloned()) {
            Update::Keep => {}
            Update::Set(value) => {
                self.entries.insert(key.to_string(), value);
            }
            Update::Remove => {
                self.entries.remove(key);
            }
        }
        Ok(())
    }
}
