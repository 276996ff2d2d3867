//! Scan history.
//!
//! A capped, most-recent-first log of scan records persisted as one JSON
//! array under `HISTORY_KEY`. Invariants:
//! - new records are always prepended, nothing is re-sorted
//! - at most `MAX_HISTORY` records, the oldest are evicted
//! - a payload equal to the current head is not appended again
//!
//! The store never returns an error to its callers. Reads that fail yield
//! an empty history and writes that fail leave it unchanged; both are logged
//! and reported through `Outcome`.

pub mod filter;
pub mod record;

use crate::error::StoreError;
use crate::payload::ContentType;
use crate::store::{BlobStore, Update};

pub use filter::filter;
pub use record::ScanRecord;

pub const HISTORY_KEY: &str = "@qr_history";
pub const MAX_HISTORY: usize = 100;

/// Effect of a mutating history operation.
#[derive(Debug)]
pub enum Outcome {
    Appended(ScanRecord),
    /// Payload matched the most recent record, nothing written.
    Duplicate,
    Deleted,
    NotFound,
    Cleared,
    Failed(StoreError),
}

impl Outcome {
    /// True when the persisted history changed.
    pub fn changed(&self) -> bool {
        matches!(self, Outcome::Appended(_) | Outcome::Deleted | Outcome::Cleared)
    }
}

pub struct HistoryStore<S: BlobStore> {
    backend: S,
}

impl<S: BlobStore> HistoryStore<S> {
    pub fn open(mut backend: S) -> Result<Self, StoreError> {
        backend.open()?;
        Ok(HistoryStore { backend })
    }

    /// Close the backend and hand it back.
    pub fn close(mut self) -> S {
        if let Err(e) = self.backend.close() {
            tracing::warn!("failed to close history store: {e}");
        }
        self.backend
    }

    /// All records, most recent first. Empty on any read or decode failure.
    pub fn list(&self) -> Vec<ScanRecord> {
        match self.load() {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("failed to load history, treating as empty: {e}");
                Vec::new()
            }
        }
    }

    /// Prepend a record for `payload` unless it repeats the current head.
    ///
    /// The read, dedup check, cap and write happen inside one backend
    /// `update`, so concurrent writers on the same store never drop each
    /// other's records.
    pub fn append(&mut self, payload: &str, content_type: ContentType) -> Outcome {
        let mut outcome = Outcome::Duplicate;

        let result = self.backend.update(HISTORY_KEY, &mut |current| {
            let mut records = decode_or_empty(current.as_deref());

            if records.first().is_some_and(|head| head.payload == payload) {
                outcome = Outcome::Duplicate;
                return Update::Keep;
            }

            let record = ScanRecord::new(payload, content_type);
            records.insert(0, record.clone());
            records.truncate(MAX_HISTORY);

            match serde_json::to_string(&records) {
                Ok(blob) => {
                    outcome = Outcome::Appended(record);
                    Update::Set(blob)
                }
                Err(e) => {
                    outcome = Outcome::Failed(e.into());
                    Update::Keep
                }
            }
        });

        match (result, outcome) {
            (Err(e), _) | (Ok(()), Outcome::Failed(e)) => {
                tracing::error!("failed to save scan: {e}");
                Outcome::Failed(e)
            }
            (Ok(()), Outcome::Duplicate) => {
                tracing::debug!("skipping duplicate of most recent scan");
                Outcome::Duplicate
            }
            (Ok(()), outcome) => {
                if let Outcome::Appended(record) = &outcome {
                    tracing::debug!(id = %record.id, content_type = %record.content_type, "scan saved");
                }
                outcome
            }
        }
    }

    pub fn delete_by_id(&mut self, id: &str) -> Outcome {
        let mut outcome = Outcome::NotFound;

        let result = self.backend.update(HISTORY_KEY, &mut |current| {
            let mut records = decode_or_empty(current.as_deref());

            let Some(index) = records.iter().position(|r| r.id == id) else {
                outcome = Outcome::NotFound;
                return Update::Keep;
            };
            records.remove(index);

            match serde_json::to_string(&records) {
                Ok(blob) => {
                    outcome = Outcome::Deleted;
                    Update::Set(blob)
                }
                Err(e) => {
                    outcome = Outcome::Failed(e.into());
                    Update::Keep
                }
            }
        });

        match (result, outcome) {
            (Err(e), _) | (Ok(()), Outcome::Failed(e)) => {
                tracing::error!("failed to delete history item {id}: {e}");
                Outcome::Failed(e)
            }
            (Ok(()), outcome) => outcome,
        }
    }

    pub fn clear(&mut self) -> Outcome {
        match self.backend.remove(HISTORY_KEY) {
            Ok(()) => Outcome::Cleared,
            Err(e) => {
                tracing::error!("failed to clear history: {e}");
                Outcome::Failed(e)
            }
        }
    }

    fn load(&self) -> Result<Vec<ScanRecord>, StoreError> {
        match self.backend.get(HISTORY_KEY)? {
            Some(blob) => decode(&blob),
            None => Ok(Vec::new()),
        }
    }
}

fn decode(blob: &str) -> Result<Vec<ScanRecord>, StoreError> {
    let mut records: Vec<ScanRecord> = serde_json::from_str(blob)?;
    for record in &mut records {
        record.fill_missing_id();
    }
    Ok(records)
}

/// Decode inside a read-modify-write. A corrupt blob counts as empty and is
/// replaced by the write that follows.
fn decode_or_empty(blob: Option<&str>) -> Vec<ScanRecord> {
    match blob.map(decode).transpose() {
        Ok(records) => records.unwrap_or_default(),
        Err(e) => {
            tracing::warn!("failed to load history, treating as empty: {e}");
            Vec::new()
        }
    }
}
