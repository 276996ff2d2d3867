use std::sync::atomic::{AtomicI64, Ordering};

use serde::{Deserialize, Serialize};

use crate::payload::ContentType;

/// One classified scan. Field names on disk are `id`, `type`, `data` and
/// `timestamp` (epoch milliseconds).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRecord {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub content_type: ContentType,
    #[serde(rename = "data")]
    pub payload: String,
    #[serde(rename = "timestamp", default)]
    pub captured_at: i64,
}

impl ScanRecord {
    /// Create a record stamped with the current time and a fresh id.
    pub fn new(payload: impl Into<String>, content_type: ContentType) -> Self {
        let captured_at = chrono::Utc::now().timestamp_millis();
        ScanRecord {
            id: next_id(captured_at).to_string(),
            content_type,
            payload: payload.into(),
            captured_at,
        }
    }

    /// Older blobs may lack an id; fall back to the capture time.
    pub(crate) fn fill_missing_id(&mut self) {
        if self.id.is_empty() {
            self.id = self.captured_at.to_string();
        }
    }
}

static LAST_ID: AtomicI64 = AtomicI64::new(0);

/// Millisecond clock value, bumped past the last issued id when the clock
/// has not advanced (or went backwards).
fn next_id(now_ms: i64) -> i64 {
    let mut last = LAST_ID.load(Ordering::Relaxed);
    loop {
        let id = now_ms.max(last + 1);
        match LAST_ID.compare_exchange_weak(last, id, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return id,
            Err(actual) => last = actual,
        }
    }
}
