//! Scan handling.
//!
//! A `ScanSession` receives barcode detections from the camera collaborator,
//! classifies the decoded text, records it in history and holds the result
//! until it is dismissed. Detections arriving while a result is shown are
//! ignored.

use std::io::BufRead;

use serde::Serialize;

use crate::history::{HistoryStore, Outcome};
use crate::payload::{classify, ContentType};
use crate::store::BlobStore;

/// One detection from the barcode source. Only `text` is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarcodeEvent {
    pub text: String,
    pub symbology: String,
}

impl BarcodeEvent {
    pub fn qr(text: impl Into<String>) -> Self {
        BarcodeEvent {
            text: text.into(),
            symbology: "qr".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    #[serde(rename = "type")]
    pub content_type: ContentType,
    #[serde(rename = "data")]
    pub payload: String,
    /// False when history was skipped, the scan repeated the latest entry,
    /// or the write failed.
    pub recorded: bool,
}

impl ScanResult {
    pub fn can_open(&self) -> bool {
        self.content_type.can_open()
    }
}

pub struct ScanSession {
    handling: bool,
    record_history: bool,
}

impl ScanSession {
    pub fn new(record_history: bool) -> Self {
        ScanSession {
            handling: false,
            record_history,
        }
    }

    pub fn is_handling(&self) -> bool {
        self.handling
    }

    /// Classify and record a detection. Returns `None` while a previous
    /// result has not been dismissed.
    pub fn on_barcode<S: BlobStore>(
        &mut self,
        event: BarcodeEvent,
        history: &mut HistoryStore<S>,
    ) -> Option<ScanResult> {
        if self.handling {
            tracing::trace!("ignoring detection while a result is shown");
            return None;
        }
        self.handling = true;

        let content_type = classify(&event.text);
        tracing::debug!(symbology = %event.symbology, %content_type, "barcode scanned");

        let recorded = self.record_history
            && matches!(history.append(&event.text, content_type), Outcome::Appended(_));

        Some(ScanResult {
            content_type,
            payload: event.text,
            recorded,
        })
    }

    /// Close the current result and accept detections again.
    pub fn dismiss(&mut self) {
        self.handling = false;
    }
}

/// Newline-separated detections from a piped decoder, one per line.
///
/// Blank lines are skipped and a trailing `\r` is dropped. A line that is not
/// valid UTF-8 is kept with the bad bytes replaced, so one garbled decode does
/// not end the stream. A read error does end it.
pub fn read_detections<R: BufRead>(reader: R) -> impl Iterator<Item = String> {
    reader
        .split(b'\n')
        .map_while(|line| match line {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::warn!("stopped reading detections: {e}");
                None
            }
        })
        .filter_map(|bytes| {
            let mut text = match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("detection is not valid UTF-8, replacing invalid bytes");
                    String::from_utf8_lossy(e.as_bytes()).into_owned()
                }
            };
            if text.ends_with('\r') {
                text.pop();
            }
            (!text.trim().is_empty()).then_some(text)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn history() -> HistoryStore<MemoryStore> {
        HistoryStore::open(MemoryStore::new()).unwrap()
    }

    #[test]
    fn scan_is_classified_and_recorded() {
        let mut history = history();
        let mut session = ScanSession::new(true);

        let result = session
            .on_barcode(BarcodeEvent::qr("https://example.com"), &mut history)
            .unwrap();

        assert_eq!(result.content_type, ContentType::Url);
        assert!(result.recorded);
        assert!(result.can_open());
        assert_eq!(history.list()[0].payload, "https://example.com");
    }

    #[test]
    fn detections_ignored_until_dismissed() {
        let mut history = history();
        let mut session = ScanSession::new(true);

        assert!(session.on_barcode(BarcodeEvent::qr("first"), &mut history).is_some());
        assert!(session.is_handling());
        assert!(session.on_barcode(BarcodeEvent::qr("second"), &mut history).is_none());
        assert_eq!(history.list().len(), 1);

        session.dismiss();
        assert!(session.on_barcode(BarcodeEvent::qr("second"), &mut history).is_some());
        assert_eq!(history.list().len(), 2);
    }

    #[test]
    fn repeat_scan_is_shown_but_not_recorded() {
        let mut history = history();
        let mut session = ScanSession::new(true);

        session.on_barcode(BarcodeEvent::qr("tel:123"), &mut history);
        session.dismiss();
        let again = session.on_barcode(BarcodeEvent::qr("tel:123"), &mut history).unwrap();

        assert_eq!(again.content_type, ContentType::Phone);
        assert!(!again.recorded);
        assert_eq!(history.list().len(), 1);
    }

    #[test]
    fn history_can_be_skipped() {
        let mut history = history();
        let mut session = ScanSession::new(false);

        let result = session.on_barcode(BarcodeEvent::qr("hello"), &mut history).unwrap();
        assert!(!result.recorded);
        assert!(history.list().is_empty());
    }

    #[test]
    fn invalid_utf8_line_does_not_end_the_stream() {
        let input: &[u8] = b"first\n\xff\xfe bad\nthird\n";
        let lines: Vec<String> = read_detections(input).collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "first");
        assert!(lines[1].contains('\u{FFFD}'));
        assert!(lines[1].ends_with(" bad"));
        assert_eq!(lines[2], "third");
    }

    #[test]
    fn blank_lines_and_carriage_returns_are_dropped() {
        let input: &[u8] = b"a\r\n\r\n  \n\nb";
        let lines: Vec<String> = read_detections(input).collect();
        assert_eq!(lines, vec!["a", "b"]);
    }

    #[test]
    fn read_error_ends_the_stream() {
        struct Broken;
        impl std::io::Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone"))
            }
        }

        let reader = std::io::BufReader::new(std::io::Read::chain(&b"kept\n"[..], Broken));
        let lines: Vec<String> = read_detections(reader).collect();
        assert_eq!(lines, vec!["kept"]);
    }
}
