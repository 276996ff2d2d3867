//! Plain text rendering.
//!
//! History is shown one row per record, most recent first:
//! ID, capture time, type tag and a single-line payload preview.

use crate::history::ScanRecord;
use crate::scan::ScanResult;
use crate::util::{format_timestamp, preview};

const PAYLOAD_WIDTH: usize = 48;

pub fn render(records: &[ScanRecord]) -> String {
    if records.is_empty() {
        return String::from("No scan history.\n");
    }

    let mut output = String::new();

    output.push_str(&format!("{:<15} {:<17} {:<6} {}\n", "ID", "Date", "Type", "Payload"));
    output.push_str(&"-".repeat(40 + PAYLOAD_WIDTH));
    output.push('\n');

    for record in records {
        output.push_str(&format!(
            "{:<15} {:<17} {:<6} {}\n",
            record.id,
            format_timestamp(record.captured_at),
            record.content_type.as_str(),
            preview(&record.payload, PAYLOAD_WIDTH)
        ));
    }

    output.push_str(&format!("\n{} entries\n", records.len()));
    output
}

pub fn render_scan(result: &ScanResult) -> String {
    let mut output = format!("[{}] {}\n{}\n", result.content_type, result.content_type.label(), result.payload);
    if result.can_open() {
        output.push_str("(opens in browser)\n");
    }
    output
}
