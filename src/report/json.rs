//! JSON output for scripting and piping.
//!
//! History is emitted in the same shape it is persisted in.

use crate::history::ScanRecord;
use crate::scan::ScanResult;

pub fn render(records: &[ScanRecord]) -> String {
    serde_json::to_string_pretty(records).unwrap_or_else(|_| String::from("[]"))
}

pub fn render_scan(result: &ScanResult) -> String {
    serde_json::to_string(result).unwrap_or_else(|_| String::from("{}"))
}
