//! Terminal output for scan results and history listings.

pub mod json;
pub mod table;

use crate::history::ScanRecord;
use crate::scan::ScanResult;

pub fn print_history(records: &[ScanRecord], json_output: bool) {
    if json_output {
        println!("{}", json::render(records));
    } else {
        print!("{}", table::render(records));
    }
}

pub fn print_scan(result: &ScanResult, json_output: bool) {
    if json_output {
        println!("{}", json::render_scan(result));
    } else {
        print!("{}", table::render_scan(result));
    }
}
