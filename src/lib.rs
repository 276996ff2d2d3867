//! qrkeep: classify scanned QR payloads, compose new ones, and keep a
//! bounded local scan history.
//!
//! - [`payload`] classifier, encoders and draft composition
//! - [`history`] capped, deduplicating scan log and its filter
//! - [`store`] key/value blob backends the history persists into
//! - [`scan`] detection handling with the "already handling" guard
//! - [`export`] writing rendered QR images to disk
//! - [`clipboard`] copying payloads to the system clipboard

pub mod cli;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod export;
pub mod history;
pub mod payload;
pub mod report;
pub mod scan;
pub mod store;
#[cfg(feature = "tui")]
pub mod tui;
pub mod util;
