//! Error types for qrkeep.
//!
//! Persistence errors never reach callers of the history store, they are
//! logged and folded into an `Outcome`. Export and config errors are
//! surfaced to the user once.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("history blob could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("blob store is not open")]
    Closed,

    #[error("timed out waiting for lock {}", .0.display())]
    Locked(std::path::PathBuf),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("image buffer is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("image buffer is not a PNG")]
    NotPng,

    #[error("failed to write image: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not render QR image: {0}")]
    Render(String),
}

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("qrkeep was built without clipboard support")]
    Unsupported,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("could not determine {0} directory")]
    NoDirectory(&'static str),
}
