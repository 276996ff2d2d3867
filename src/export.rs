//! Image export.
//!
//! The QR renderer hands over a base64 PNG buffer (optionally as a data
//! URI). Export decodes it and writes `qr_code_<ms>.png` into the target
//! directory. Failures are reported once; nothing is retried.

use std::fs;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::ExportError;

const DATA_URI_PREFIX: &str = "data:image/png;base64,";
const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

/// Renders a payload into a base64 encoded PNG.
pub trait QrRenderer {
    fn render_png_base64(&self, payload: &str) -> Result<String, ExportError>;
}

/// Decode a base64 PNG buffer into raw bytes.
pub fn decode_png(buffer: &str) -> Result<Vec<u8>, ExportError> {
    let encoded = buffer.trim();
    let encoded = encoded.strip_prefix(DATA_URI_PREFIX).unwrap_or(encoded);
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    let bytes = STANDARD.decode(compact)?;
    if !bytes.starts_with(&PNG_SIGNATURE) {
        return Err(ExportError::NotPng);
    }
    Ok(bytes)
}

pub fn file_name(timestamp_ms: i64) -> String {
    format!("qr_code_{timestamp_ms}.png")
}

/// Write a base64 PNG buffer into `dir`, returning the written path.
pub fn save_png(buffer: &str, dir: &Path) -> Result<PathBuf, ExportError> {
    let bytes = decode_png(buffer)?;

    fs::create_dir_all(dir)?;
    let path = dir.join(file_name(chrono::Utc::now().timestamp_millis()));
    fs::write(&path, bytes)?;

    tracing::info!("exported QR image to {}", path.display());
    Ok(path)
}

/// Render `payload` and save the resulting image.
pub fn export_payload<R: QrRenderer + ?Sized>(
    renderer: &R,
    payload: &str,
    dir: &Path,
) -> Result<PathBuf, ExportError> {
    let buffer = renderer.render_png_base64(payload)?;
    save_png(&buffer, dir)
}
