/// Local date and time for an epoch-milliseconds timestamp.
pub fn format_timestamp(ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Single-line preview of a payload: line breaks become spaces, long values
/// are cut with an ellipsis.
pub fn preview(s: &str, max_len: usize) -> String {
    let flat: String = s.chars().map(|c| if c == '\n' || c == '\r' { ' ' } else { c }).collect();
    if flat.chars().count() <= max_len {
        flat
    } else {
        let truncated: String = flat.chars().take(max_len.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}
