//! Shared utility functions.

/// Shorten user text for log lines.
///
/// Counts characters, not bytes, so multi-byte text is never split. Newlines
/// are flattened to keep one event per log line.
pub fn preview(s: &str, max_chars: usize) -> String {
    let flat: String = s
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    match flat.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &flat[..cut]),
        None => flat,
    }
}
