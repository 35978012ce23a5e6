//! Byte size formatting

/// Format a byte count into a human-readable string.
///
/// `None` means the size is not known to the sender.
pub fn format_size(bytes: Option<i64>) -> String {
    let Some(bytes) = bytes else {
        return "unknown size".to_string();
    };

    let mut value = bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if value.abs() < 1024.0 {
            return format!("{:.1} {}", value, unit);
        }
        value /= 1024.0;
    }
    format!("{:.1} TB", value)
}
