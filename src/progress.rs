//! Console progress bar for a single download

use std::io::{self, Write};

use crate::format::format_size;

const BAR_WIDTH: u64 = 30;

/// Render the progress line for `current` of `total` bytes.
///
/// `total` must be positive; callers guarantee this before reporting.
fn render(current: u64, total: u64) -> String {
    let percent = current as f64 / total as f64 * 100.0;
    let filled = (BAR_WIDTH * current / total).min(BAR_WIDTH) as usize;
    let bar = format!(
        "{}{}",
        "=".repeat(filled),
        "-".repeat(BAR_WIDTH as usize - filled)
    );

    format!(
        "  [{}] {:.1}% ({}/{})",
        bar,
        percent,
        format_size(Some(current as i64)),
        format_size(Some(total as i64))
    )
}

/// Overwrite the current console line with the progress bar.
///
/// No newline is emitted; the caller prints one once the item finishes.
pub fn report(current: u64, total: u64) {
    print!("\r{}", render(current, total));
    let _ = io::stdout().flush();
}
