//! Deterministic output file names for downloaded videos
//!
//! The same message and index always produce the same name, which is what
//! makes the skip-if-exists check work across runs.

use std::sync::LazyLock;

use regex::Regex;

use crate::source::VideoMeta;

static NON_FILENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s\-]").expect("valid regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w]").expect("valid regex"));

/// Replace unsafe characters with underscores and collapse whitespace runs.
fn sanitize(name: &str) -> String {
    let cleaned = NON_FILENAME.replace_all(name, "_");
    WHITESPACE.replace_all(cleaned.trim(), "_").to_string()
}

/// Split a file name into base and extension, keeping the dot with the
/// extension. A leading-dot-only name counts as having no extension.
fn split_extension(name: &str) -> (&str, String) {
    match name.rsplit_once('.') {
        Some((base, ext)) if !base.is_empty() && !ext.is_empty() => {
            (base, format!(".{}", ext))
        }
        _ => (name, String::new()),
    }
}

/// Sanitize the extension body, keeping the leading dot.
fn sanitize_extension(ext: &str) -> String {
    match ext.strip_prefix('.') {
        Some(rest) => format!(".{}", NON_WORD.replace_all(rest, "_")),
        None => String::new(),
    }
}

/// Extensions for common video mime types; everything else falls back to mp4.
fn extension_for_mime(mime: Option<&str>) -> &'static str {
    match mime {
        Some("video/mp4") => ".mp4",
        Some("video/quicktime") => ".mov",
        Some("video/x-matroska") => ".mkv",
        Some("video/webm") => ".webm",
        Some("video/x-msvideo") => ".avi",
        _ => ".mp4",
    }
}

/// Build the file name for one video: `{date}_{index:04}_{name}{ext}`.
pub fn video_filename(meta: &VideoMeta, index: usize) -> String {
    let date = meta.date.format("%Y-%m-%d");

    if let Some(original) = meta.file_name.as_deref().filter(|n| !n.is_empty()) {
        let (base, ext) = split_extension(original);
        return format!(
            "{}_{:04}_{}{}",
            date,
            index,
            sanitize(base),
            sanitize_extension(&ext)
        );
    }

    format!(
        "{}_{:04}_video{}",
        date,
        index,
        extension_for_mime(meta.mime_type.as_deref())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn meta(file_name: Option<&str>, mime_type: Option<&str>) -> VideoMeta {
        VideoMeta {
            date: Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap(),
            caption: None,
            size: None,
            file_name: file_name.map(str::to_string),
            mime_type: mime_type.map(str::to_string),
        }
    }

    #[test]
    fn original_name_is_sanitized() {
        let name = video_filename(&meta(Some("My Clip!!.mov"), None), 7);
        assert_eq!(name, "2024-03-05_0007_My_Clip__.mov");
    }

    #[test]
    fn missing_name_uses_mime_extension() {
        let name = video_filename(&meta(None, Some("video/webm")), 1);
        assert_eq!(name, "2024-03-05_0001_video.webm");
    }

    #[test]
    fn unknown_mime_falls_back_to_mp4() {
        let name = video_filename(&meta(None, Some("video/x-unknown")), 2);
        assert_eq!(name, "2024-03-05_0002_video.mp4");

        let name = video_filename(&meta(None, None), 2);
        assert_eq!(name, "2024-03-05_0002_video.mp4");
    }

    #[test]
    fn mime_table_is_complete() {
        let cases = [
            ("video/mp4", ".mp4"),
            ("video/quicktime", ".mov"),
            ("video/x-matroska", ".mkv"),
            ("video/webm", ".webm"),
            ("video/x-msvideo", ".avi"),
        ];

        for (mime, ext) in cases {
            let name = video_filename(&meta(None, Some(mime)), 1);
            assert!(name.ends_with(ext), "{} should map to {}", mime, ext);
        }
    }

    #[test]
    fn empty_file_name_counts_as_absent() {
        let name = video_filename(&meta(Some(""), Some("video/webm")), 1);
        assert_eq!(name, "2024-03-05_0001_video.webm");
    }

    #[test]
    fn name_without_extension() {
        let name = video_filename(&meta(Some("holiday clip"), None), 3);
        assert_eq!(name, "2024-03-05_0003_holiday_clip");
    }

    #[test]
    fn multi_dot_name_keeps_last_extension() {
        let name = video_filename(&meta(Some("trip.day.1.mkv"), None), 4);
        assert_eq!(name, "2024-03-05_0004_trip_day_1.mkv");
    }

    #[test]
    fn unicode_names_survive() {
        let name = video_filename(&meta(Some("Отпуск 2024.mp4"), None), 12);
        assert_eq!(name, "2024-03-05_0012_Отпуск_2024.mp4");
    }

    #[test]
    fn path_separators_are_replaced() {
        let name = video_filename(&meta(Some("a/b\\c.m/v"), None), 1);
        assert!(!name.contains('/'));
        assert!(!name.contains('\\'));
    }

    #[test]
    fn index_is_zero_padded_but_never_truncated() {
        let m = meta(None, None);
        assert!(video_filename(&m, 1).contains("_0001_"));
        assert!(video_filename(&m, 42).contains("_0042_"));
        assert!(video_filename(&m, 9999).contains("_9999_"));
        assert!(video_filename(&m, 12345).contains("_12345_"));
    }

    #[test]
    fn same_input_same_output() {
        let m = meta(Some("Clip (final).mov"), None);
        let first = video_filename(&m, 7);
        let second = video_filename(&m, 7);
        assert_eq!(first, second);
    }
}
