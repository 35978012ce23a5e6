//! Bulk video download command
//!
//! Resolves the configured chat, enumerates its video messages oldest
//! first and downloads each one, skipping files that are already on disk.

use std::fs;
use std::path::{Path, PathBuf};

use grammers_client::Client;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::filename::video_filename;
use crate::format::format_size;
use crate::progress;
use crate::source::{TelegramSource, VideoMessage, VideoSource};

/// How many caption characters are shown on the item-start line.
const CAPTION_PREVIEW_CHARS: usize = 50;

/// Per-item result of the download loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Downloaded,
    Skipped,
    Failed(String),
}

/// Counters accumulated over one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub downloaded: usize,
    pub skipped: usize,
    pub errors: usize,
    pub output_dir: PathBuf,
}

impl RunSummary {
    fn new(output_dir: PathBuf) -> Self {
        Self {
            downloaded: 0,
            skipped: 0,
            errors: 0,
            output_dir,
        }
    }

    fn record(&mut self, outcome: &DownloadOutcome) {
        match outcome {
            DownloadOutcome::Downloaded => self.downloaded += 1,
            DownloadOutcome::Skipped => self.skipped += 1,
            DownloadOutcome::Failed(_) => self.errors += 1,
        }
    }
}

/// Check that everything the download needs is configured.
pub fn ensure_configured(config: &Config) -> Result<()> {
    if !config.has_download_target() {
        return Err(Error::ConfigInvalid(
            "api_id, api_hash and chat_id must be set".to_string(),
        ));
    }
    Ok(())
}

/// Run the full download flow against Telegram.
pub async fn run(client: &Client, config: &Config) -> Result<()> {
    if ensure_configured(config).is_err() {
        println!("Ошибка: заполните api_id, api_hash и chat_id в config.yml");
        println!("Образец настроек находится в config.yml.example");
        return Ok(());
    }

    let source = TelegramSource::new(client.clone());
    download_videos(&source, config.chat_id, Path::new(&config.download_dir)).await?;

    Ok(())
}

/// Download every video from the chat into `download_dir`.
///
/// Files already present are skipped; a failed download is cleaned up and
/// the loop continues with the next item.
pub async fn download_videos<S: VideoSource>(
    source: &S,
    chat_id: i64,
    download_dir: &Path,
) -> Result<RunSummary> {
    fs::create_dir_all(download_dir)?;
    let output_dir =
        fs::canonicalize(download_dir).unwrap_or_else(|_| download_dir.to_path_buf());
    let mut summary = RunSummary::new(output_dir);

    let chat = match source.resolve_chat(chat_id).await {
        Ok(chat) => chat,
        Err(err) => {
            println!("Ошибка: не удалось найти чат с ID {}: {}", chat_id, err);
            println!("Проверьте chat_id в config.yml. Используйте --list-chats чтобы увидеть доступные чаты.");
            return Ok(summary);
        }
    };

    println!("\nЧат: {}", source.chat_title(&chat));
    println!("Получаю список видео...\n");

    let mut videos = source.video_messages(&chat).await?;
    // The server yields newest first; download oldest first so that the
    // index embedded in each filename stays stable across runs.
    videos.reverse();

    let total = videos.len();
    if total == 0 {
        println!("В этом чате нет видео.");
        return Ok(summary);
    }

    println!("Найдено видео: {}\n", total);

    for (i, video) in videos.iter().enumerate() {
        let outcome = download_one(source, video, i + 1, total, download_dir).await;
        summary.record(&outcome);
    }

    println!("\n{}", "=".repeat(40));
    println!("Готово!");
    println!("  Скачано:   {}", summary.downloaded);
    println!("  Пропущено: {}", summary.skipped);
    if summary.errors > 0 {
        println!("  Ошибок:    {}", summary.errors);
    }
    println!("  Папка:     {}", summary.output_dir.display());

    Ok(summary)
}

async fn download_one<S: VideoSource>(
    source: &S,
    video: &VideoMessage<S::Media>,
    index: usize,
    total: usize,
    download_dir: &Path,
) -> DownloadOutcome {
    let filename = video_filename(&video.meta, index);
    let filepath = download_dir.join(&filename);

    if filepath.exists() {
        println!("[{}/{}] Пропуск (уже скачано): {}", index, total, filename);
        return DownloadOutcome::Skipped;
    }

    let size_str = video
        .meta
        .size
        .map(|size| format!(" ({})", format_size(Some(size))))
        .unwrap_or_default();
    let caption_str = video
        .meta
        .caption
        .as_deref()
        .map(|caption| format!(" -- \"{}\"", caption_preview(caption)))
        .unwrap_or_default();

    println!(
        "[{}/{}] Скачиваю: {}{}{}",
        index, total, filename, size_str, caption_str
    );

    let mut on_progress = |current: u64, total: u64| progress::report(current, total);

    match source.download(&video.media, &filepath, &mut on_progress).await {
        Ok(()) => {
            println!(); // newline after the progress bar
            DownloadOutcome::Downloaded
        }
        Err(err) => {
            println!("\n  Ошибка при скачивании: {}", err);
            // Remove partial file if it exists; cleanup failure is ignored
            if filepath.exists() {
                let _ = fs::remove_file(&filepath);
            }
            DownloadOutcome::Failed(err.to_string())
        }
    }
}

/// First 50 characters of the caption, with an ellipsis when truncated.
fn caption_preview(caption: &str) -> String {
    let preview: String = caption.chars().take(CAPTION_PREVIEW_CHARS).collect();
    if caption.chars().count() > CAPTION_PREVIEW_CHARS {
        format!("{}...", preview)
    } else {
        preview
    }
}
