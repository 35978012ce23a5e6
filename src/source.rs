//! Video source port and its Telegram implementation
//!
//! The download orchestrator only talks to the `VideoSource` trait; the
//! production implementation wraps the grammers client, tests substitute
//! a mock.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use grammers_client::types::media::{Document, Media};
use grammers_client::types::peer::Peer;
use grammers_client::types::Message;
use grammers_client::Client;

use crate::chat::{peer_title, resolve_by_id};
use crate::error::{Error, Result};

/// Callback invoked with (received, total) bytes as a download advances.
pub type ProgressFn<'a> = &'a mut (dyn FnMut(u64, u64) + Send);

/// Transport-independent description of one video message.
#[derive(Debug, Clone)]
pub struct VideoMeta {
    /// When the message was sent.
    pub date: DateTime<Utc>,
    /// Message text accompanying the video, if any.
    pub caption: Option<String>,
    /// Attachment size in bytes, if the sender reported one.
    pub size: Option<i64>,
    /// Original file name attribute, if present.
    pub file_name: Option<String>,
    /// Attachment mime type, if present.
    pub mime_type: Option<String>,
}

/// One video message: its metadata plus the transport handle needed to
/// start the download.
#[derive(Debug, Clone)]
pub struct VideoMessage<M> {
    pub meta: VideoMeta,
    pub media: M,
}

/// Capability interface over the messaging collaborator.
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Resolved chat handle.
    type Chat: Send + Sync;
    /// Per-message media handle used to start a download.
    type Media: Clone + Send + Sync;

    /// Resolve the target chat by its numeric ID.
    async fn resolve_chat(&self, chat_id: i64) -> Result<Self::Chat>;

    /// Display name of a resolved chat.
    fn chat_title(&self, chat: &Self::Chat) -> String;

    /// Collect every video message of the chat, newest first.
    async fn video_messages(&self, chat: &Self::Chat) -> Result<Vec<VideoMessage<Self::Media>>>;

    /// Download one video into `dest`, reporting progress as bytes arrive.
    ///
    /// Progress calls carry monotonically non-decreasing `current`; on
    /// success the final call has `current == total`.
    async fn download(
        &self,
        media: &Self::Media,
        dest: &Path,
        progress: ProgressFn<'_>,
    ) -> Result<()>;
}

/// Telegram-backed video source.
pub struct TelegramSource {
    client: Client,
}

impl TelegramSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn is_video(document: &Document) -> bool {
    document
        .mime_type()
        .map(|mime| mime.starts_with("video/"))
        .unwrap_or(false)
}

fn video_meta(message: &Message, document: &Document) -> VideoMeta {
    let text = message.text();
    let name = document.name();

    VideoMeta {
        date: message.date(),
        caption: (!text.is_empty()).then(|| text.to_string()),
        size: (document.size() > 0).then(|| document.size()),
        file_name: (!name.is_empty()).then(|| name.to_string()),
        mime_type: document.mime_type().map(|mime| mime.to_string()),
    }
}

#[async_trait]
impl VideoSource for TelegramSource {
    type Chat = Peer;
    type Media = Media;

    async fn resolve_chat(&self, chat_id: i64) -> Result<Peer> {
        resolve_by_id(&self.client, chat_id).await
    }

    fn chat_title(&self, chat: &Peer) -> String {
        peer_title(chat)
    }

    async fn video_messages(&self, chat: &Peer) -> Result<Vec<VideoMessage<Media>>> {
        let mut videos = Vec::new();
        let mut messages = self.client.iter_messages(chat);

        while let Some(message) = messages.next().await? {
            if let Some(Media::Document(document)) = message.media() {
                if is_video(&document) {
                    videos.push(VideoMessage {
                        meta: video_meta(&message, &document),
                        media: Media::Document(document),
                    });
                }
            }
        }

        tracing::info!("Collected {} video messages", videos.len());
        Ok(videos)
    }

    async fn download(
        &self,
        media: &Media,
        dest: &Path,
        progress: ProgressFn<'_>,
    ) -> Result<()> {
        let total = match media {
            Media::Document(document) => document.size().max(0) as u64,
            _ => 0,
        };

        tracing::debug!("Downloading {} bytes to {}", total, dest.display());

        let mut file = File::create(dest)?;
        let mut received: u64 = 0;
        let mut chunks = self.client.iter_download(media);

        while let Some(chunk) = chunks
            .next()
            .await
            .map_err(|e| Error::DownloadFailed(e.to_string()))?
        {
            file.write_all(&chunk)?;
            received += chunk.len() as u64;
            if total > 0 {
                progress(received.min(total), total);
            }
        }

        Ok(())
    }
}
