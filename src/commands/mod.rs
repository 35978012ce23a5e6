//! Command implementations
//!
//! One module per top-level mode of the CLI.

pub mod download_videos;
pub mod init_session;
pub mod list_chats;

// Re-export commonly used types
pub use download_videos::{download_videos, DownloadOutcome, RunSummary};
