//! Session management for the Telegram client
//!
//! Provides:
//! - File-based session locking to prevent parallel execution
//! - Session file validation
//! - Client creation with proper configuration

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use fs2::FileExt;
use grammers_client::client::updates::UpdatesLike;
use grammers_client::Client;
use grammers_mtsender::SenderPool;
use grammers_session::storages::SqliteSession;
use tokio::sync::mpsc;

use crate::config::{Config, LOCK_FILE, SESSION_NAME};
use crate::error::{Error, Result};

/// Session lock guard that ensures exclusive access to the Telegram session.
pub struct SessionLock {
    lock_file: Option<File>,
}

impl SessionLock {
    /// Acquire an exclusive lock on the session.
    pub fn acquire() -> Result<Self> {
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(LOCK_FILE)
            .map_err(|e| Error::LockError(format!("Failed to open lock file: {}", e)))?;

        match lock_file.try_lock_exclusive() {
            Ok(()) => Ok(Self {
                lock_file: Some(lock_file),
            }),
            Err(_) => {
                eprintln!(
                    r#"
⚠️  ОШИБКА: Telegram сессия уже используется другим процессом!

Telegram требует последовательного выполнения операций.
Параллельное использование одной сессии может привести к конфликтам и блокировкам.

Подождите, пока завершится другой процесс, и попробуйте снова.
"#
                );
                Err(Error::SessionLocked)
            }
        }
    }

    /// Release the lock manually
    pub fn release(&mut self) {
        if let Some(ref file) = self.lock_file {
            let _ = file.unlock();
        }
        self.lock_file = None;
        let _ = std::fs::remove_file(LOCK_FILE);
    }
}

impl Drop for SessionLock {
    fn drop(&mut self) {
        self.release();
    }
}

/// Check if the session file exists.
pub fn check_session_exists() -> Result<()> {
    let session_file = format!("{}.session", SESSION_NAME);

    if !Path::new(&session_file).exists() {
        eprintln!(
            r#"
⚠️  ОШИБКА: Session файл '{}' не найден!

Для создания session файла:
1. Запустите: cargo run --bin init_session
2. Введите код из Telegram
"#,
            session_file
        );
        return Err(Error::SessionNotFound(session_file));
    }

    Ok(())
}

/// Load an existing session from file.
pub fn load_session() -> Result<Arc<SqliteSession>> {
    let session_file = format!("{}.session", SESSION_NAME);
    let session = SqliteSession::open(&session_file)
        .map_err(|e| Error::SessionNotFound(format!("Failed to load session: {}", e)))?;
    Ok(Arc::new(session))
}

/// Create a new session (for init_session only).
pub fn create_session() -> Result<Arc<SqliteSession>> {
    let session_file = format!("{}.session", SESSION_NAME);
    let session = SqliteSession::open(&session_file)
        .map_err(|e| Error::SessionNotFound(format!("Failed to create session: {}", e)))?;
    Ok(Arc::new(session))
}

/// Holder for the connected Client and its background runner
pub struct TelegramClient {
    pub client: Client,
    session: Arc<SqliteSession>,
    // Kept alive so the pool's update channel stays open
    _updates: mpsc::UnboundedReceiver<UpdatesLike>,
    _runner_handle: tokio::task::JoinHandle<()>,
}

impl TelegramClient {
    /// Create a new TelegramClient from session
    pub async fn connect(session: Arc<SqliteSession>) -> Result<Self> {
        let config = Config::new();
        let pool = SenderPool::new(session.clone(), config.api_id);

        // Create client from pool (need reference to whole pool)
        let client = Client::new(&pool);

        // Get handle and runner after client is created
        let SenderPool {
            runner,
            updates,
            handle: _,
        } = pool;

        // Spawn the runner in background
        let runner_handle = tokio::spawn(async move {
            runner.run().await;
        });

        Ok(Self {
            client,
            session,
            _updates: updates,
            _runner_handle: runner_handle,
        })
    }

    /// Save the session to file
    pub fn save(&self) -> Result<()> {
        save_session(&self.session)
    }
}

// Implement Deref to allow using TelegramClient as &Client
impl std::ops::Deref for TelegramClient {
    type Target = Client;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

/// Save session - SqliteSession auto-saves, this is a no-op for compatibility
pub fn save_session(_session: &SqliteSession) -> Result<()> {
    // SqliteSession auto-saves to the database file
    Ok(())
}

/// Create and connect a Telegram client with an existing session.
pub async fn get_client() -> Result<TelegramClient> {
    check_session_exists()?;
    let session = load_session()?;
    TelegramClient::connect(session).await
}

/// Create a Telegram client for initialization (no session check).
pub async fn get_client_for_init() -> Result<TelegramClient> {
    let session = create_session()?;
    TelegramClient::connect(session).await
}
