//! Telegram video downloader CLI - main entry point
//!
//! Without flags the tool downloads all videos from the configured chat;
//! with --list-chats it prints the available chats instead.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use telegram_video_downloader::session::get_client;
use telegram_video_downloader::{commands, Config, SessionLock};

#[derive(Parser)]
#[command(name = "telegram_video_downloader")]
#[command(about = "Скачивание видео из Telegram чата", long_about = None)]
#[command(version)]
struct Cli {
    /// Показать список всех чатов и их ID
    #[arg(long)]
    list_chats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for local development
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("telegram_video_downloader=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::new();

    if !config.has_api_credentials() {
        println!("Ошибка: заполните api_id и api_hash в config.yml");
        println!("Образец настроек находится в config.yml.example");
        return Ok(());
    }

    let _lock = SessionLock::acquire()?;
    let client = get_client().await?;
    println!("Авторизация успешна.");

    if cli.list_chats {
        commands::list_chats::run(&client).await?;
    } else {
        commands::download_videos::run(&client, &config).await?;
    }

    Ok(())
}
