//! Interactive session initialization
//!
//! One-time login flow: requests a login code, asks for it on the console
//! and handles the optional 2FA password. After this the session file makes
//! every other run non-interactive.

use std::io::{self, BufRead, Write};

use grammers_client::SignInError;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::session::{get_client_for_init, SessionLock};

pub async fn run() -> Result<()> {
    let config = Config::new();

    if !config.has_api_credentials() {
        println!("Ошибка: заполните api_id и api_hash в config.yml");
        println!("Образец настроек находится в config.yml.example");
        return Ok(());
    }

    let _lock = SessionLock::acquire()?;
    let client = get_client_for_init().await?;

    if client.is_authorized().await? {
        println!("Сессия уже активна, вход не требуется.");
        return Ok(());
    }

    let phone = if config.phone.is_empty() {
        prompt("Введите номер телефона (в международном формате): ")?
    } else {
        config.phone.clone()
    };

    let token = client
        .request_login_code(phone.trim(), &config.api_hash)
        .await
        .map_err(|e| Error::TelegramError(e.to_string()))?;

    let code = prompt("Введите код из Telegram: ")?;

    match client.sign_in(&token, code.trim()).await {
        Ok(_) => {}
        Err(SignInError::PasswordRequired(password_token)) => {
            let hint = password_token.hint().unwrap_or("нет");
            let password = prompt(&format!("Введите пароль 2FA (подсказка: {}): ", hint))?;
            client
                .check_password(password_token, password.trim())
                .await
                .map_err(|e| Error::TelegramError(e.to_string()))?;
        }
        Err(e) => return Err(Error::TelegramError(e.to_string())),
    }

    client.save()?;
    println!("Авторизация успешна. Сессия сохранена.");

    Ok(())
}

fn prompt(message: &str) -> Result<String> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(message.as_bytes())?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}
