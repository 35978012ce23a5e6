//! Configuration for the Telegram API and the download target
//!
//! Loads configuration from config.yml file.
//! Environment variables take precedence over ${VAR} placeholders.

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Default constants (fallback if config.yml not found)
pub const SESSION_NAME: &str = "tg_video_session";
pub const LOCK_FILE: &str = "tg_video_session.lock";
pub const DEFAULT_DOWNLOAD_DIR: &str = "downloads";

/// YAML config structures
#[derive(Debug, Deserialize)]
struct YamlConfig {
    telegram: Option<TelegramConfig>,
    download: Option<DownloadConfig>,
}

#[derive(Debug, Deserialize)]
struct TelegramConfig {
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    api_id: Option<String>,
    api_hash: Option<String>,
    phone: Option<String>,
    session_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DownloadConfig {
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    chat_id: Option<String>,
    dir: Option<String>,
}

/// Deserialize a value that can be either a string or a number
fn deserialize_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    let value: Option<serde_yaml::Value> = Option::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(serde_yaml::Value::String(s)) => Ok(Some(s)),
        Some(serde_yaml::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected string or number, got {:?}",
            other
        ))),
    }
}

/// Main configuration struct
#[derive(Debug, Clone)]
pub struct Config {
    pub phone: String,
    pub api_id: i32,
    pub api_hash: String,
    pub session_name: String,
    pub lock_file: String,
    pub chat_id: i64,
    pub download_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Load configuration from config.yml or use defaults
    /// Environment variables take precedence over config.yml values
    pub fn new() -> Self {
        Self::load_from_file("config.yml")
            .or_else(|_| Self::load_from_file("../config.yml"))
            .unwrap_or_else(|_| Self::defaults())
    }

    /// Resolve a value: prefer env var if config value looks like ${VAR}
    fn resolve_env_string(value: Option<String>, env_key: &str) -> String {
        if let Some(ref v) = value {
            if v.starts_with("${") && v.ends_with('}') {
                let var_name = &v[2..v.len() - 1];
                if let Ok(env_val) = std::env::var(var_name) {
                    return env_val;
                }
            }
        }
        // Also check explicit env_key as fallback
        if let Ok(env_val) = std::env::var(env_key) {
            return env_val;
        }
        value.unwrap_or_default()
    }

    /// Resolve an integer value from string config or env var
    fn resolve_env_i32(value: Option<String>, env_key: &str) -> i32 {
        if let Some(ref v) = value {
            if v.starts_with("${") && v.ends_with('}') {
                let var_name = &v[2..v.len() - 1];
                if let Ok(env_val) = std::env::var(var_name) {
                    if let Ok(parsed) = env_val.parse::<i32>() {
                        return parsed;
                    }
                }
            }
            // Try parsing directly if it's a number
            if let Ok(parsed) = v.parse::<i32>() {
                return parsed;
            }
        }
        // Fallback: check explicit env_key
        if let Ok(env_val) = std::env::var(env_key) {
            if let Ok(parsed) = env_val.parse::<i32>() {
                return parsed;
            }
        }
        0
    }

    /// Resolve an i64 value from string config or env var
    fn resolve_env_i64(value: Option<String>, env_key: &str) -> i64 {
        if let Some(ref v) = value {
            if v.starts_with("${") && v.ends_with('}') {
                let var_name = &v[2..v.len() - 1];
                if let Ok(env_val) = std::env::var(var_name) {
                    if let Ok(parsed) = env_val.parse::<i64>() {
                        return parsed;
                    }
                }
            }
            // Try parsing directly if it's a number
            if let Ok(parsed) = v.parse::<i64>() {
                return parsed;
            }
        }
        // Fallback: check explicit env_key
        if let Ok(env_val) = std::env::var(env_key) {
            if let Ok(parsed) = env_val.parse::<i64>() {
                return parsed;
            }
        }
        0
    }

    /// Load .env file into environment variables using dotenvy
    fn load_dotenv() {
        // Try to load from current directory first, then parent
        if dotenvy::dotenv().is_err() {
            let _ = dotenvy::from_filename("../.env");
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        // Load .env file first
        Self::load_dotenv();

        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let yaml: YamlConfig = serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;

        let telegram = yaml.telegram.unwrap_or(TelegramConfig {
            api_id: None,
            api_hash: None,
            phone: None,
            session_name: None,
        });

        let download = yaml.download.unwrap_or(DownloadConfig {
            chat_id: None,
            dir: None,
        });

        // Resolve values with env var precedence
        let api_id = Self::resolve_env_i32(telegram.api_id, "TELEGRAM_API_ID");
        let api_hash = Self::resolve_env_string(telegram.api_hash, "TELEGRAM_API_HASH");
        let phone = Self::resolve_env_string(telegram.phone, "TELEGRAM_PHONE");
        let chat_id = Self::resolve_env_i64(download.chat_id, "TELEGRAM_CHAT_ID");
        let download_dir = Self::resolve_env_string(download.dir, "DOWNLOAD_DIR");

        Ok(Self {
            phone,
            api_id,
            api_hash,
            session_name: telegram
                .session_name
                .unwrap_or_else(|| SESSION_NAME.to_string()),
            lock_file: LOCK_FILE.to_string(),
            chat_id,
            download_dir: if download_dir.is_empty() {
                DEFAULT_DOWNLOAD_DIR.to_string()
            } else {
                download_dir
            },
        })
    }

    /// Create config with empty defaults (fallback)
    /// User MUST provide config.yml with actual credentials
    fn defaults() -> Self {
        Self {
            phone: String::new(),
            api_id: 0,
            api_hash: String::new(),
            session_name: SESSION_NAME.to_string(),
            lock_file: LOCK_FILE.to_string(),
            chat_id: 0,
            download_dir: DEFAULT_DOWNLOAD_DIR.to_string(),
        }
    }

    /// Check that API credentials are filled in (needed for any mode)
    pub fn has_api_credentials(&self) -> bool {
        self.api_id != 0 && !self.api_hash.is_empty()
    }

    /// Check that the download target is fully configured
    pub fn has_download_target(&self) -> bool {
        self.has_api_credentials() && self.chat_id != 0 && !self.download_dir.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{LazyLock, Mutex};

    static ENV_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

    struct EnvGuard {
        key: String,
        original: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let original = std::env::var(key).ok();
            std::env::set_var(key, value);
            Self {
                key: key.to_string(),
                original,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.original {
                Some(value) => std::env::set_var(&self.key, value),
                None => std::env::remove_var(&self.key),
            }
        }
    }

    fn set_envs(vars: &[(&str, &str)]) -> Vec<EnvGuard> {
        vars.iter().map(|(k, v)| EnvGuard::set(k, v)).collect()
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(!config.session_name.is_empty());
        assert!(!config.lock_file.is_empty());
    }

    #[test]
    fn config_constants_values() {
        assert_eq!(SESSION_NAME, "tg_video_session");
        assert_eq!(LOCK_FILE, "tg_video_session.lock");
        assert_eq!(DEFAULT_DOWNLOAD_DIR, "downloads");
    }

    #[test]
    fn config_defaults_has_correct_values() {
        let config = Config::defaults();

        assert_eq!(config.session_name, SESSION_NAME);
        assert_eq!(config.lock_file, LOCK_FILE);
        assert_eq!(config.api_id, 0);
        assert!(config.api_hash.is_empty());
        assert_eq!(config.chat_id, 0);
        assert_eq!(config.download_dir, DEFAULT_DOWNLOAD_DIR);
    }

    #[test]
    fn defaults_do_not_pass_credential_checks() {
        let config = Config::defaults();

        assert!(!config.has_api_credentials());
        assert!(!config.has_download_target());
    }

    #[test]
    fn full_config_passes_credential_checks() {
        let mut config = Config::defaults();
        config.api_id = 12345;
        config.api_hash = "hash".to_string();
        config.chat_id = -1001234567890;

        assert!(config.has_api_credentials());
        assert!(config.has_download_target());
    }

    #[test]
    fn credentials_alone_are_not_a_download_target() {
        let mut config = Config::defaults();
        config.api_id = 12345;
        config.api_hash = "hash".to_string();

        assert!(config.has_api_credentials());
        assert!(!config.has_download_target());
    }

    #[test]
    fn test_load_from_yaml() {
        let _lock = ENV_LOCK.lock().unwrap();
        let yaml = r#"
telegram:
  api_id: 12345
  api_hash: "test_hash"
  phone: "+1234567890"

download:
  chat_id: -1001234567890
  dir: "videos"
"#;
        let temp_file = std::env::temp_dir().join("test_config_yaml.yml");
        std::fs::write(&temp_file, yaml).unwrap();

        let config = Config::load_from_file(&temp_file).unwrap();

        // Numeric YAML values always win over the environment
        assert_eq!(config.api_id, 12345);
        assert_eq!(config.chat_id, -1001234567890);

        std::fs::remove_file(temp_file).ok();
    }

    #[test]
    fn missing_download_section_uses_defaults() {
        let yaml = r#"
telegram:
  api_id: 111
  api_hash: "hash"
"#;
        let temp_file = std::env::temp_dir().join("test_config_no_download.yml");
        std::fs::write(&temp_file, yaml).unwrap();

        let config = Config::load_from_file(&temp_file).unwrap();

        assert_eq!(config.download_dir, DEFAULT_DOWNLOAD_DIR);

        std::fs::remove_file(temp_file).ok();
    }

    #[test]
    fn env_placeholders_are_resolved_from_environment() {
        let _lock = ENV_LOCK.lock().unwrap();
        let yaml = r#"
telegram:
  api_id: "${TELEGRAM_API_ID}"
  api_hash: "${TELEGRAM_API_HASH}"
  phone: "+should_be_overridden"
download:
  chat_id: "${TELEGRAM_CHAT_ID}"
  dir: "${DOWNLOAD_DIR}"
"#;
        let temp_file = std::env::temp_dir().join("config_env_override.yml");
        std::fs::write(&temp_file, yaml).unwrap();

        let _guards = set_envs(&[
            ("TELEGRAM_API_ID", "4242"),
            ("TELEGRAM_API_HASH", "hash_from_env"),
            ("TELEGRAM_PHONE", "+1999"),
            ("TELEGRAM_CHAT_ID", "-100777"),
            ("DOWNLOAD_DIR", "env_videos"),
        ]);

        let config = Config::load_from_file(&temp_file).unwrap();

        assert_eq!(config.api_id, 4242);
        assert_eq!(config.api_hash, "hash_from_env");
        assert_eq!(config.phone, "+1999");
        assert_eq!(config.chat_id, -100777);
        assert_eq!(config.download_dir, "env_videos");

        std::fs::remove_file(temp_file).ok();
    }

    #[test]
    fn env_does_not_override_numeric_yaml_values() {
        let _lock = ENV_LOCK.lock().unwrap();
        let yaml = r#"
telegram:
  api_id: 321
  phone: "from_yaml"
download:
  chat_id: 555
"#;
        let temp_file = std::env::temp_dir().join("config_numeric_priority.yml");
        std::fs::write(&temp_file, yaml).unwrap();

        let _guards = set_envs(&[
            ("TELEGRAM_API_ID", "9999"),
            ("TELEGRAM_PHONE", "+8888"),
            ("TELEGRAM_CHAT_ID", "111"),
        ]);

        let config = Config::load_from_file(&temp_file).unwrap();

        // Explicit numeric values from YAML take precedence over env vars,
        // while string values still get overridden by the environment.
        assert_eq!(config.api_id, 321);
        assert_eq!(config.chat_id, 555);
        assert_eq!(config.phone, "+8888");

        std::fs::remove_file(temp_file).ok();
    }

    #[test]
    fn custom_session_name_is_used() {
        let yaml = r#"
telegram:
  api_id: 111
  api_hash: "hash"
  session_name: "custom_session"
"#;
        let temp_file = std::env::temp_dir().join("config_session_name.yml");
        std::fs::write(&temp_file, yaml).unwrap();

        let config = Config::load_from_file(&temp_file).unwrap();

        assert_eq!(config.session_name, "custom_session");

        std::fs::remove_file(temp_file).ok();
    }

    #[test]
    fn load_from_file_fails_on_missing_file() {
        let result = Config::load_from_file("/nonexistent/path/config.yml");
        assert!(result.is_err());
    }

    #[test]
    fn load_from_file_fails_on_invalid_yaml() {
        let temp_file = std::env::temp_dir().join("config_invalid_yaml.yml");
        std::fs::write(&temp_file, "{ invalid yaml [").unwrap();

        let result = Config::load_from_file(&temp_file);
        assert!(result.is_err());

        std::fs::remove_file(temp_file).ok();
    }

    #[test]
    fn config_debug_trait() {
        let config = Config::defaults();
        let debug_str = format!("{:?}", config);

        assert!(debug_str.contains("Config"));
        assert!(debug_str.contains("session_name"));
    }

    #[test]
    fn config_clone() {
        let config = Config::defaults();
        let cloned = config.clone();

        assert_eq!(cloned.session_name, config.session_name);
        assert_eq!(cloned.download_dir, config.download_dir);
    }
}
