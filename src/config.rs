use crate::utils::get_data_dir;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing and naming settings for the UI layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    /// How long a client notification stays on screen
    #[serde(default = "default_notification_timeout")]
    pub notification_timeout_ms: u64,
    /// Fade-out window at the end of a notification's lifetime
    #[serde(default = "default_notification_fade")]
    pub notification_fade_ms: u64,
    /// How long a server-rendered flash message stays on screen
    #[serde(default = "default_flash_timeout")]
    pub flash_timeout_ms: u64,
    #[serde(default = "default_flash_fade")]
    pub flash_fade_ms: u64,
    /// Quiet period before a typed search is applied
    #[serde(default = "default_search_debounce")]
    pub search_debounce_ms: u64,
    #[serde(default = "default_export_filename")]
    pub export_filename: String,
    /// Prefix for API endpoints; empty means same origin
    #[serde(default)]
    pub api_base_url: String,
    /// File name of the file-backed store inside the data directory
    #[serde(default = "default_storage_file")]
    pub storage_file: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            notification_timeout_ms: default_notification_timeout(),
            notification_fade_ms: default_notification_fade(),
            flash_timeout_ms: default_flash_timeout(),
            flash_fade_ms: default_flash_fade(),
            search_debounce_ms: default_search_debounce(),
            export_filename: default_export_filename(),
            api_base_url: String::new(),
            storage_file: default_storage_file(),
        }
    }
}

impl UiConfig {
    pub fn notification_timeout(&self) -> Duration {
        Duration::from_millis(self.notification_timeout_ms)
    }

    /// Fade never exceeds the lifetime it belongs to
    pub fn notification_fade(&self) -> Duration {
        Duration::from_millis(self.notification_fade_ms.min(self.notification_timeout_ms))
    }

    pub fn flash_timeout(&self) -> Duration {
        Duration::from_millis(self.flash_timeout_ms)
    }

    pub fn flash_fade(&self) -> Duration {
        Duration::from_millis(self.flash_fade_ms.min(self.flash_timeout_ms))
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

fn default_notification_timeout() -> u64 {
    5000
}

fn default_notification_fade() -> u64 {
    300
}

fn default_flash_timeout() -> u64 {
    5000
}

fn default_flash_fade() -> u64 {
    500
}

fn default_search_debounce() -> u64 {
    300
}

fn default_export_filename() -> String {
    "export.csv".to_string()
}

fn default_storage_file() -> String {
    "storage.json".to_string()
}

/// Saves the config to disk using an atomic write pattern.
/// 1. Writes to a temporary file.
/// 2. Sets restrictive permissions (0o600).
/// 3. Atomically renames to the target path.
///
/// # Async
/// Uses `tokio::fs` for non-blocking I/O to avoid blocking the event loop.
pub async fn save_config(config: &UiConfig) -> std::io::Result<()> {
    if let Some(path) = get_data_dir() {
        save_config_in(config, path).await?;
    }
    Ok(())
}

/// Writes `config.json` into `dir`, creating the directory if needed
pub async fn save_config_in(config: &UiConfig, dir: std::path::PathBuf) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    tokio::fs::create_dir_all(&dir).await?;

    let temp_path = dir.join("config.json.tmp");
    let path = dir.join("config.json");

    // Create file with restrictive permissions from the start
    #[cfg(unix)]
    {
        use tokio::fs::OpenOptions;
        use tokio::io::AsyncWriteExt;

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .mode(0o600)
            .open(&temp_path)
            .await?;

        file.write_all(json.as_bytes()).await?;
        file.sync_all().await?;
    }

    #[cfg(not(unix))]
    {
        use tokio::io::AsyncWriteExt;

        let mut file = tokio::fs::File::create(&temp_path).await?;
        file.write_all(json.as_bytes()).await?;
        file.sync_all().await?;
    }

    tokio::fs::rename(temp_path, path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::StorageFull {
            std::io::Error::new(
                std::io::ErrorKind::StorageFull,
                "Disk full: cannot save configuration. Free up space and try again.",
            )
        } else {
            e
        }
    })
}

/// Loads the config from disk, or returns default if not found.
pub async fn load_config() -> UiConfig {
    match get_data_dir() {
        Some(dir) => load_config_from(&dir).await,
        None => UiConfig::default(),
    }
}

/// Reads `config.json` from `dir`; missing or malformed files yield defaults
pub async fn load_config_from(dir: &std::path::Path) -> UiConfig {
    let path = dir.join("config.json");
    match tokio::fs::read_to_string(&path).await {
        Ok(json) => serde_json::from_str::<UiConfig>(&json).unwrap_or_else(|e| {
            tracing::warn!("Ignoring malformed {}: {}", path.display(), e);
            UiConfig::default()
        }),
        Err(_) => UiConfig::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = UiConfig::default();
        assert_eq!(config.notification_timeout(), Duration::from_millis(5000));
        assert_eq!(config.search_debounce(), Duration::from_millis(300));
        assert_eq!(config.export_filename, "export.csv");
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: UiConfig = serde_json::from_str(r#"{"search_debounce_ms": 150}"#).unwrap();
        assert_eq!(config.search_debounce_ms, 150);
        assert_eq!(config.flash_fade_ms, 500);
        assert_eq!(config.storage_file, "storage.json");
    }

    #[test]
    fn test_fade_clamped_to_timeout() {
        let config = UiConfig {
            notification_timeout_ms: 100,
            ..UiConfig::default()
        };
        assert_eq!(config.notification_fade(), Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let config = UiConfig {
            api_base_url: "http://inventory.local".to_string(),
            ..UiConfig::default()
        };
        save_config_in(&config, dir.path().to_path_buf()).await.unwrap();
        assert_eq!(load_config_from(dir.path()).await, config);
        assert!(!dir.path().join("config.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_malformed_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.json"), "{oops").unwrap();
        assert_eq!(load_config_from(dir.path()).await, UiConfig::default());
    }
}
