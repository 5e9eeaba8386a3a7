use std::fs;
use std::path::Path;

use chrono::format::{Item, StrftimeItems};
use serde::Deserialize;

use crate::common::DEFAULT_TIMESTAMP_FORMAT;

pub const DEFAULT_CONFIG_PATH: &str = "config/chat.json";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Tên điền sẵn cho hai ô đăng ký trên UI.
    pub participants: [String; 2],
    pub timestamp_format: String,
    pub channel_capacity: usize,
    pub window_title: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            participants: ["Alice".to_string(), "Bob".to_string()],
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            channel_capacity: 100,
            window_title: "Chat Registry".to_string(),
        }
    }
}

pub fn load_config(path: &str) -> AppConfig {
    let path = Path::new(path);
    let config = match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Failed to parse config file {}: {err}", path.display());
                AppConfig::default()
            }
        },
        Err(err) => {
            log::info!(
                "Config file {} not found ({err}); using defaults",
                path.display()
            );
            AppConfig::default()
        }
    };

    sanitize(config)
}

fn sanitize(mut config: AppConfig) -> AppConfig {
    let defaults = AppConfig::default();

    // A zero-capacity mpsc channel panics on creation
    if config.channel_capacity == 0 {
        log::warn!("channel_capacity must be positive; using default");
        config.channel_capacity = defaults.channel_capacity;
    }

    // chrono only reports a bad specifier while rendering, and `to_string` panics on it
    if !is_valid_timestamp_format(&config.timestamp_format) {
        log::warn!(
            "Invalid timestamp_format `{}`; using default",
            config.timestamp_format
        );
        config.timestamp_format = defaults.timestamp_format;
    }

    config
}

fn is_valid_timestamp_format(format: &str) -> bool {
    StrftimeItems::new(format).all(|item| !matches!(item, Item::Error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn write_temp(content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("chat-config-{}.json", Uuid::new_v4()));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn missing_file_uses_defaults() {
        let path = std::env::temp_dir().join(format!("missing-{}.json", Uuid::new_v4()));
        assert_eq!(load_config(path.to_str().unwrap()), AppConfig::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let path = write_temp(r#"{ "participants": ["Carol", "Dave"], "channel_capacity": 8 }"#);
        let config = load_config(path.to_str().unwrap());
        fs::remove_file(&path).ok();

        assert_eq!(config.participants, ["Carol".to_string(), "Dave".to_string()]);
        assert_eq!(config.channel_capacity, 8);
        assert_eq!(config.timestamp_format, DEFAULT_TIMESTAMP_FORMAT);
        assert_eq!(config.window_title, "Chat Registry");
    }

    #[test]
    fn malformed_file_uses_defaults() {
        let path = write_temp("{ not json");
        let config = load_config(path.to_str().unwrap());
        fs::remove_file(&path).ok();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn zero_capacity_is_replaced() {
        let path = write_temp(r#"{ "channel_capacity": 0, "window_title": "x" }"#);
        let config = load_config(path.to_str().unwrap());
        fs::remove_file(&path).ok();
        assert_eq!(config.channel_capacity, 100);
        assert_eq!(config.window_title, "x");
    }

    #[test]
    fn invalid_timestamp_format_is_replaced() {
        let path = write_temp(r#"{ "timestamp_format": "%Q", "channel_capacity": 8 }"#);
        let config = load_config(path.to_str().unwrap());
        fs::remove_file(&path).ok();
        assert_eq!(config.timestamp_format, DEFAULT_TIMESTAMP_FORMAT);
        assert_eq!(config.channel_capacity, 8);
    }

    #[test]
    fn custom_timestamp_format_is_kept() {
        let path = write_temp(r#"{ "timestamp_format": "%H:%M" }"#);
        let config = load_config(path.to_str().unwrap());
        fs::remove_file(&path).ok();
        assert_eq!(config.timestamp_format, "%H:%M");
    }

    #[test]
    fn rejects_unknown_specifiers() {
        assert!(is_valid_timestamp_format(DEFAULT_TIMESTAMP_FORMAT));
        assert!(is_valid_timestamp_format("plain text"));
        assert!(!is_valid_timestamp_format("%Q"));
    }
}
