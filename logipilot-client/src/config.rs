use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Client-side settings: server location plus engine timings.
///
/// Intervals are stored as milliseconds so the JSON file stays editable by
/// hand; engines consume them as [`Duration`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub server_url: String,
    pub alert_poll_interval_ms: u64,
    pub tracking_poll_interval_ms: u64,
    pub page_size: u32,
    pub toast_channel_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8000".to_string(),
            alert_poll_interval_ms: 15_000,
            tracking_poll_interval_ms: 10_000,
            page_size: logipilot_model::DEFAULT_PAGE_SIZE,
            toast_channel_capacity: 64,
        }
    }
}

impl ClientConfig {
    pub fn load() -> Self {
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("logipilot").join("config.json");
            return Self::load_from(&config_path);
        }
        Self::default()
    }

    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            if let Ok(content) = std::fs::read_to_string(path) {
                if let Ok(config) = serde_json::from_str(&content) {
                    return config;
                }
            }
        }
        Self::default()
    }

    pub fn save(&self) -> Result<(), std::io::Error> {
        if let Some(config_dir) = dirs::config_dir() {
            let app_dir = config_dir.join("logipilot");
            std::fs::create_dir_all(&app_dir)?;
            self.save_to(&app_dir.join("config.json"))?;
        }
        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn alert_poll_interval(&self) -> Duration {
        Duration::from_millis(self.alert_poll_interval_ms)
    }

    pub fn tracking_poll_interval(&self) -> Duration {
        Duration::from_millis(self.tracking_poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = ClientConfig::default();
        config.server_url = "https://logipilot.example.com".to_string();
        config.alert_poll_interval_ms = 5_000;
        config.save_to(&path).unwrap();

        let loaded = ClientConfig::load_from(&path);
        assert_eq!(loaded, config);
        assert_eq!(loaded.alert_poll_interval(), Duration::from_secs(5));
    }

    #[test]
    fn test_missing_or_corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert_eq!(ClientConfig::load_from(&missing), ClientConfig::default());

        let corrupt = dir.path().join("bad.json");
        std::fs::write(&corrupt, "{not json").unwrap();
        assert_eq!(ClientConfig::load_from(&corrupt), ClientConfig::default());
    }
}
