use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the task service, fixed at startup.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default)]
    pub console: bool,

    /// If true, log to a file under `directory` (or the data dir if unset).
    #[serde(default = "default_logging_file")]
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "evaldash_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_file() -> bool {
    true
}

fn default_logging_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: false,
            file: default_logging_file(),
            level: default_logging_level(),
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Seconds between task-list polls while the task view is active.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Milliseconds between TUI redraw ticks.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_tick_ms() -> u64 {
    250
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            tick_ms: default_tick_ms(),
        }
    }
}

/// Default evaldash data directory: ~/.evaldash
pub fn data_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(PathBuf::from(home).join(".evaldash"))
}

/// Load configuration: ~/.evaldash/config.toml, then ./config.toml, then
/// built-in defaults, with environment overrides on top.
pub fn load_default() -> anyhow::Result<AppConfig> {
    let home_config = data_dir()?.join("config.toml");
    let local_config = Path::new("config.toml");

    let mut cfg: AppConfig = if home_config.exists() {
        let s = std::fs::read_to_string(&home_config)?;
        toml::from_str::<AppConfig>(&s)?
    } else if local_config.exists() {
        let s = std::fs::read_to_string(local_config)?;
        toml::from_str::<AppConfig>(&s)?
    } else {
        AppConfig::default()
    };

    if cfg
        .logging
        .directory
        .as_ref()
        .map(|s| s.trim().is_empty())
        .unwrap_or(true)
    {
        let logs_dir = data_dir()?.join("logs");
        cfg.logging.directory = Some(logs_dir.to_string_lossy().to_string());
    }

    if let Ok(v) = std::env::var("EVALDASH_SERVER_URL") {
        if !v.trim().is_empty() {
            cfg.server.base_url = v;
        }
    }

    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_the_service_contract() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.base_url, "http://localhost:8000");
        assert_eq!(cfg.ui.poll_interval_secs, 5);
        assert!(cfg.logging.enabled);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            base_url = "http://dash.internal:9000"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.base_url, "http://dash.internal:9000");
        assert_eq!(cfg.server.timeout_ms, 30_000);
        assert_eq!(cfg.ui.poll_interval_secs, 5);
    }

    #[test]
    fn empty_toml_is_all_defaults() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.server.base_url, AppConfig::default().server.base_url);
    }
}
