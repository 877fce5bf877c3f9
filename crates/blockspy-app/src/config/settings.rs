//! Settings parser for `<config_dir>/blockspy/config.toml`

use std::path::{Path, PathBuf};

use blockspy_core::prelude::*;
use serde::{Deserialize, Serialize};

const CONFIG_FILENAME: &str = "config.toml";
const APP_DIR: &str = "blockspy";

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

/// Periods offered by the details view, in hours.
pub const HISTORY_PERIODS: [u32; 5] = [1, 6, 24, 168, 720];

/// Global application settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub backend: BackendSettings,

    #[serde(default)]
    pub polling: PollingSettings,

    #[serde(default)]
    pub ui: UiSettings,

    #[serde(default)]
    pub paths: PathSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BackendSettings {
    #[serde(default = "default_url")]
    pub url: String,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self { url: default_url() }
    }
}

fn default_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PollingSettings {
    /// Seconds between server list refreshes
    #[serde(default = "default_server_list_secs")]
    pub server_list_secs: u64,

    /// Seconds between details refreshes while the details view is open
    #[serde(default = "default_details_secs")]
    pub details_secs: u64,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            server_list_secs: default_server_list_secs(),
            details_secs: default_details_secs(),
        }
    }
}

fn default_server_list_secs() -> u64 {
    10
}

fn default_details_secs() -> u64 {
    45
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UiSettings {
    /// Lookback window selected when details open
    #[serde(default = "default_history_hours")]
    pub default_history_hours: u32,

    /// Where CSV exports are written (defaults to the download dir)
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            default_history_hours: default_history_hours(),
            export_dir: None,
        }
    }
}

fn default_history_hours() -> u32 {
    24
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PathSettings {
    /// Directory holding extra `<code>.json` translation tables
    #[serde(default)]
    pub lang_dir: Option<PathBuf>,
}

impl Settings {
    /// Clamp values that would make the dashboard misbehave.
    pub fn normalized(mut self) -> Self {
        if self.polling.server_list_secs == 0 {
            warn!("polling.server_list_secs must be positive, using default");
            self.polling.server_list_secs = default_server_list_secs();
        }
        if self.polling.details_secs == 0 {
            warn!("polling.details_secs must be positive, using default");
            self.polling.details_secs = default_details_secs();
        }
        if !HISTORY_PERIODS.contains(&self.ui.default_history_hours) {
            warn!(
                "ui.default_history_hours = {} is not one of {:?}, using 24",
                self.ui.default_history_hours, HISTORY_PERIODS
            );
            self.ui.default_history_hours = default_history_hours();
        }
        self
    }

    /// Directory CSV exports go to.
    pub fn export_dir(&self) -> PathBuf {
        self.ui
            .export_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// `<config_dir>/blockspy`, if the platform has a config dir.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR))
}

/// Load settings from `path`, or from the default location when `None`.
///
/// A missing or unreadable file yields the defaults.
pub fn load_settings(path: Option<&Path>) -> Settings {
    let config_path = match path {
        Some(path) => path.to_path_buf(),
        None => match config_dir() {
            Some(dir) => dir.join(CONFIG_FILENAME),
            None => {
                debug!("No config directory on this platform, using defaults");
                return Settings::default();
            }
        },
    };

    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str::<Settings>(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings.normalized()
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}
