//! Configuration loading
//!
//! - `settings`: `config.toml` (backend URL, polling, UI, paths)
//! - `preferences`: `preferences.toml` (theme and language, rewritten on change)

pub mod preferences;
pub mod settings;

pub use preferences::{
    load_preferences, preferences_path, save_preferences, Preferences, ThemeMode,
};
pub use settings::{
    config_dir, load_settings, BackendSettings, PathSettings, PollingSettings, Settings,
    UiSettings, DEFAULT_BACKEND_URL, HISTORY_PERIODS,
};
