//! Startup: merge config files with command line overrides into the initial
//! application state

use std::path::PathBuf;

use blockspy_app::config::{self, load_preferences, Settings, ThemeMode};
use blockspy_app::state::AppState;
use tracing::{info, warn};

/// Command line overrides collected by the binary.
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    /// Alternate `config.toml`
    pub config_path: Option<PathBuf>,
    /// Backend base URL
    pub url: Option<String>,
    pub language: Option<String>,
    /// `dark` or `light`
    pub theme: Option<String>,
    /// Address file to bulk-import once the dashboard is up
    pub import: Option<PathBuf>,
}

/// Settings with the command line URL applied.
pub fn resolve_settings(options: &LaunchOptions) -> Settings {
    let mut settings = config::load_settings(options.config_path.as_deref());
    if let Some(url) = options.url.as_deref().filter(|u| !u.trim().is_empty()) {
        settings.backend.url = url.trim().to_string();
    }
    settings
}

/// Build the initial state.
///
/// Persisted preferences come from `config_dir`; `--lang` and `--theme` win
/// over them for this run only.
pub fn prepare_state(
    options: &LaunchOptions,
    settings: Settings,
    config_dir: Option<PathBuf>,
) -> AppState {
    let mut preferences = config_dir
        .as_deref()
        .map(load_preferences)
        .unwrap_or_default();

    if let Some(language) = options.language.as_deref().filter(|l| !l.trim().is_empty()) {
        preferences.language = language.trim().to_string();
    }
    if let Some(raw) = options.theme.as_deref() {
        match ThemeMode::parse(raw) {
            Some(theme) => preferences.theme = theme,
            None => warn!("Ignoring unknown theme {:?}", raw),
        }
    }

    info!(
        "Starting with backend {} (language {}, theme {:?})",
        settings.backend.url, preferences.language, preferences.theme
    );
    AppState::with_settings(settings, preferences, config_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockspy_app::config::{save_preferences, Preferences};
    use tempfile::tempdir;

    #[test]
    fn test_url_override() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[backend]\nurl = \"http://file:1\"\n").unwrap();

        let from_file = resolve_settings(&LaunchOptions {
            config_path: Some(path.clone()),
            ..Default::default()
        });
        assert_eq!(from_file.backend.url, "http://file:1");

        let overridden = resolve_settings(&LaunchOptions {
            config_path: Some(path),
            url: Some("http://cli:2".into()),
            ..Default::default()
        });
        assert_eq!(overridden.backend.url, "http://cli:2");
    }

    #[test]
    fn test_saved_preferences_loaded() {
        let dir = tempdir().unwrap();
        save_preferences(
            dir.path(),
            &Preferences {
                theme: ThemeMode::Light,
                language: "pt-BR".into(),
            },
        )
        .unwrap();

        let state = prepare_state(
            &LaunchOptions::default(),
            Settings::default(),
            Some(dir.path().to_path_buf()),
        );
        assert_eq!(state.preferences.theme, ThemeMode::Light);
        assert_eq!(state.translations.language(), "pt-BR");
    }

    #[test]
    fn test_command_line_wins_over_preferences() {
        let dir = tempdir().unwrap();
        save_preferences(
            dir.path(),
            &Preferences {
                theme: ThemeMode::Light,
                language: "pt-BR".into(),
            },
        )
        .unwrap();

        let options = LaunchOptions {
            language: Some("en".into()),
            theme: Some("DARK".into()),
            ..Default::default()
        };
        let state = prepare_state(&options, Settings::default(), Some(dir.path().to_path_buf()));
        assert_eq!(state.preferences.theme, ThemeMode::Dark);
        assert_eq!(state.preferences.language, "en");
    }

    #[test]
    fn test_unknown_theme_ignored() {
        let options = LaunchOptions {
            theme: Some("purple".into()),
            ..Default::default()
        };
        let state = prepare_state(&options, Settings::default(), None);
        assert_eq!(state.preferences.theme, ThemeMode::Dark);
    }
}
