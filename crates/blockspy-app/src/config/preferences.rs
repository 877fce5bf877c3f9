//! Theme and language preferences (`preferences.toml`)

use std::path::{Path, PathBuf};

use blockspy_core::i18n::DEFAULT_LANGUAGE;
use blockspy_core::prelude::*;
use serde::{Deserialize, Serialize};

const PREFERENCES_FILENAME: &str = "preferences.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(ThemeMode::Dark),
            "light" => Some(ThemeMode::Light),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Preferences {
    #[serde(default)]
    pub theme: ThemeMode,

    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: ThemeMode::default(),
            language: default_language(),
        }
    }
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

/// `preferences.toml` inside `dir`.
pub fn preferences_path(dir: &Path) -> PathBuf {
    dir.join(PREFERENCES_FILENAME)
}

pub fn load_preferences(dir: &Path) -> Preferences {
    let path = preferences_path(dir);
    if !path.exists() {
        debug!("No preferences at {:?}, using defaults", path);
        return Preferences::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
            warn!("Failed to parse {:?}: {}", path, e);
            Preferences::default()
        }),
        Err(e) => {
            warn!("Failed to read {:?}: {}", path, e);
            Preferences::default()
        }
    }
}

pub fn save_preferences(dir: &Path, preferences: &Preferences) -> Result<()> {
    std::fs::create_dir_all(dir)
        .map_err(|e| Error::config(format!("Failed to create {:?}: {}", dir, e)))?;
    let content = toml::to_string(preferences)
        .map_err(|e| Error::config(format!("Failed to serialize preferences: {}", e)))?;
    std::fs::write(preferences_path(dir), content)?;
    debug!("Saved preferences to {:?}", dir);
    Ok(())
}
