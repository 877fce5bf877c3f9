//! Application state (Model in TEA pattern)

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};

use blockspy_core::i18n::{available_languages, Translations};

use crate::config::{Preferences, Settings};
use crate::console_session::ConsoleSession;
use crate::details::DetailsState;
use crate::dialogs::Modal;
use crate::server_list::ServerListState;

/// Top-level screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Dashboard,
    Details,
    /// The backend was shut down; only the final banner remains
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppPhase {
    #[default]
    Running,
    Quitting,
}

/// Complete application state
#[derive(Debug)]
pub struct AppState {
    pub view: View,
    pub phase: AppPhase,

    /// Full server collection plus filter, sort and scroll state
    pub server_list: ServerListState,

    /// The open server, when `view` is `Details`
    pub details: Option<DetailsState>,

    /// The single live console
    pub console: ConsoleSession,

    pub modal: Option<Modal>,

    /// Typing goes to the search filter
    pub search_active: bool,

    /// Transient one-line notice in the status bar
    pub notice: Option<String>,

    pub settings: Settings,
    pub preferences: Preferences,

    /// Where `preferences.toml` is written; `None` disables persistence
    pub config_dir: Option<PathBuf>,

    pub translations: Translations,
    pub languages: Vec<String>,

    /// Clock used by rendering, refreshed every tick
    pub now: DateTime<Utc>,

    details_generation: u64,

    /// A user action needs a fresh list while a poll is in flight
    pub refetch_queued: bool,

    /// Reopen details for this address after the next list fetch
    pub pending_reopen: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::with_settings(Settings::default(), Preferences::default(), None)
    }

    pub fn with_settings(
        settings: Settings,
        preferences: Preferences,
        config_dir: Option<PathBuf>,
    ) -> Self {
        let lang_dir = settings.paths.lang_dir.clone();
        let translations = Translations::load(&preferences.language, lang_dir.as_deref());
        let languages = available_languages(lang_dir.as_deref());
        Self {
            view: View::Dashboard,
            phase: AppPhase::Running,
            server_list: ServerListState::new(),
            details: None,
            console: ConsoleSession::new(),
            modal: None,
            search_active: false,
            notice: None,
            settings,
            preferences,
            config_dir,
            translations,
            languages,
            now: Utc::now(),
            details_generation: 0,
            refetch_queued: false,
            pending_reopen: None,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.phase == AppPhase::Quitting
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    /// Shorthand for a translated string with an English default.
    pub fn tr<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.translations.get(key, default)
    }

    pub fn next_details_generation(&mut self) -> u64 {
        self.details_generation += 1;
        self.details_generation
    }

    pub fn is_details_open(&self) -> bool {
        self.view == View::Details && self.details.is_some()
    }

    /// Switch to `language` and reload its table.
    pub fn set_language(&mut self, language: &str) {
        self.preferences.language = language.to_string();
        self.translations =
            Translations::load(language, self.settings.paths.lang_dir.as_deref());
    }

    /// The language after the current one, wrapping around.
    pub fn next_language(&self) -> Option<String> {
        if self.languages.is_empty() {
            return None;
        }
        let idx = self
            .languages
            .iter()
            .position(|l| *l == self.preferences.language)
            .map(|i| (i + 1) % self.languages.len())
            .unwrap_or(0);
        self.languages.get(idx).cloned()
    }
}
