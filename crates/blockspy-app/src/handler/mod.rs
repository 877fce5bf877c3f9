//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `keys`: Key event handlers per view and modal
//! - `details`: Details view lifecycle and refresh results
//! - `servers`: Server management results (add, edit, delete, pause)

pub(crate) mod details;
pub(crate) mod keys;
pub(crate) mod servers;
pub(crate) mod update;


use std::path::PathBuf;

use chrono::NaiveDate;

use blockspy_core::heatmap::MonthRef;
use blockspy_core::types::{GlobalSettings, HistoryPoint};

use crate::config::Preferences;
use crate::dialogs::EditSubmission;
use crate::message::Message;

// Re-export main entry point
pub use servers::start_import;
pub use update::update;

/// Actions that the event loop should perform after update
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateAction {
    /// Fetch `GET /api/servers`
    FetchServers,

    /// Load icons for rows that entered the viewport
    LoadIcons { ips: Vec<String> },

    /// Open the details view: run the first fetch cycle, fetch the heatmap
    /// for `month`, and start the refresh timer
    OpenDetails {
        ip: String,
        generation: u64,
        hours: u32,
        month: MonthRef,
        refresh_secs: u64,
    },

    /// One details fetch cycle (history, players, stats, events)
    FetchDetails {
        ip: String,
        generation: u64,
        hours: u32,
    },

    FetchHeatmap {
        ip: String,
        generation: u64,
        month: MonthRef,
    },

    /// Connect the console socket for session `session_id`
    OpenConsole { session_id: u64, ip: String },

    /// POST each address in order
    AddServers { addresses: Vec<String> },

    /// Read an address file for a bulk add
    ImportFile { path: PathBuf },

    /// Optional RCON test, then PATCH
    SaveServer {
        submission: Box<EditSubmission>,
        reopen_details: bool,
    },

    DeleteServer { ip: String },

    TogglePause { ip: String },

    FetchPlayers { ip: String },

    FetchWatchlist { ip: String },

    AddToWatchlist { ip: String, player: String },

    RemoveFromWatchlist { ip: String, player: String },

    FetchSettings,

    SaveSettings(GlobalSettings),

    Shutdown,

    ExportCsv {
        dir: PathBuf,
        server_name: String,
        date: NaiveDate,
        history: Vec<HistoryPoint>,
    },

    /// Write theme and language to `preferences.toml`
    SavePreferences {
        dir: PathBuf,
        preferences: Preferences,
    },
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }

    pub fn with_message(mut self, msg: Message) -> Self {
        self.message = Some(msg);
        self
    }
}

impl From<Option<UpdateAction>> for UpdateResult {
    fn from(action: Option<UpdateAction>) -> Self {
        Self {
            message: None,
            action,
        }
    }
}
