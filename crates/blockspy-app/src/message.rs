//! Message types for the application (TEA pattern)

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::watch;

use blockspy_client::{ConsoleEvent, ConsoleHandle};
use blockspy_core::heatmap::MonthRef;
use blockspy_core::types::{
    CalendarEntry, GlobalSettings, PlayerLists, ServerSummary, WatchlistEntry,
};

use crate::details::DetailsPayload;
use crate::input_key::InputKey;

/// All possible messages in the application
#[derive(Debug, Clone)]
pub enum Message {
    /// Keyboard event from terminal
    Key(InputKey),

    /// Render tick; refreshes the clock and schedules icon loads
    Tick,

    /// Request application quit
    Quit,

    // ─────────────────────────────────────────────────────────
    // Server list
    // ─────────────────────────────────────────────────────────
    /// Periodic server list poll
    ServerListTick,

    ServersLoaded(Vec<ServerSummary>),

    ServersFailed(String),

    /// An icon load finished; `found` is false when it fell back
    IconLoaded { ip: String, found: bool },

    // ─────────────────────────────────────────────────────────
    // Details view
    // ─────────────────────────────────────────────────────────
    OpenDetails { ip: String },

    CloseDetails,

    /// Start the console for the open details view, if RCON is configured
    ConnectConsole,

    /// The details refresh timer is running; carries its shutdown handle
    DetailsTimerStarted {
        generation: u64,
        shutdown_tx: Arc<watch::Sender<bool>>,
    },

    DetailsTick { generation: u64 },

    DetailsLoaded {
        ip: String,
        generation: u64,
        hours: u32,
        payload: Box<DetailsPayload>,
    },

    DetailsFailed {
        ip: String,
        generation: u64,
        hours: u32,
        error: String,
    },

    HeatmapLoaded {
        ip: String,
        generation: u64,
        month: MonthRef,
        entries: Vec<CalendarEntry>,
    },

    HeatmapFailed {
        ip: String,
        generation: u64,
        month: MonthRef,
        error: String,
    },

    ExportFinished { result: Result<PathBuf, String> },

    // ─────────────────────────────────────────────────────────
    // Live console
    // ─────────────────────────────────────────────────────────
    ConsoleConnected {
        session_id: u64,
        handle: ConsoleHandle,
    },

    ConsoleConnectFailed { session_id: u64, error: String },

    Console { session_id: u64, event: ConsoleEvent },

    // ─────────────────────────────────────────────────────────
    // Server management
    // ─────────────────────────────────────────────────────────
    /// One address of a bulk add was processed
    AddProgress {
        address: String,
        error: Option<String>,
    },

    AddFinished,

    ImportLoaded { addresses: Vec<String> },

    ImportFailed { error: String },

    ServerSaved {
        final_ip: String,
        reopen_details: bool,
    },

    ServerSaveFailed { wrong_password: bool, detail: String },

    ServerDeleted { ip: String },

    PauseToggled { ip: String },

    /// Delete or pause failed; shown as a blocking message
    ServerActionFailed { error: String },

    PlayersLoaded { ip: String, players: PlayerLists },

    PlayersFailed { ip: String, error: String },

    WatchlistLoaded {
        ip: String,
        entries: Vec<WatchlistEntry>,
    },

    WatchlistFailed { ip: String, error: String },

    /// An add or remove went through; the panel re-fetches
    WatchlistChanged { ip: String },

    SettingsLoaded(GlobalSettings),

    SettingsFailed(String),

    SettingsSaved,

    SettingsSaveFailed(String),

    ShutdownComplete,

    ShutdownFailed(String),
}
