//! Main update function - handles state transitions (TEA pattern)

use chrono::Utc;

use crate::message::Message;
use crate::state::{AppPhase, AppState};

use super::details::{self, teardown_details};
use super::keys::handle_key;
use super::servers;
use super::{UpdateAction, UpdateResult};

/// Process a message and update state
/// Returns an optional follow-up message and an optional action
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Key(key) => handle_key(state, key),

        Message::Tick => {
            state.now = Utc::now();
            let ips = state.server_list.take_icons_to_load();
            if ips.is_empty() {
                UpdateResult::none()
            } else {
                UpdateResult::action(UpdateAction::LoadIcons { ips })
            }
        }

        Message::Quit => {
            tracing::info!("Quit requested");
            teardown_details(state);
            state.phase = AppPhase::Quitting;
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Server list
        // ─────────────────────────────────────────────────────────
        Message::ServerListTick => servers::server_list_tick(state),

        Message::ServersLoaded(list) => servers::servers_loaded(state, list),

        Message::ServersFailed(error) => servers::servers_failed(state, error),

        Message::IconLoaded { ip, found } => {
            state.server_list.set_icon_loaded(&ip, found);
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Details view
        // ─────────────────────────────────────────────────────────
        Message::OpenDetails { ip } => details::open_details(state, &ip),

        Message::CloseDetails => details::close_details(state),

        Message::ConnectConsole => details::connect_console(state),

        Message::DetailsTimerStarted {
            generation,
            shutdown_tx,
        } => {
            details::timer_started(state, generation, shutdown_tx);
            UpdateResult::none()
        }

        Message::DetailsTick { generation } => details::details_tick(state, generation),

        Message::DetailsLoaded {
            ip,
            generation,
            hours,
            payload,
        } => {
            details::details_loaded(state, &ip, generation, hours, *payload);
            UpdateResult::none()
        }

        Message::DetailsFailed {
            ip,
            generation,
            hours,
            error,
        } => {
            details::details_failed(state, &ip, generation, hours, error);
            UpdateResult::none()
        }

        Message::HeatmapLoaded {
            ip,
            generation,
            month,
            entries,
        } => {
            details::heatmap_loaded(state, &ip, generation, month, &entries);
            UpdateResult::none()
        }

        Message::HeatmapFailed {
            ip,
            generation,
            month,
            error,
        } => {
            details::heatmap_failed(state, &ip, generation, month, error);
            UpdateResult::none()
        }

        Message::ExportFinished { result } => {
            details::export_finished(state, result);
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Live console
        // ─────────────────────────────────────────────────────────
        Message::ConsoleConnected { session_id, handle } => {
            details::console_connected(state, session_id, handle);
            UpdateResult::none()
        }

        Message::ConsoleConnectFailed { session_id, error } => {
            details::console_connect_failed(state, session_id, &error);
            UpdateResult::none()
        }

        Message::Console { session_id, event } => {
            details::console_event(state, session_id, event);
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Server management
        // ─────────────────────────────────────────────────────────
        Message::AddProgress { address, error } => {
            servers::add_progress(state, address, error);
            UpdateResult::none()
        }

        Message::AddFinished => servers::add_finished(state),

        Message::ImportLoaded { addresses } => servers::import_loaded(state, addresses),

        Message::ImportFailed { error } => {
            servers::import_failed(state, error);
            UpdateResult::none()
        }

        Message::ServerSaved {
            final_ip,
            reopen_details,
        } => servers::server_saved(state, final_ip, reopen_details),

        Message::ServerSaveFailed {
            wrong_password,
            detail,
        } => {
            servers::server_save_failed(state, wrong_password, detail);
            UpdateResult::none()
        }

        Message::ServerDeleted { ip } => servers::server_deleted(state, &ip),

        Message::PauseToggled { ip } => {
            tracing::info!("Toggled pause for {}", ip);
            servers::request_server_fetch(state).into()
        }

        Message::ServerActionFailed { error } => {
            servers::server_action_failed(state, error);
            UpdateResult::none()
        }

        Message::PlayersLoaded { ip, players } => {
            servers::players_loaded(state, &ip, players);
            UpdateResult::none()
        }

        Message::PlayersFailed { ip, error } => {
            servers::players_failed(state, &ip, error);
            UpdateResult::none()
        }

        Message::WatchlistLoaded { ip, entries } => {
            servers::watchlist_loaded(state, &ip, entries);
            UpdateResult::none()
        }

        Message::WatchlistFailed { ip, error } => {
            servers::watchlist_failed(state, &ip, error);
            UpdateResult::none()
        }

        Message::WatchlistChanged { ip } => servers::watchlist_changed(state, &ip),

        Message::SettingsLoaded(settings) => {
            servers::settings_loaded(state, settings);
            UpdateResult::none()
        }

        Message::SettingsFailed(error) => {
            servers::settings_failed(state, error, false);
            UpdateResult::none()
        }

        Message::SettingsSaved => {
            servers::settings_saved(state);
            UpdateResult::none()
        }

        Message::SettingsSaveFailed(error) => {
            servers::settings_failed(state, error, true);
            UpdateResult::none()
        }

        Message::ShutdownComplete => {
            servers::shutdown_complete(state);
            UpdateResult::none()
        }

        Message::ShutdownFailed(error) => {
            servers::shutdown_failed(state, error);
            UpdateResult::none()
        }
    }
}
