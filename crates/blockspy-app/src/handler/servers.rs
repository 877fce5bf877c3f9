//! Server list polling and server management flows

use std::path::PathBuf;

use blockspy_core::types::{GlobalSettings, PlayerLists, ServerSummary, WatchlistEntry};

use crate::details::LoadState;
use crate::dialogs::{
    parse_address_list, AddMode, AddServersDialog, Alert, ConfirmKind, EditServerDialog, Modal,
    PlayerPopup, SettingsDialog, WatchlistPanel,
};
use crate::message::Message;
use crate::state::{AppState, View};

use super::details::teardown_details;
use super::{UpdateAction, UpdateResult};

// ─────────────────────────────────────────────────────────────────────────────
// Polling
// ─────────────────────────────────────────────────────────────────────────────

/// Fetch the list unless a fetch is already running.
///
/// A request made while one is in flight is queued and issued when it lands,
/// so the list always reflects the latest user action.
pub fn request_server_fetch(state: &mut AppState) -> Option<UpdateAction> {
    if state.server_list.fetch_in_flight {
        state.refetch_queued = true;
        return None;
    }
    state.server_list.fetch_in_flight = true;
    Some(UpdateAction::FetchServers)
}

pub fn server_list_tick(state: &mut AppState) -> UpdateResult {
    if state.server_list.fetch_in_flight {
        tracing::trace!("Server list fetch still in flight, skipping tick");
        return UpdateResult::none();
    }
    state.server_list.fetch_in_flight = true;
    UpdateResult::action(UpdateAction::FetchServers)
}

pub fn servers_loaded(state: &mut AppState, servers: Vec<ServerSummary>) -> UpdateResult {
    state.server_list.fetch_in_flight = false;
    state.server_list.replace_all(servers);

    if let Some(details) = state.details.as_mut() {
        if let Some(server) = state.server_list.find(&details.ip) {
            details.server = server.clone();
        }
    }

    if state.refetch_queued {
        state.refetch_queued = false;
        state.server_list.fetch_in_flight = true;
        return UpdateResult::action(UpdateAction::FetchServers);
    }

    if let Some(ip) = state.pending_reopen.take() {
        if state.server_list.find(&ip).is_some() {
            return UpdateResult::message(Message::OpenDetails { ip });
        }
        if state.view == View::Details {
            return UpdateResult::message(Message::CloseDetails);
        }
    }

    let ips = state.server_list.take_icons_to_load();
    if ips.is_empty() {
        UpdateResult::none()
    } else {
        UpdateResult::action(UpdateAction::LoadIcons { ips })
    }
}

pub fn servers_failed(state: &mut AppState, error: String) -> UpdateResult {
    tracing::warn!("Server list fetch failed: {}", error);
    state.server_list.fetch_in_flight = false;
    state.server_list.loaded = true;
    state.server_list.last_error = Some(error);
    if state.refetch_queued {
        state.refetch_queued = false;
        return request_server_fetch(state).into();
    }
    UpdateResult::none()
}

// ─────────────────────────────────────────────────────────────────────────────
// Add / import
// ─────────────────────────────────────────────────────────────────────────────

pub fn open_add_dialog(state: &mut AppState, mode: AddMode) {
    state.modal = Some(Modal::AddServers(AddServersDialog::new(mode)));
}

/// Begin a bulk import of `path`, as `--import` does on startup.
pub fn start_import(state: &mut AppState, path: PathBuf) -> UpdateAction {
    let mut dialog = AddServersDialog::new(AddMode::ImportFile);
    dialog.begin();
    state.modal = Some(Modal::AddServers(dialog));
    UpdateAction::ImportFile { path }
}

pub fn submit_add(state: &mut AppState) -> UpdateResult {
    let Some(Modal::AddServers(dialog)) = state.modal.as_mut() else {
        return UpdateResult::none();
    };
    if dialog.running {
        return UpdateResult::none();
    }
    let input = dialog.input.trimmed().to_string();
    if input.is_empty() {
        return UpdateResult::none();
    }
    match dialog.mode {
        AddMode::Addresses => {
            let addresses = parse_address_list(&input);
            dialog.begin();
            UpdateResult::action(UpdateAction::AddServers { addresses })
        }
        AddMode::ImportFile => {
            dialog.begin();
            UpdateResult::action(UpdateAction::ImportFile {
                path: PathBuf::from(input),
            })
        }
    }
}

pub fn import_loaded(state: &mut AppState, addresses: Vec<String>) -> UpdateResult {
    if addresses.is_empty() {
        return add_finished(state);
    }
    UpdateResult::action(UpdateAction::AddServers { addresses })
}

pub fn import_failed(state: &mut AppState, error: String) {
    tracing::warn!("Import failed: {}", error);
    let title = state.tr("add.import_failed", "Import failed").to_string();
    state.modal = Some(Modal::Alert(Alert::error(title, error)));
}

pub fn add_progress(state: &mut AppState, address: String, error: Option<String>) {
    match &error {
        Some(e) => tracing::warn!("Adding {} failed: {}", address, e),
        None => tracing::info!("Added server {}", address),
    }
    if let Some(Modal::AddServers(dialog)) = state.modal.as_mut() {
        dialog.record(address, error);
    }
}

pub fn add_finished(state: &mut AppState) -> UpdateResult {
    if let Some(Modal::AddServers(dialog)) = state.modal.as_mut() {
        let summary = dialog.finish();
        tracing::info!("Bulk add done: {} added, {} failed", summary.added, summary.failed);
    }
    request_server_fetch(state).into()
}

// ─────────────────────────────────────────────────────────────────────────────
// Edit / delete / pause
// ─────────────────────────────────────────────────────────────────────────────

pub fn open_edit_dialog(state: &mut AppState, ip: &str) {
    let reopen_details = state.view == View::Details;
    if let Some(server) = state.server_list.find(ip) {
        let dialog = EditServerDialog::from_server(server, reopen_details);
        state.modal = Some(Modal::EditServer(dialog));
    }
}

pub fn submit_edit(state: &mut AppState) -> UpdateResult {
    let Some(Modal::EditServer(dialog)) = state.modal.as_mut() else {
        return UpdateResult::none();
    };
    if dialog.saving {
        return UpdateResult::none();
    }
    dialog.saving = true;
    dialog.error = None;
    UpdateResult::action(UpdateAction::SaveServer {
        submission: Box::new(dialog.submission()),
        reopen_details: dialog.reopen_details,
    })
}

pub fn server_saved(state: &mut AppState, final_ip: String, reopen_details: bool) -> UpdateResult {
    tracing::info!("Saved server {}", final_ip);
    state.modal = None;
    if reopen_details {
        state.pending_reopen = Some(final_ip);
    }
    request_server_fetch(state).into()
}

pub fn server_save_failed(state: &mut AppState, wrong_password: bool, detail: String) {
    tracing::warn!("Saving server failed: {}", detail);
    if let Some(Modal::EditServer(dialog)) = state.modal.as_mut() {
        dialog.fail(wrong_password, detail);
    }
}

pub fn confirm_delete(state: &mut AppState, server: &ServerSummary) {
    state.modal = Some(Modal::Confirm(ConfirmKind::DeleteServer {
        ip: server.ip.clone(),
        name: server.display_name().to_string(),
    }));
}

pub fn confirm_accepted(state: &mut AppState) -> UpdateResult {
    match state.modal.take() {
        Some(Modal::Confirm(ConfirmKind::DeleteServer { ip, .. })) => {
            UpdateResult::action(UpdateAction::DeleteServer { ip })
        }
        Some(Modal::Confirm(ConfirmKind::Shutdown)) => {
            state.notice = Some(state.tr("shutdown.stopping", "Stopping the backend...").to_string());
            UpdateResult::action(UpdateAction::Shutdown)
        }
        other => {
            state.modal = other;
            UpdateResult::none()
        }
    }
}

pub fn server_deleted(state: &mut AppState, ip: &str) -> UpdateResult {
    tracing::info!("Deleted server {}", ip);
    if state.details.as_ref().is_some_and(|d| d.ip == ip) {
        teardown_details(state);
        state.view = View::Dashboard;
    }
    request_server_fetch(state).into()
}

pub fn server_action_failed(state: &mut AppState, error: String) {
    tracing::warn!("Server action failed: {}", error);
    let title = state.tr("error.title", "Error").to_string();
    state.modal = Some(Modal::Alert(Alert::error(title, error)));
}

// ─────────────────────────────────────────────────────────────────────────────
// Players, watchlist, settings
// ─────────────────────────────────────────────────────────────────────────────

pub fn open_player_popup(state: &mut AppState, server: &ServerSummary) -> UpdateResult {
    state.modal = Some(Modal::Players(PlayerPopup::new(
        server.ip.clone(),
        server.display_name().to_string(),
    )));
    UpdateResult::action(UpdateAction::FetchPlayers {
        ip: server.ip.clone(),
    })
}

pub fn players_loaded(state: &mut AppState, ip: &str, players: PlayerLists) {
    if let Some(Modal::Players(popup)) = state.modal.as_mut() {
        if popup.ip == ip {
            popup.players = players.sorted_online();
            popup.load = LoadState::Loaded;
        }
    }
}

pub fn players_failed(state: &mut AppState, ip: &str, error: String) {
    tracing::warn!("Player list for {} failed: {}", ip, error);
    if let Some(Modal::Players(popup)) = state.modal.as_mut() {
        if popup.ip == ip {
            popup.load = LoadState::Failed(error);
        }
    }
}

pub fn open_watchlist(state: &mut AppState) -> UpdateResult {
    let Some(details) = state.details.as_ref() else {
        return UpdateResult::none();
    };
    let ip = details.ip.clone();
    state.modal = Some(Modal::Watchlist(WatchlistPanel::new(ip.clone())));
    UpdateResult::action(UpdateAction::FetchWatchlist { ip })
}

pub fn watchlist_loaded(state: &mut AppState, ip: &str, entries: Vec<WatchlistEntry>) {
    if let Some(Modal::Watchlist(panel)) = state.modal.as_mut() {
        if panel.ip == ip {
            panel.apply(entries);
        }
    }
}

pub fn watchlist_failed(state: &mut AppState, ip: &str, error: String) {
    tracing::warn!("Watchlist for {} failed: {}", ip, error);
    if let Some(Modal::Watchlist(panel)) = state.modal.as_mut() {
        if panel.ip == ip {
            panel.load = LoadState::Failed(error);
        }
    }
}

pub fn watchlist_changed(state: &mut AppState, ip: &str) -> UpdateResult {
    match state.modal.as_ref() {
        Some(Modal::Watchlist(panel)) if panel.ip == ip => {
            UpdateResult::action(UpdateAction::FetchWatchlist { ip: ip.to_string() })
        }
        _ => UpdateResult::none(),
    }
}

pub fn submit_watchlist_add(state: &mut AppState) -> UpdateResult {
    let Some(Modal::Watchlist(panel)) = state.modal.as_mut() else {
        return UpdateResult::none();
    };
    let player = panel.input.trimmed().to_string();
    if player.is_empty() {
        return UpdateResult::none();
    }
    panel.input.clear();
    UpdateResult::action(UpdateAction::AddToWatchlist {
        ip: panel.ip.clone(),
        player,
    })
}

pub fn remove_selected_watch(state: &mut AppState) -> UpdateResult {
    let Some(Modal::Watchlist(panel)) = state.modal.as_ref() else {
        return UpdateResult::none();
    };
    match panel.selected_name() {
        Some(player) => UpdateResult::action(UpdateAction::RemoveFromWatchlist {
            ip: panel.ip.clone(),
            player: player.to_string(),
        }),
        None => UpdateResult::none(),
    }
}

pub fn open_settings(state: &mut AppState) -> UpdateResult {
    state.modal = Some(Modal::Settings(SettingsDialog::loading()));
    UpdateResult::action(UpdateAction::FetchSettings)
}

pub fn settings_loaded(state: &mut AppState, settings: GlobalSettings) {
    if let Some(Modal::Settings(dialog)) = state.modal.as_mut() {
        dialog.apply(settings);
    }
}

pub fn settings_failed(state: &mut AppState, error: String, saving: bool) {
    tracing::warn!("Global settings request failed: {}", error);
    let title = if saving {
        state.tr("settings.save_failed", "Could not save settings")
    } else {
        state.tr("settings.load_failed", "Could not load settings")
    }
    .to_string();
    state.modal = Some(Modal::Alert(Alert::error(title, error)));
}

pub fn submit_settings(state: &mut AppState) -> UpdateResult {
    let Some(Modal::Settings(dialog)) = state.modal.as_mut() else {
        return UpdateResult::none();
    };
    if dialog.saving || dialog.load.is_loading() {
        return UpdateResult::none();
    }
    dialog.saving = true;
    UpdateResult::action(UpdateAction::SaveSettings(dialog.to_settings()))
}

pub fn settings_saved(state: &mut AppState) {
    state.modal = None;
    state.notice = Some(state.tr("settings.saved", "Settings saved").to_string());
}

// ─────────────────────────────────────────────────────────────────────────────
// Shutdown and preferences
// ─────────────────────────────────────────────────────────────────────────────

pub fn shutdown_complete(state: &mut AppState) {
    tracing::info!("Backend shut down");
    teardown_details(state);
    state.modal = None;
    state.notice = None;
    state.view = View::Stopped;
}

pub fn shutdown_failed(state: &mut AppState, error: String) {
    tracing::warn!("Shutdown failed: {}", error);
    state.notice = None;
    let title = state.tr("shutdown.failed", "Shutdown failed").to_string();
    state.modal = Some(Modal::Alert(Alert::error(title, error)));
}

fn save_preferences_action(state: &AppState) -> Option<UpdateAction> {
    state
        .config_dir
        .as_ref()
        .map(|dir| UpdateAction::SavePreferences {
            dir: dir.clone(),
            preferences: state.preferences.clone(),
        })
}

pub fn toggle_theme(state: &mut AppState) -> UpdateResult {
    state.preferences.theme = state.preferences.theme.toggled();
    save_preferences_action(state).into()
}

pub fn cycle_language(state: &mut AppState) -> UpdateResult {
    let Some(next) = state.next_language() else {
        return UpdateResult::none();
    };
    state.set_language(&next);
    tracing::info!("Language set to {}", next);
    save_preferences_action(state).into()
}
