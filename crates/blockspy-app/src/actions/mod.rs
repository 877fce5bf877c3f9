//! Action handlers: UpdateAction dispatch and background task spawning

use tokio::sync::mpsc;
use url::Url;

use blockspy_client::{DashboardApi, IconCache};

use crate::handler::UpdateAction;
use crate::message::Message;

pub(crate) mod console;
pub(crate) mod details;
pub(crate) mod icons;
pub mod polling;
pub(crate) mod servers;

pub use polling::spawn_server_list_polling;

/// Long-lived handles the background tasks share.
#[derive(Debug, Clone)]
pub struct Services<A> {
    pub api: A,
    pub icons: IconCache,
    /// Backend base URL; the console socket URL derives from it
    pub base_url: Url,
}

impl<A> Services<A> {
    pub fn new(api: A, icons: IconCache, base_url: Url) -> Self {
        Self {
            api,
            icons,
            base_url,
        }
    }
}

/// Execute an action by spawning a background task
pub fn handle_action<A>(action: UpdateAction, msg_tx: mpsc::Sender<Message>, services: &Services<A>)
where
    A: DashboardApi + Clone + Send + Sync + 'static,
{
    let api = services.api.clone();
    match action {
        UpdateAction::FetchServers => servers::spawn_fetch_servers(api, msg_tx),

        UpdateAction::LoadIcons { ips } => {
            icons::spawn_icon_loads(api, services.icons.clone(), ips, msg_tx);
        }

        UpdateAction::OpenDetails {
            ip,
            generation,
            hours,
            month,
            refresh_secs,
        } => {
            details::spawn_details_cycle(api.clone(), ip.clone(), generation, hours, msg_tx.clone());
            details::spawn_heatmap_fetch(api, ip, generation, month, msg_tx.clone());
            polling::spawn_details_timer(generation, refresh_secs, msg_tx);
        }

        UpdateAction::FetchDetails {
            ip,
            generation,
            hours,
        } => details::spawn_details_cycle(api, ip, generation, hours, msg_tx),

        UpdateAction::FetchHeatmap {
            ip,
            generation,
            month,
        } => details::spawn_heatmap_fetch(api, ip, generation, month, msg_tx),

        UpdateAction::OpenConsole { session_id, ip } => {
            console::spawn_console(&services.base_url, session_id, ip, msg_tx);
        }

        UpdateAction::AddServers { addresses } => {
            servers::spawn_add_servers(api, addresses, msg_tx);
        }

        UpdateAction::ImportFile { path } => servers::spawn_import_file(path, msg_tx),

        UpdateAction::SaveServer {
            submission,
            reopen_details,
        } => servers::spawn_save_server(api, *submission, reopen_details, msg_tx),

        UpdateAction::DeleteServer { ip } => servers::spawn_delete_server(api, ip, msg_tx),

        UpdateAction::TogglePause { ip } => servers::spawn_toggle_pause(api, ip, msg_tx),

        UpdateAction::FetchPlayers { ip } => servers::spawn_fetch_players(api, ip, msg_tx),

        UpdateAction::FetchWatchlist { ip } => servers::spawn_fetch_watchlist(api, ip, msg_tx),

        UpdateAction::AddToWatchlist { ip, player } => {
            servers::spawn_watchlist_change(api, ip, player, true, msg_tx);
        }

        UpdateAction::RemoveFromWatchlist { ip, player } => {
            servers::spawn_watchlist_change(api, ip, player, false, msg_tx);
        }

        UpdateAction::FetchSettings => servers::spawn_fetch_settings(api, msg_tx),

        UpdateAction::SaveSettings(settings) => {
            servers::spawn_save_settings(api, settings, msg_tx);
        }

        UpdateAction::Shutdown => servers::spawn_shutdown(api, msg_tx),

        UpdateAction::ExportCsv {
            dir,
            server_name,
            date,
            history,
        } => {
            tokio::spawn(async move {
                let result = tokio::task::spawn_blocking(move || {
                    blockspy_core::export::write_history_csv(&dir, &server_name, date, &history)
                })
                .await;
                let result = match result {
                    Ok(Ok(path)) => Ok(path),
                    Ok(Err(e)) => {
                        tracing::warn!("History export failed: {}", e);
                        Err(e.to_string())
                    }
                    Err(e) => Err(e.to_string()),
                };
                let _ = msg_tx.send(Message::ExportFinished { result }).await;
            });
        }

        UpdateAction::SavePreferences { dir, preferences } => {
            // Fire and forget; a failed write only costs the preference
            tokio::task::spawn_blocking(move || {
                if let Err(e) = crate::config::save_preferences(&dir, &preferences) {
                    tracing::warn!("Failed to save preferences: {}", e);
                }
            });
        }
    }
}
