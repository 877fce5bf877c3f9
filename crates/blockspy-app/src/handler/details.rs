//! Details view lifecycle: open, close, refresh results, console hookup

use std::sync::Arc;

use tokio::sync::watch;

use blockspy_client::{ConsoleEvent, ConsoleHandle};
use blockspy_core::heatmap::MonthRef;
use blockspy_core::types::CalendarEntry;

use crate::config::HISTORY_PERIODS;
use crate::details::{DetailsPayload, DetailsState, LoadState};
use crate::message::Message;
use crate::state::{AppState, View};

use super::{UpdateAction, UpdateResult};

/// Open the details view for `ip`, tearing down any open one first.
pub fn open_details(state: &mut AppState, ip: &str) -> UpdateResult {
    let Some(server) = state.server_list.find(ip).cloned() else {
        tracing::debug!("Cannot open details, {} is not in the list", ip);
        return UpdateResult::none();
    };

    teardown_details(state);

    let generation = state.next_details_generation();
    let hours = state.settings.ui.default_history_hours;
    let details = DetailsState::new(server, generation, hours, state.today());
    let month = details.heatmap.month;
    state.details = Some(details);
    state.view = View::Details;
    state.search_active = false;

    tracing::info!("Opened details for {} (generation {})", ip, generation);
    UpdateResult::action(UpdateAction::OpenDetails {
        ip: ip.to_string(),
        generation,
        hours,
        month,
        refresh_secs: state.settings.polling.details_secs,
    })
    .with_message(Message::ConnectConsole)
}

pub fn close_details(state: &mut AppState) -> UpdateResult {
    teardown_details(state);
    state.view = View::Dashboard;
    UpdateResult::none()
}

/// Stop the refresh timer and the console of the open view.
pub(crate) fn teardown_details(state: &mut AppState) {
    // Dropping the state cancels its refresh timer
    state.details = None;
    state.console.teardown();
}

/// Start a console session when the open server has RCON configured.
///
/// Without credentials the console stays idle and renders locked.
pub fn connect_console(state: &mut AppState) -> UpdateResult {
    let Some(details) = state.details.as_ref() else {
        return UpdateResult::none();
    };
    if !details.server.has_rcon() {
        state.console.teardown();
        return UpdateResult::none();
    }
    let ip = details.ip.clone();
    let session_id = state.console.open(&ip);
    UpdateResult::action(UpdateAction::OpenConsole { session_id, ip })
}

pub fn console_connected(state: &mut AppState, session_id: u64, handle: ConsoleHandle) {
    state.console.attach(session_id, Arc::new(handle));
}

pub fn console_connect_failed(state: &mut AppState, session_id: u64, error: &str) {
    state.console.connect_failed(session_id, error);
}

pub fn console_event(state: &mut AppState, session_id: u64, event: ConsoleEvent) {
    state.console.handle_event(session_id, event);
}

pub fn timer_started(
    state: &mut AppState,
    generation: u64,
    shutdown_tx: Arc<watch::Sender<bool>>,
) {
    match state.details.as_mut() {
        Some(details)
            if details.generation == generation
                && !matches!(details.load, LoadState::Failed(_)) =>
        {
            details.set_refresh_timer(shutdown_tx);
        }
        _ => {
            tracing::debug!("Stopping refresh timer of closed details view {}", generation);
            let _ = shutdown_tx.send(true);
        }
    }
}

/// Periodic refresh; skipped while the previous cycle is still running.
pub fn details_tick(state: &mut AppState, generation: u64) -> UpdateResult {
    let Some(details) = state.details.as_mut() else {
        return UpdateResult::none();
    };
    if details.generation != generation {
        return UpdateResult::none();
    }
    if details.refresh_in_flight {
        tracing::trace!("Details refresh still in flight, skipping tick");
        return UpdateResult::none();
    }
    details.refresh_in_flight = true;
    UpdateResult::action(UpdateAction::FetchDetails {
        ip: details.ip.clone(),
        generation,
        hours: details.hours,
    })
}

pub fn details_loaded(
    state: &mut AppState,
    ip: &str,
    generation: u64,
    hours: u32,
    payload: DetailsPayload,
) {
    match state.details.as_mut() {
        Some(details) if details.owns(ip, generation) && details.hours == hours => {
            details.apply_payload(payload);
        }
        _ => tracing::debug!("Ignoring stale details result for {}", ip),
    }
}

pub fn details_failed(state: &mut AppState, ip: &str, generation: u64, hours: u32, error: String) {
    match state.details.as_mut() {
        Some(details) if details.owns(ip, generation) && details.hours == hours => {
            tracing::warn!("Details refresh for {} failed, stopping refresh: {}", ip, error);
            details.fail(error);
        }
        _ => tracing::debug!("Ignoring stale details failure for {}", ip),
    }
}

pub fn heatmap_loaded(
    state: &mut AppState,
    ip: &str,
    generation: u64,
    month: MonthRef,
    entries: &[CalendarEntry],
) {
    if let Some(details) = state.details.as_mut() {
        if details.owns(ip, generation) {
            details.heatmap.apply(month, entries);
        }
    }
}

pub fn heatmap_failed(
    state: &mut AppState,
    ip: &str,
    generation: u64,
    month: MonthRef,
    error: String,
) {
    if let Some(details) = state.details.as_mut() {
        if details.owns(ip, generation) {
            tracing::warn!("Heatmap for {} {}-{:02} failed: {}", ip, month.year, month.month, error);
            details.heatmap.fail(month, error);
        }
    }
}

/// Step the lookback window through the period list and re-run the cycle.
pub fn step_period(state: &mut AppState, forward: bool) -> UpdateResult {
    let Some(details) = state.details.as_mut() else {
        return UpdateResult::none();
    };
    let idx = HISTORY_PERIODS
        .iter()
        .position(|h| *h == details.hours)
        .unwrap_or(2);
    let next = if forward {
        (idx + 1).min(HISTORY_PERIODS.len() - 1)
    } else {
        idx.saturating_sub(1)
    };
    let hours = HISTORY_PERIODS[next];
    if hours == details.hours {
        return UpdateResult::none();
    }
    details.set_hours(hours);
    UpdateResult::action(UpdateAction::FetchDetails {
        ip: details.ip.clone(),
        generation: details.generation,
        hours,
    })
}

pub fn heatmap_previous(state: &mut AppState) -> UpdateResult {
    let Some(details) = state.details.as_mut() else {
        return UpdateResult::none();
    };
    let month = details.heatmap.go_previous();
    UpdateResult::action(UpdateAction::FetchHeatmap {
        ip: details.ip.clone(),
        generation: details.generation,
        month,
    })
}

pub fn heatmap_next(state: &mut AppState) -> UpdateResult {
    let today = state.today();
    let Some(details) = state.details.as_mut() else {
        return UpdateResult::none();
    };
    match details.heatmap.go_next(today) {
        Some(month) => UpdateResult::action(UpdateAction::FetchHeatmap {
            ip: details.ip.clone(),
            generation: details.generation,
            month,
        }),
        None => UpdateResult::none(),
    }
}

/// Export the cached history of the open server as CSV.
pub fn export_history(state: &mut AppState) -> UpdateResult {
    let Some(details) = state.details.as_ref() else {
        return UpdateResult::none();
    };
    if details.history.is_empty() {
        state.notice = Some(
            state
                .tr("export.no_data", "No history to export")
                .to_string(),
        );
        return UpdateResult::none();
    }
    UpdateResult::action(UpdateAction::ExportCsv {
        dir: state.settings.export_dir(),
        server_name: details.server.export_name().to_string(),
        date: state.today(),
        history: details.history.clone(),
    })
}

pub fn export_finished(state: &mut AppState, result: Result<std::path::PathBuf, String>) {
    state.notice = Some(match result {
        Ok(path) => state.translations.format(
            "export.saved",
            "Exported to {path}",
            &[("path", &path.display().to_string())],
        ),
        Err(error) => state.translations.format(
            "export.failed",
            "Export failed: {error}",
            &[("error", &error)],
        ),
    });
}
