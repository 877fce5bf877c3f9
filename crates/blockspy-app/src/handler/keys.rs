//! Key event handlers per view and modal

use crate::details::{DetailsFocus, Series};
use crate::dialogs::{AddMode, ConfirmKind, Modal};
use crate::input_key::InputKey;
use crate::message::Message;
use crate::state::{AppState, View};

use super::details as details_handler;
use super::servers;
use super::{UpdateAction, UpdateResult};

/// Which modal is open, without borrowing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModalKind {
    Add,
    Edit,
    Confirm,
    Settings,
    Players,
    Watchlist,
    Alert,
}

fn modal_kind(modal: &Modal) -> ModalKind {
    match modal {
        Modal::AddServers(_) => ModalKind::Add,
        Modal::EditServer(_) => ModalKind::Edit,
        Modal::Confirm(_) => ModalKind::Confirm,
        Modal::Settings(_) => ModalKind::Settings,
        Modal::Players(_) => ModalKind::Players,
        Modal::Watchlist(_) => ModalKind::Watchlist,
        Modal::Alert(_) => ModalKind::Alert,
    }
}

/// Convert a key into state changes and follow-ups.
pub fn handle_key(state: &mut AppState, key: InputKey) -> UpdateResult {
    if key == InputKey::CharCtrl('c') {
        return UpdateResult::message(Message::Quit);
    }

    // Any key dismisses a transient notice
    state.notice = None;

    if let Some(kind) = state.modal.as_ref().map(modal_kind) {
        return handle_modal_key(state, kind, key);
    }

    match state.view {
        View::Stopped => handle_key_stopped(key),
        View::Dashboard if state.search_active => handle_key_search(state, key),
        View::Dashboard => handle_key_dashboard(state, key),
        View::Details => handle_key_details(state, key),
    }
}

fn handle_key_stopped(key: InputKey) -> UpdateResult {
    match key {
        InputKey::Char('q') | InputKey::Esc | InputKey::Enter => {
            UpdateResult::message(Message::Quit)
        }
        _ => UpdateResult::none(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Dashboard
// ─────────────────────────────────────────────────────────────────────────────

fn handle_key_search(state: &mut AppState, key: InputKey) -> UpdateResult {
    let list = &mut state.server_list;
    match key {
        InputKey::Esc | InputKey::Enter => state.search_active = false,
        InputKey::Backspace => {
            let mut search = list.filters.search.clone();
            search.pop();
            list.set_search(search);
        }
        InputKey::Up => list.select_previous(),
        InputKey::Down => list.select_next(),
        other => {
            if let Some(c) = other.typed_char() {
                let search = format!("{}{}", list.filters.search, c);
                list.set_search(search);
            }
        }
    }
    UpdateResult::none()
}

fn handle_key_dashboard(state: &mut AppState, key: InputKey) -> UpdateResult {
    let list = &mut state.server_list;
    match key {
        InputKey::Char('q') | InputKey::Esc => return UpdateResult::message(Message::Quit),

        // Navigation
        InputKey::Char('j') | InputKey::Down => list.select_next(),
        InputKey::Char('k') | InputKey::Up => list.select_previous(),
        InputKey::Char('g') | InputKey::Home => list.select_first(),
        InputKey::Char('G') | InputKey::End => list.select_last(),
        InputKey::PageDown => list.page_down(),
        InputKey::PageUp => list.page_up(),
        InputKey::Enter => {
            if let Some(server) = list.selected_server() {
                return UpdateResult::message(Message::OpenDetails {
                    ip: server.ip.clone(),
                });
            }
        }

        // Filters and sorting
        InputKey::Char('/') => state.search_active = true,
        InputKey::Char('f') => list.cycle_type_filter(),
        InputKey::Char('v') => list.cycle_flavor_filter(),
        InputKey::Char('b') => list.cycle_base_version_filter(),
        InputKey::Char('c') => list.clear_filters(),
        InputKey::Char('n') => list.cycle_sort_key(),
        InputKey::Char('N') => list.flip_sort_direction(),

        // Server management
        InputKey::Char('a') => servers::open_add_dialog(state, AddMode::Addresses),
        InputKey::Char('i') => servers::open_add_dialog(state, AddMode::ImportFile),
        InputKey::Char('e') => {
            if let Some(ip) = list.selected_server().map(|s| s.ip.clone()) {
                servers::open_edit_dialog(state, &ip);
            }
        }
        InputKey::Char('d') => {
            if let Some(server) = list.selected_server().cloned() {
                servers::confirm_delete(state, &server);
            }
        }
        InputKey::Char('p') => {
            if let Some(server) = list.selected_server() {
                return UpdateResult::action(UpdateAction::TogglePause {
                    ip: server.ip.clone(),
                });
            }
        }
        InputKey::Char('o') => {
            if let Some(server) = list.selected_server().cloned() {
                return servers::open_player_popup(state, &server);
            }
        }
        InputKey::Char('r') => return servers::request_server_fetch(state).into(),

        // Global
        InputKey::Char('s') => return servers::open_settings(state),
        InputKey::Char('t') => return servers::toggle_theme(state),
        InputKey::Char('L') => return servers::cycle_language(state),
        InputKey::CharCtrl('x') => state.modal = Some(Modal::Confirm(ConfirmKind::Shutdown)),

        _ => {}
    }
    UpdateResult::none()
}

// ─────────────────────────────────────────────────────────────────────────────
// Details
// ─────────────────────────────────────────────────────────────────────────────

fn handle_key_details(state: &mut AppState, key: InputKey) -> UpdateResult {
    let Some(focus) = state.details.as_ref().map(|d| d.focus) else {
        return UpdateResult::message(Message::CloseDetails);
    };

    if focus == DetailsFocus::Console && state.console.is_live() {
        if let Some(result) = handle_key_console_input(state, key) {
            return result;
        }
    }

    match key {
        InputKey::Esc | InputKey::Char('q') | InputKey::Backspace => {
            return UpdateResult::message(Message::CloseDetails)
        }
        InputKey::Tab => with_details(state, |d| d.focus = d.focus.next()),
        InputKey::BackTab => with_details(state, |d| d.focus = d.focus.previous()),
        InputKey::Char('c') => with_details(state, |d| d.focus = DetailsFocus::Console),
        InputKey::Char('[') => return details_handler::step_period(state, false),
        InputKey::Char(']') => return details_handler::step_period(state, true),
        InputKey::Char('x') => return details_handler::export_history(state),
        InputKey::Char('w') => return servers::open_watchlist(state),
        InputKey::Char('e') => {
            if let Some(ip) = state.details.as_ref().map(|d| d.ip.clone()) {
                servers::open_edit_dialog(state, &ip);
            }
        }

        // Chart zoom, pan and series toggles
        InputKey::Char('+') | InputKey::Char('=') => with_details(state, |d| d.chart_view.zoom_in()),
        InputKey::Char('-') => with_details(state, |d| d.chart_view.zoom_out()),
        InputKey::Char('<') | InputKey::Char(',') => with_details(state, |d| d.chart_view.pan(-1.0)),
        InputKey::Char('>') | InputKey::Char('.') => with_details(state, |d| d.chart_view.pan(1.0)),
        InputKey::Char('0') => with_details(state, |d| d.chart_view.reset_zoom()),
        InputKey::Char(digit @ '1'..='4') => {
            if let Some(series) = Series::from_digit(digit) {
                with_details(state, |d| d.chart_view.toggle(series));
            }
        }

        other => return handle_key_details_focus(state, focus, other),
    }
    UpdateResult::none()
}

/// Arrow and page keys act on the focused panel.
fn handle_key_details_focus(state: &mut AppState, focus: DetailsFocus, key: InputKey) -> UpdateResult {
    match (focus, key) {
        (DetailsFocus::Heatmap, InputKey::PageUp) => details_handler::heatmap_previous(state),
        (DetailsFocus::Heatmap, InputKey::PageDown) => details_handler::heatmap_next(state),
        (DetailsFocus::Heatmap, InputKey::Left) => cursor(state, -1),
        (DetailsFocus::Heatmap, InputKey::Right) => cursor(state, 1),
        (DetailsFocus::Heatmap, InputKey::Up) => cursor(state, -7),
        (DetailsFocus::Heatmap, InputKey::Down) => cursor(state, 7),

        (DetailsFocus::Chart, InputKey::Left) => {
            with_details(state, |d| d.chart_view.pan(-1.0));
            UpdateResult::none()
        }
        (DetailsFocus::Chart, InputKey::Right) => {
            with_details(state, |d| d.chart_view.pan(1.0));
            UpdateResult::none()
        }

        (DetailsFocus::Timeline, InputKey::Down | InputKey::Char('j')) => {
            with_details(state, |d| {
                if d.timeline_scroll + 1 < d.timeline.len() {
                    d.timeline_scroll += 1;
                }
            });
            UpdateResult::none()
        }
        (DetailsFocus::Timeline, InputKey::Up | InputKey::Char('k')) => {
            with_details(state, |d| d.timeline_scroll = d.timeline_scroll.saturating_sub(1));
            UpdateResult::none()
        }

        (DetailsFocus::Players, InputKey::Down | InputKey::Char('j')) => {
            with_details(state, |d| {
                let total = d.players.online.len() + d.players.offline.len();
                if d.players_scroll + 1 < total {
                    d.players_scroll += 1;
                }
            });
            UpdateResult::none()
        }
        (DetailsFocus::Players, InputKey::Up | InputKey::Char('k')) => {
            with_details(state, |d| d.players_scroll = d.players_scroll.saturating_sub(1));
            UpdateResult::none()
        }

        (DetailsFocus::Console, InputKey::Up) => {
            let max = state.console.lines().len().saturating_sub(1);
            state.console.scroll_back = (state.console.scroll_back + 1).min(max);
            UpdateResult::none()
        }
        (DetailsFocus::Console, InputKey::Down) => {
            state.console.scroll_back = state.console.scroll_back.saturating_sub(1);
            UpdateResult::none()
        }

        _ => UpdateResult::none(),
    }
}

/// Typing into a live console. Returns `None` for keys it does not take.
fn handle_key_console_input(state: &mut AppState, key: InputKey) -> Option<UpdateResult> {
    match key {
        InputKey::Enter => {
            state.console.submit_input();
        }
        InputKey::Backspace => {
            state.console.input.pop();
        }
        InputKey::Esc => with_details(state, |d| d.focus = DetailsFocus::Chart),
        other => {
            let c = other.typed_char()?;
            state.console.input.push(c);
        }
    }
    Some(UpdateResult::none())
}

fn with_details(state: &mut AppState, f: impl FnOnce(&mut crate::details::DetailsState)) {
    if let Some(details) = state.details.as_mut() {
        f(details);
    }
}

fn cursor(state: &mut AppState, delta: i32) -> UpdateResult {
    with_details(state, |d| d.heatmap.move_cursor(delta));
    UpdateResult::none()
}

// ─────────────────────────────────────────────────────────────────────────────
// Modals
// ─────────────────────────────────────────────────────────────────────────────

fn handle_modal_key(state: &mut AppState, kind: ModalKind, key: InputKey) -> UpdateResult {
    match kind {
        ModalKind::Alert => {
            if matches!(key, InputKey::Enter | InputKey::Esc) {
                state.modal = None;
            }
            UpdateResult::none()
        }
        ModalKind::Confirm => match key {
            InputKey::Char('y') | InputKey::Char('Y') | InputKey::Enter => {
                servers::confirm_accepted(state)
            }
            InputKey::Char('n') | InputKey::Char('N') | InputKey::Esc => {
                state.modal = None;
                UpdateResult::none()
            }
            _ => UpdateResult::none(),
        },
        ModalKind::Players => {
            if matches!(key, InputKey::Esc | InputKey::Enter | InputKey::Char('q')) {
                state.modal = None;
            }
            UpdateResult::none()
        }
        ModalKind::Add => handle_add_key(state, key),
        ModalKind::Edit => handle_edit_key(state, key),
        ModalKind::Settings => handle_settings_key(state, key),
        ModalKind::Watchlist => handle_watchlist_key(state, key),
    }
}

fn handle_add_key(state: &mut AppState, key: InputKey) -> UpdateResult {
    let Some(Modal::AddServers(dialog)) = state.modal.as_mut() else {
        return UpdateResult::none();
    };
    match key {
        // The run keeps going in the background; its log is lost with the dialog
        InputKey::Esc => state.modal = None,
        InputKey::Enter => return servers::submit_add(state),
        InputKey::Tab | InputKey::BackTab if !dialog.running => dialog.toggle_mode(),
        other if !dialog.running => {
            dialog.input.handle_key(other);
        }
        _ => {}
    }
    UpdateResult::none()
}

fn handle_edit_key(state: &mut AppState, key: InputKey) -> UpdateResult {
    let Some(Modal::EditServer(dialog)) = state.modal.as_mut() else {
        return UpdateResult::none();
    };
    if dialog.saving {
        return UpdateResult::none();
    }
    match key {
        InputKey::Esc => state.modal = None,
        InputKey::Enter => return servers::submit_edit(state),
        InputKey::Tab | InputKey::Down => dialog.focus = dialog.focus.next(),
        InputKey::BackTab | InputKey::Up => dialog.focus = dialog.focus.previous(),
        InputKey::CharCtrl('u') => dialog.unlock_rcon(),
        other => {
            dialog.edit_focused(other);
        }
    }
    UpdateResult::none()
}

fn handle_settings_key(state: &mut AppState, key: InputKey) -> UpdateResult {
    let Some(Modal::Settings(dialog)) = state.modal.as_mut() else {
        return UpdateResult::none();
    };
    match key {
        InputKey::Esc => state.modal = None,
        _ if dialog.load.is_loading() || dialog.saving => {}
        InputKey::Enter => return servers::submit_settings(state),
        InputKey::Tab | InputKey::Down => dialog.focus = dialog.focus.next(),
        InputKey::BackTab | InputKey::Up => dialog.focus = dialog.focus.previous(),
        InputKey::Char(' ') if dialog.flag(dialog.focus).is_some() => dialog.toggle_focused(),
        other if dialog.flag(dialog.focus).is_none() => {
            dialog.webhook.handle_key(other);
        }
        _ => {}
    }
    UpdateResult::none()
}

fn handle_watchlist_key(state: &mut AppState, key: InputKey) -> UpdateResult {
    let Some(Modal::Watchlist(panel)) = state.modal.as_mut() else {
        return UpdateResult::none();
    };
    match key {
        InputKey::Esc => state.modal = None,
        InputKey::Enter => return servers::submit_watchlist_add(state),
        InputKey::Delete => return servers::remove_selected_watch(state),
        InputKey::Up => panel.selected = panel.selected.saturating_sub(1),
        InputKey::Down => {
            if panel.selected + 1 < panel.entries.len() {
                panel.selected += 1;
            }
        }
        other => {
            panel.input.handle_key(other);
        }
    }
    UpdateResult::none()
}
