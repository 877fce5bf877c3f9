//! Main render/view function (View in TEA pattern)

use blockspy_app::details::DetailsFocus;
use blockspy_app::state::{AppState, View};
use ratatui::{
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, Paragraph},
    Frame,
};

use crate::theme::{palette_for, styles, Palette};
use crate::{layout, widgets};

/// Render the complete UI.
///
/// Only render bookkeeping is written back to state: the server list learns
/// its viewport size here.
pub fn view(frame: &mut Frame, state: &mut AppState) {
    let area = frame.area();
    let palette = palette_for(state.preferences.theme);
    frame.render_widget(
        Block::default().style(Style::default().bg(palette.deepest_bg)),
        area,
    );

    match state.view {
        View::Details if state.details.is_some() => render_details(frame, state, palette, area),
        View::Stopped => render_stopped(frame, state, palette, area),
        View::Dashboard | View::Details => render_dashboard(frame, state, palette, area),
    }

    if let Some(modal) = &state.modal {
        frame.render_widget(
            widgets::ModalView::new(modal, &state.translations, palette),
            area,
        );
    }
}

fn render_dashboard(frame: &mut Frame, state: &mut AppState, palette: &Palette, area: Rect) {
    let areas = layout::dashboard(area);

    frame.render_widget(
        widgets::DashboardHeader::new(&state.server_list, &state.translations, palette)
            .search_active(state.search_active),
        areas.header,
    );
    frame.render_stateful_widget(
        widgets::ServerList::new(&state.translations, palette),
        areas.list,
        &mut state.server_list,
    );
    frame.render_widget(widgets::StatusBar::new(state, palette), areas.status);
}

fn render_details(frame: &mut Frame, state: &AppState, palette: &Palette, area: Rect) {
    let Some(details) = &state.details else {
        return;
    };
    let areas = layout::details(area);
    let t = &state.translations;
    let focus = details.focus;

    frame.render_widget(widgets::DetailsHeader::new(details, t, palette), areas.header);
    frame.render_widget(
        widgets::HistoryChart::new(details, t, palette).focused(focus == DetailsFocus::Chart),
        areas.chart,
    );

    frame.render_widget(
        widgets::ConsolePanel::new(&state.console, details.server.has_rcon(), t, palette)
            .focused(focus == DetailsFocus::Console),
        areas.console,
    );

    frame.render_widget(
        widgets::Heatmap::new(
            &details.heatmap,
            details.server.players_max.unwrap_or(0),
            state.today(),
            t,
            palette,
        )
        .focused(focus == DetailsFocus::Heatmap),
        areas.heatmap,
    );
    frame.render_widget(
        widgets::Timeline::new(&details.timeline, details.timeline_scroll, t, palette)
            .focused(focus == DetailsFocus::Timeline),
        areas.timeline,
    );
    frame.render_widget(
        widgets::PlayersPanel::new(
            &details.players,
            details.server.players_max,
            state.now,
            t,
            palette,
        )
        .scroll(details.players_scroll)
        .focused(focus == DetailsFocus::Players),
        areas.players,
    );
    frame.render_widget(widgets::StatusBar::new(state, palette), areas.status);
}

fn render_stopped(frame: &mut Frame, state: &AppState, palette: &Palette, area: Rect) {
    let lines = vec![
        Line::styled(
            state.tr("shutdown.stopped", "The monitoring backend was stopped."),
            styles::text_bright_bold(palette),
        ),
        Line::raw(""),
        Line::styled(
            state.tr("shutdown.quit_hint", "Press q to quit."),
            styles::text_muted(palette),
        ),
    ];
    let rect = widgets::modal_overlay::centered_rect(area.width, 3, area);
    frame.render_widget(Paragraph::new(lines).centered(), rect);
}
