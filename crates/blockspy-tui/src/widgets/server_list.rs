//! Server list: one two-line row block per server
//!
//! Rendering sizes the viewport, so the list state learns how many rows fit
//! and which servers are on screen (the lazy icon loader reads that window).

use blockspy_app::server_list::{IconState, ServerListState};
use blockspy_core::i18n::Translations;
use blockspy_core::types::{ServerSummary, StatusBadge};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, StatefulWidget, Widget},
};

use super::text::{fit_spans, server_name_spans};
use crate::theme::{styles, Palette};

/// Terminal rows per server.
pub const ROW_HEIGHT: u16 = 2;

/// Leading column reserved for the selection marker.
const MARKER_WIDTH: u16 = 1;

pub struct ServerList<'a> {
    t: &'a Translations,
    palette: &'a Palette,
}

impl<'a> ServerList<'a> {
    pub fn new(t: &'a Translations, palette: &'a Palette) -> Self {
        Self { t, palette }
    }

    fn badge_label(&self, badge: StatusBadge) -> &'a str {
        match badge {
            StatusBadge::Paused => self.t.get("status.paused", "Paused"),
            StatusBadge::Online => self.t.get("status.online", "Online"),
            StatusBadge::Checking => self.t.get("status.checking", "Checking..."),
            StatusBadge::Offline => self.t.get("status.offline", "Offline"),
        }
    }

    fn icon_span(&self, server: &ServerSummary, icon: IconState) -> Span<'static> {
        let p = self.palette;
        match icon {
            IconState::Loaded => Span::styled(" ◆ ", styles::focused_selected(p)),
            IconState::Loading => Span::styled(" … ", styles::text_muted(p)),
            IconState::Placeholder => Span::styled(
                format!(" {} ", server.initial()),
                Style::default().fg(p.text_bright).bg(p.border_dim),
            ),
        }
    }

    fn first_line(&self, server: &ServerSummary, icon: IconState, width: usize) -> Line<'static> {
        let p = self.palette;
        let badge = server.badge();
        let badge_text = format!("● {}", self.badge_label(badge));
        let badge_width = badge_text.chars().count() + 1;

        let mut spans = vec![self.icon_span(server, icon), Span::raw(" ")];
        spans.extend(server_name_spans(p, server));
        let mut spans = fit_spans(spans, width.saturating_sub(badge_width + 1));

        let used: usize = spans
            .iter()
            .map(|s| unicode_width::UnicodeWidthStr::width(s.content.as_ref()))
            .sum();
        let pad = width.saturating_sub(used + badge_width);
        spans.push(Span::raw(" ".repeat(pad)));
        spans.push(Span::styled(badge_text, styles::badge(p, badge)));
        Line::from(spans)
    }

    fn second_line(&self, server: &ServerSummary, width: usize) -> Line<'static> {
        let p = self.palette;
        let sep = || Span::styled(" · ", styles::text_muted(p));
        let location = match (server.location.as_deref(), server.country_code.as_deref()) {
            (Some(loc), Some(cc)) if !loc.is_empty() => format!("{} ({})", loc, cc),
            (Some(loc), _) if !loc.is_empty() => loc.to_string(),
            (_, Some(cc)) => cc.to_string(),
            _ => "--".to_string(),
        };

        let spans = vec![
            Span::raw("    "),
            Span::styled(server.ip.clone(), styles::text_secondary(p)),
            sep(),
            Span::styled(server.kind().label().to_string(), styles::text_secondary(p)),
            sep(),
            Span::styled(location, styles::text_secondary(p)),
            sep(),
            Span::styled(server.version_label(), styles::text_primary(p)),
            sep(),
            Span::styled(server.ping_label(), styles::accent(p)),
            sep(),
            Span::styled(server.players_label(), styles::text_primary(p)),
        ];
        Line::from(fit_spans(spans, width))
    }

    fn empty_message(&self, state: &ServerListState) -> (String, Style) {
        let p = self.palette;
        if !state.loaded {
            return (
                self.t.get("list.loading", "Loading servers...").to_string(),
                styles::text_muted(p),
            );
        }
        if state.all().is_empty() {
            if let Some(error) = &state.last_error {
                return (
                    self.t
                        .format("list.failed", "Could not load servers: {error}", &[("error", error)]),
                    styles::error(p),
                );
            }
            return (
                self.t
                    .get("list.empty", "No servers yet. Press a to add one.")
                    .to_string(),
                styles::text_muted(p),
            );
        }
        (
            self.t
                .get("list.no_match", "No servers match the filters")
                .to_string(),
            styles::text_muted(p),
        )
    }
}

impl StatefulWidget for ServerList<'_> {
    type State = ServerListState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut ServerListState) {
        let p = self.palette;
        let block = styles::glass_block(p, true);
        let inner = block.inner(area);
        block.render(area, buf);

        state.viewport_rows = (inner.height / ROW_HEIGHT) as usize;
        state.ensure_selected_visible();

        if state.visible().is_empty() {
            let (message, style) = self.empty_message(state);
            Paragraph::new(Line::styled(message, style))
                .centered()
                .render(inner, buf);
            return;
        }

        let content_x = inner.x + MARKER_WIDTH.min(inner.width);
        let content_width = inner.width.saturating_sub(MARKER_WIDTH);
        let width = content_width as usize;
        let selected_ip = state.selected_server().map(|s| s.ip.clone());
        for (i, server) in state.window().iter().enumerate() {
            let y = inner.y + i as u16 * ROW_HEIGHT;
            let height = ROW_HEIGHT.min(inner.bottom() - y);
            let row = Rect::new(inner.x, y, inner.width, height);
            let selected = selected_ip.as_deref() == Some(server.ip.as_str());
            let row_style = if selected {
                Style::default().bg(p.popup_bg)
            } else {
                Style::default()
            };

            let icon = state.icon_state(&server.ip);
            let lines = vec![
                self.first_line(server, icon, width),
                self.second_line(server, width),
            ];
            buf.set_style(row, row_style);
            Paragraph::new(lines)
                .style(row_style)
                .render(Rect::new(content_x, y, content_width, height), buf);

            if selected && MARKER_WIDTH <= inner.width {
                for dy in 0..height {
                    if let Some(cell) = buf.cell_mut((inner.x, y + dy)) {
                        cell.set_char('▌');
                        cell.set_fg(p.accent);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;
    use crate::theme::palette::DARK;
    use blockspy_core::types::ServerStatus;

    fn online(ip: &str, name: &str) -> ServerSummary {
        let mut s = ServerSummary::new(ip);
        s.advertised_name = Some(name.into());
        s.status = ServerStatus::Online;
        s.ping = Some(42.0);
        s.players_online = Some(5);
        s.players_max = Some(20);
        s.version = Some("Paper 1.20.4".into());
        s.server_type = Some("Original".into());
        s.location = Some("São Paulo".into());
        s.country_code = Some("BR".into());
        s
    }

    #[test]
    fn test_online_row_shows_live_fields() {
        let mut state = ServerListState::new();
        state.replace_all(vec![online("mc.example.net", "§aLobby")]);
        let t = Translations::builtin("en");

        let mut term = TestTerminal::with_size(100, 8);
        term.render_stateful_widget(ServerList::new(&t, &DARK), term.area(), &mut state);

        assert!(term.buffer_contains("Lobby"));
        assert!(term.buffer_contains("● Online"));
        assert!(term.buffer_contains("42ms"));
        assert!(term.buffer_contains("5 / 20"));
        assert!(term.buffer_contains("Paper 1.20.4"));
        assert!(term.buffer_contains("São Paulo (BR)"));
    }

    #[test]
    fn test_offline_row_hides_live_fields() {
        let mut server = online("down.net", "Down");
        server.status = ServerStatus::Offline;
        let mut state = ServerListState::new();
        state.replace_all(vec![server]);
        let t = Translations::builtin("en");

        let mut term = TestTerminal::with_size(100, 8);
        term.render_stateful_widget(ServerList::new(&t, &DARK), term.area(), &mut state);

        assert!(term.buffer_contains("● Offline"));
        assert!(!term.buffer_contains("42ms"));
        assert!(term.buffer_contains("-- · -- · --"));
    }

    #[test]
    fn test_paused_badge_wins() {
        let mut server = online("p.net", "Paused one");
        server.paused = true;
        let mut state = ServerListState::new();
        state.replace_all(vec![server]);
        let t = Translations::builtin("pt-BR");

        let mut term = TestTerminal::with_size(100, 8);
        term.render_stateful_widget(ServerList::new(&t, &DARK), term.area(), &mut state);
        assert!(term.buffer_contains("● Pausado"));
    }

    #[test]
    fn test_render_sets_viewport_rows() {
        let servers: Vec<_> = (0..20)
            .map(|i| online(&format!("s{i:02}.net"), "x"))
            .collect();
        let mut state = ServerListState::new();
        state.replace_all(servers);
        let t = Translations::builtin("en");

        // 12 rows minus borders = 10 inner rows = 5 servers
        let mut term = TestTerminal::with_size(80, 12);
        term.render_stateful_widget(ServerList::new(&t, &DARK), term.area(), &mut state);

        assert_eq!(state.viewport_rows, 5);
        assert_eq!(state.window().len(), 5);
        assert!(term.buffer_contains("s00.net"));
        assert!(!term.buffer_contains("s05.net"));
    }

    #[test]
    fn test_empty_states() {
        let t = Translations::builtin("en");
        let mut state = ServerListState::new();
        let mut term = TestTerminal::with_size(80, 8);
        term.render_stateful_widget(ServerList::new(&t, &DARK), term.area(), &mut state);
        assert!(term.buffer_contains("Loading servers..."));

        state.replace_all(Vec::new());
        term.render_stateful_widget(ServerList::new(&t, &DARK), term.area(), &mut state);
        assert!(term.buffer_contains("No servers yet"));
    }

    #[test]
    fn test_placeholder_icon_shows_initial() {
        let mut state = ServerListState::new();
        state.replace_all(vec![online("a.net", "zeta")]);
        let t = Translations::builtin("en");
        let mut term = TestTerminal::with_size(80, 6);
        term.render_stateful_widget(ServerList::new(&t, &DARK), term.area(), &mut state);
        assert!(term.buffer_contains(" Z "));
    }

    #[test]
    fn test_selection_marker_keeps_icon_intact() {
        let mut state = ServerListState::new();
        state.replace_all(vec![online("a.net", "zeta"), online("b.net", "beta")]);
        let t = Translations::builtin("en");
        let mut term = TestTerminal::with_size(80, 8);
        term.render_stateful_widget(ServerList::new(&t, &DARK), term.area(), &mut state);

        let selected_line = (1..5)
            .find(|y| term.line_contains(*y, "▌"))
            .expect("selected row");
        assert!(term.line_contains(selected_line, "▌ "));
        assert!(term.line_contains(selected_line + 1, "▌    "));
        // Both rows carry their own placeholder, selected or not
        assert_eq!(term.content().matches('▌').count(), 2);
        assert!(term.buffer_contains(" Z  zeta"));
        assert!(term.buffer_contains(" B  beta"));
    }
}
