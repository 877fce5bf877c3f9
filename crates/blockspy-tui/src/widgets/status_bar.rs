//! Bottom status line: the latest notice, or key hints for the current screen

use blockspy_app::details::{DetailsFocus, DetailsState};
use blockspy_app::state::{AppState, View};
use blockspy_core::heatmap::layout_month;
use blockspy_core::types::format_number;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::text::fit_spans;
use crate::theme::{styles, Palette};

pub struct StatusBar<'a> {
    state: &'a AppState,
    palette: &'a Palette,
}

impl<'a> StatusBar<'a> {
    pub fn new(state: &'a AppState, palette: &'a Palette) -> Self {
        Self { state, palette }
    }

    fn hints(&self) -> Vec<(&'static str, &'a str)> {
        let s = self.state;
        match s.view {
            View::Stopped => vec![("q", s.tr("hint.quit", "quit"))],
            View::Dashboard if s.search_active => vec![
                ("Enter", s.tr("hint.done", "done")),
                ("Esc", s.tr("hint.done", "done")),
            ],
            View::Dashboard => vec![
                ("Enter", s.tr("hint.open", "open")),
                ("/", s.tr("hint.search", "search")),
                ("f v b", s.tr("hint.filters", "filters")),
                ("n N", s.tr("hint.sort", "sort")),
                ("a i", s.tr("hint.add", "add/import")),
                ("e d p", s.tr("hint.manage", "edit/delete/pause")),
                ("s", s.tr("hint.settings", "settings")),
                ("t L", s.tr("hint.look", "theme/language")),
                ("q", s.tr("hint.quit", "quit")),
            ],
            View::Details => {
                let mut hints = vec![
                    ("Esc", s.tr("hint.back", "back")),
                    ("Tab", s.tr("hint.focus", "focus")),
                    ("[ ]", s.tr("hint.period", "period")),
                ];
                let focus = s.details.as_ref().map(|d| d.focus);
                match focus {
                    Some(DetailsFocus::Chart) => {
                        hints.push(("+ - < > 0", s.tr("hint.zoom", "zoom")));
                        hints.push(("1-4", s.tr("hint.series", "series")));
                    }
                    Some(DetailsFocus::Heatmap) => {
                        hints.push(("PgUp PgDn", s.tr("hint.month", "month")));
                        hints.push(("arrows", s.tr("hint.day", "day")));
                    }
                    Some(DetailsFocus::Console) => {
                        hints.push(("Enter", s.tr("hint.send", "send")));
                    }
                    _ => hints.push(("j k", s.tr("hint.scroll", "scroll"))),
                }
                hints.push(("x", s.tr("hint.export", "export")));
                hints.push(("w", s.tr("hint.watchlist", "watchlist")));
                hints.push(("e", s.tr("hint.edit", "edit")));
                hints
            }
        }
    }

    fn tooltip(&self, details: &DetailsState) -> Option<String> {
        let s = self.state;
        let date = details.heatmap.cursor_date()?;
        let grid = layout_month(
            details.heatmap.month,
            &details.heatmap.data,
            details.server.players_max.unwrap_or(0),
            s.today(),
        );
        let day = grid.days.iter().find(|d| d.date == date)?;
        let tip = day.tooltip()?;
        let when = tip.date.format("%d/%m/%Y").to_string();
        Some(match (tip.average, tip.percent) {
            (Some(avg), Some(pct)) => s.translations.format(
                "heatmap.tooltip",
                "{date}: {average} players avg ({percent}%)",
                &[
                    ("date", &when),
                    ("average", &format_number((avg * 10.0).round() / 10.0)),
                    ("percent", &pct.to_string()),
                ],
            ),
            (Some(avg), None) => s.translations.format(
                "heatmap.tooltip_no_max",
                "{date}: {average} players avg",
                &[
                    ("date", &when),
                    ("average", &format_number((avg * 10.0).round() / 10.0)),
                ],
            ),
            _ => s.translations.format(
                "heatmap.tooltip_empty",
                "{date}: no data",
                &[("date", &when)],
            ),
        })
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let p = self.palette;
        let width = area.width as usize;

        if let Some(notice) = &self.state.notice {
            let line = Line::from(fit_spans(
                vec![Span::styled(format!(" {}", notice), styles::accent(p))],
                width,
            ));
            Paragraph::new(line).render(area, buf);
            return;
        }

        let mut spans = Vec::new();
        if let Some(details) = self.state.details.as_ref().filter(|_| self.state.view == View::Details) {
            if details.focus == DetailsFocus::Heatmap {
                if let Some(tip) = self.tooltip(details) {
                    spans.push(Span::styled(format!(" {} ", tip), styles::text_bright_bold(p)));
                    spans.push(Span::styled("│", styles::text_muted(p)));
                }
            }
        }
        for (key, label) in self.hints() {
            spans.push(Span::styled(format!(" {}", key), styles::keybinding(p)));
            spans.push(Span::styled(format!(" {} ", label), styles::text_muted(p)));
        }
        Paragraph::new(Line::from(fit_spans(spans, width))).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;
    use crate::theme::palette::DARK;
    use blockspy_core::types::{CalendarEntry, ServerSummary};

    #[test]
    fn test_dashboard_hints() {
        let state = AppState::new();
        let mut term = TestTerminal::with_size(160, 1);
        term.render_widget(StatusBar::new(&state, &DARK), term.area());
        assert!(term.buffer_contains("/ search"));
        assert!(term.buffer_contains("q quit"));
    }

    #[test]
    fn test_notice_replaces_hints() {
        let mut state = AppState::new();
        state.notice = Some("Saved".into());
        let mut term = TestTerminal::with_size(80, 1);
        term.render_widget(StatusBar::new(&state, &DARK), term.area());
        assert!(term.buffer_contains("Saved"));
        assert!(!term.buffer_contains("quit"));
    }

    #[test]
    fn test_heatmap_tooltip_for_cursor_day() {
        let mut state = AppState::new();
        let today = state.today();
        let mut server = ServerSummary::new("a.net");
        server.players_max = Some(20);
        let mut details = DetailsState::new(server, 1, 24, today);
        details.focus = DetailsFocus::Heatmap;
        let month = details.heatmap.month;
        let entry = CalendarEntry {
            timestamp: today.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp(),
            value: 10.0,
        };
        details.heatmap.apply(month, &[entry]);
        state.details = Some(details);
        state.view = View::Details;

        let mut term = TestTerminal::with_size(160, 1);
        term.render_widget(StatusBar::new(&state, &DARK), term.area());
        assert!(term.buffer_contains("10 players avg (50%)"));
        assert!(term.buffer_contains("PgUp PgDn"));
    }
}
