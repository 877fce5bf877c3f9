//! Monthly occupancy calendar

use blockspy_app::details::{HeatmapState, LoadState};
use blockspy_core::heatmap::{layout_month, DayState};
use blockspy_core::i18n::Translations;
use chrono::{Datelike, NaiveDate};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::theme::{styles, Palette};

/// Columns per day cell.
const CELL_WIDTH: usize = 4;

pub struct Heatmap<'a> {
    heatmap: &'a HeatmapState,
    max_players: i64,
    today: NaiveDate,
    t: &'a Translations,
    palette: &'a Palette,
    focused: bool,
}

impl<'a> Heatmap<'a> {
    pub fn new(
        heatmap: &'a HeatmapState,
        max_players: i64,
        today: NaiveDate,
        t: &'a Translations,
        palette: &'a Palette,
    ) -> Self {
        Self {
            heatmap,
            max_players,
            today,
            t,
            palette,
            focused: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn title(&self) -> Line<'static> {
        let p = self.palette;
        let next_style = if self.heatmap.can_go_next(self.today) {
            styles::keybinding(p)
        } else {
            styles::text_muted(p)
        };
        let mut spans = vec![
            Span::styled(" ◀ ", styles::keybinding(p)),
            Span::styled(
                format!("{:02}/{}", self.heatmap.month.month, self.heatmap.month.year),
                styles::text_bright_bold(p),
            ),
            Span::styled(" ▶ ", next_style),
        ];
        if self.heatmap.load.is_loading() {
            spans.push(Span::styled("⟳ ", styles::accent(p)));
        }
        Line::from(spans)
    }

    fn weekday_header(&self) -> Line<'static> {
        let names = self.t.get("heatmap.weekdays", "Su Mo Tu We Th Fr Sa");
        let spans: Vec<Span> = names
            .split_whitespace()
            .take(7)
            .map(|name| {
                Span::styled(
                    format!(" {:<width$}", name, width = CELL_WIDTH - 1),
                    styles::text_secondary(self.palette),
                )
            })
            .collect();
        Line::from(spans)
    }
}

impl Widget for Heatmap<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let p = self.palette;
        let block = styles::glass_block(p, self.focused).title(self.title());
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        if let LoadState::Failed(error) = &self.heatmap.load {
            let text = self.t.format(
                "heatmap.failed",
                "Could not load calendar: {error}",
                &[("error", error)],
            );
            Paragraph::new(Line::styled(text, styles::error(p)))
                .centered()
                .render(inner, buf);
            return;
        }

        let grid = layout_month(
            self.heatmap.month,
            &self.heatmap.data,
            self.max_players,
            self.today,
        );

        let mut lines = vec![self.weekday_header()];
        for week in grid.weeks() {
            let mut spans = Vec::with_capacity(7);
            for cell in week {
                let Some(day) = cell else {
                    spans.push(Span::raw(" ".repeat(CELL_WIDTH)));
                    continue;
                };
                let text = format!(" {:>2} ", day.date.day());
                let mut style = match &day.state {
                    DayState::Future => Style::default()
                        .fg(p.text_muted)
                        .bg(p.heat_future),
                    DayState::Past { bucket, .. } => Style::default()
                        .fg(p.contrast_fg)
                        .bg(styles::heat_color(p, *bucket)),
                };
                if self.focused && day.date.day() == self.heatmap.cursor {
                    style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
                }
                spans.push(Span::styled(text, style));
            }
            lines.push(Line::from(spans));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;
    use crate::theme::palette::DARK;
    use blockspy_core::heatmap::MonthRef;
    use blockspy_core::types::CalendarEntry;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_calendar_renders_month_days() {
        let today = date(2024, 5, 15);
        let state = HeatmapState::new(today);
        let t = Translations::builtin("en");
        let mut term = TestTerminal::with_size(40, 10);
        term.render_widget(Heatmap::new(&state, 20, today, &t, &DARK), term.area());

        assert!(term.buffer_contains("05/2024"));
        assert!(term.buffer_contains("Su  Mo  Tu"));
        // May 2024 starts on a Wednesday
        assert!(term.line_contains(2, "  1   2   3   4 "));
        assert!(term.buffer_contains(" 31 "));
    }

    #[test]
    fn test_days_colored_by_bucket_and_future_dimmed() {
        let today = date(2024, 5, 15);
        let mut state = HeatmapState::new(today);
        let entry = CalendarEntry {
            timestamp: date(2024, 5, 1)
                .and_hms_opt(0, 0, 0)
                .unwrap()
                .and_utc()
                .timestamp(),
            value: 19.0,
        };
        state.apply(MonthRef::new(2024, 5), &[entry]);
        let t = Translations::builtin("en");
        let mut term = TestTerminal::with_size(40, 10);
        term.render_widget(Heatmap::new(&state, 20, today, &t, &DARK), term.area());

        let buf = term.buffer();
        // Row of the 1st: border, weekday header, first week
        let y = 2;
        let x = (0..buf.area.width)
            .find(|&x| buf[(x, y)].symbol() == "1")
            .unwrap();
        assert_eq!(buf[(x, y)].bg, DARK.heat_full);

        let last_row = (0..buf.area.height)
            .find(|&y| {
                (0..buf.area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
                    .contains("31")
            })
            .unwrap();
        let x31 = (0..buf.area.width)
            .find(|&x| buf[(x, last_row)].symbol() == "3")
            .unwrap();
        assert_eq!(buf[(x31, last_row)].bg, DARK.heat_future);
    }

    #[test]
    fn test_next_arrow_dimmed_on_current_month() {
        let today = date(2024, 5, 15);
        let state = HeatmapState::new(today);
        let t = Translations::builtin("en");
        let mut term = TestTerminal::with_size(40, 10);
        term.render_widget(Heatmap::new(&state, 20, today, &t, &DARK), term.area());

        let buf = term.buffer();
        let x = (0..buf.area.width)
            .find(|&x| buf[(x, 0)].symbol() == "▶")
            .unwrap();
        assert_eq!(buf[(x, 0)].fg, DARK.text_muted);
    }
}
