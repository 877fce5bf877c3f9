//! Online and recently seen players

use blockspy_core::i18n::Translations;
use blockspy_core::relative_time::format_last_seen;
use blockspy_core::types::PlayerLists;
use chrono::{DateTime, Utc};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::text::fit_spans;
use crate::theme::{styles, Palette};

pub struct PlayersPanel<'a> {
    players: &'a PlayerLists,
    max_players: Option<i64>,
    scroll: usize,
    now: DateTime<Utc>,
    t: &'a Translations,
    palette: &'a Palette,
    focused: bool,
}

impl<'a> PlayersPanel<'a> {
    pub fn new(
        players: &'a PlayerLists,
        max_players: Option<i64>,
        now: DateTime<Utc>,
        t: &'a Translations,
        palette: &'a Palette,
    ) -> Self {
        Self {
            players,
            max_players,
            scroll: 0,
            now,
            t,
            palette,
            focused: false,
        }
    }

    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn online_header(&self) -> String {
        let count = self.players.online.len().to_string();
        match self.max_players {
            Some(max) if max > 0 => self.t.format(
                "players.online_of",
                "Online players ({n} / {max})",
                &[("n", &count), ("max", &max.to_string())],
            ),
            _ => self
                .t
                .format("players.online", "Online players ({n})", &[("n", &count)]),
        }
    }

    fn lines(&self, width: usize) -> Vec<Line<'static>> {
        let p = self.palette;
        let mut lines = vec![Line::styled(self.online_header(), styles::accent(p))];

        let online = self.players.sorted_online();
        if online.is_empty() {
            lines.push(Line::styled(
                format!("  {}", self.t.get("players.none_online", "Nobody online")),
                styles::text_muted(p),
            ));
        }
        for name in online {
            lines.push(Line::from(vec![
                Span::styled("  ● ", styles::success(p)),
                Span::styled(name, styles::text_primary(p)),
            ]));
        }

        lines.push(Line::raw(""));
        lines.push(Line::styled(
            self.t.format(
                "players.offline",
                "Recently seen ({n})",
                &[("n", &self.players.offline.len().to_string())],
            ),
            styles::text_secondary(p),
        ));
        for player in &self.players.offline {
            let seen = format_last_seen(player.last_seen.as_deref(), self.now, self.t);
            let spans = vec![
                Span::styled("  ○ ", styles::text_muted(p)),
                Span::styled(player.name.clone(), styles::text_primary(p)),
                Span::raw("  "),
                Span::styled(seen, styles::text_muted(p)),
            ];
            lines.push(Line::from(fit_spans(spans, width)));
        }
        lines
    }
}

impl Widget for PlayersPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let p = self.palette;
        let title = Line::from(Span::styled(
            format!(" {} ", self.t.get("players.title", "Players")),
            styles::text_bright_bold(p),
        ));
        let block = styles::glass_block(p, self.focused).title(title);
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let lines: Vec<Line> = self
            .lines(inner.width as usize)
            .into_iter()
            .skip(self.scroll)
            .collect();
        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;
    use crate::theme::palette::DARK;
    use blockspy_core::types::OfflinePlayer;
    use chrono::TimeZone;

    fn lists() -> PlayerLists {
        PlayerLists {
            online: vec!["zed".into(), "Alex".into()],
            offline: vec![OfflinePlayer {
                name: "Steve".into(),
                last_seen: Some("2024-06-10T11:50:00+00:00".into()),
            }],
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_online_header_with_capacity() {
        let players = lists();
        let t = Translations::builtin("en");
        let mut term = TestTerminal::with_size(50, 10);
        term.render_widget(
            PlayersPanel::new(&players, Some(20), now(), &t, &DARK),
            term.area(),
        );
        assert!(term.buffer_contains("Online players (2 / 20)"));
        assert!(term.buffer_contains("Steve  10 min ago"));
    }

    #[test]
    fn test_online_sorted_case_insensitive() {
        let players = lists();
        let t = Translations::builtin("en");
        let mut term = TestTerminal::with_size(50, 10);
        term.render_widget(
            PlayersPanel::new(&players, None, now(), &t, &DARK),
            term.area(),
        );
        assert!(term.buffer_contains("Online players (2)"));
        assert!(term.line_contains(2, "Alex"));
        assert!(term.line_contains(3, "zed"));
    }

    #[test]
    fn test_scroll_skips_lines() {
        let players = lists();
        let t = Translations::builtin("en");
        let mut term = TestTerminal::with_size(50, 10);
        term.render_widget(
            PlayersPanel::new(&players, Some(0), now(), &t, &DARK).scroll(1),
            term.area(),
        );
        assert!(!term.buffer_contains("Online players"));
        assert!(term.buffer_contains("Alex"));
    }
}
