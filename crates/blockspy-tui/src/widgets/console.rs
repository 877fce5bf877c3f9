//! Live console panel: scrollback, RCON input, and the locked overlay

use blockspy_app::console_session::{ConsoleSession, SessionPhase, SystemMarker};
use blockspy_core::console::{ConsoleBanner, ConsoleLineKind};
use blockspy_core::i18n::Translations;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::text::{fit_spans, truncate};
use crate::theme::{styles, Palette};

pub struct ConsolePanel<'a> {
    session: &'a ConsoleSession,
    has_rcon: bool,
    t: &'a Translations,
    palette: &'a Palette,
    focused: bool,
}

impl<'a> ConsolePanel<'a> {
    pub fn new(
        session: &'a ConsoleSession,
        has_rcon: bool,
        t: &'a Translations,
        palette: &'a Palette,
    ) -> Self {
        Self {
            session,
            has_rcon,
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
        let text = match self.session.banner() {
            ConsoleBanner::Console => self.t.get("console.title", "Console"),
            ConsoleBanner::Live => self.t.get("console.live", "Live console"),
            ConsoleBanner::Rcon => self.t.get("console.rcon", "RCON console"),
        };
        let dot = match self.session.phase() {
            SessionPhase::Live => Span::styled("● ", styles::success(p)),
            SessionPhase::Connecting => Span::styled("● ", styles::accent(p)),
            SessionPhase::Idle | SessionPhase::Closed => Span::styled("● ", styles::text_muted(p)),
        };
        Line::from(vec![
            Span::raw(" "),
            dot,
            Span::styled(format!("{} ", text), styles::text_bright_bold(p)),
        ])
    }

    /// Text of the line at `index`, with local markers translated.
    fn line_text(&self, index: usize, raw: &str) -> String {
        match self.session.marker_at(index) {
            Some(SystemMarker::Connecting) => {
                self.t.get("console.connecting", "Connecting...").to_string()
            }
            Some(SystemMarker::Disconnected) => {
                self.t.get("console.disconnected", "Disconnected").to_string()
            }
            Some(SystemMarker::ConnectFailed) => self.t.format(
                "console.connect_failed",
                "connection failed: {error}",
                &[("error", raw)],
            ),
            Some(SystemMarker::Malformed) => self.t.format(
                "console.malformed",
                "malformed frame: {raw}",
                &[("raw", raw)],
            ),
            None => raw.to_string(),
        }
    }

    fn render_locked(&self, area: Rect, buf: &mut Buffer) {
        let p = self.palette;
        let lines = vec![
            Line::styled(
                self.t.get("console.locked", "RCON not configured").to_string(),
                styles::text_bright_bold(p),
            ),
            Line::styled(
                self.t
                    .get("console.locked_hint", "Press e to set the RCON port and password")
                    .to_string(),
                styles::text_muted(p),
            ),
        ];
        let y = area.y + area.height.saturating_sub(2) / 2;
        let rect = Rect::new(area.x, y, area.width, 2.min(area.height));
        Paragraph::new(lines).centered().render(rect, buf);
    }

    fn render_scrollback(&self, area: Rect, buf: &mut Buffer) {
        let p = self.palette;
        let all = self.session.lines();
        let rows = area.height as usize;
        let end = all.len().saturating_sub(self.session.scroll_back);
        let start = end.saturating_sub(rows);
        let width = area.width as usize;

        let lines: Vec<Line> = all[start..end]
            .iter()
            .enumerate()
            .map(|(offset, line)| {
                let text = self.line_text(start + offset, &line.text);
                let style = styles::console_line(p, line.kind);
                let prefix = match line.kind {
                    ConsoleLineKind::RconSent => "> ",
                    ConsoleLineKind::System => "* ",
                    _ => "",
                };
                Line::styled(truncate(&format!("{}{}", prefix, text), width), style)
            })
            .collect();
        Paragraph::new(lines).render(area, buf);
    }

    fn render_input(&self, area: Rect, buf: &mut Buffer) {
        let p = self.palette;
        let spans = if self.session.is_live() {
            let cursor = if self.focused { "█" } else { "" };
            vec![
                Span::styled("> ", styles::keybinding(p)),
                Span::styled(
                    format!("{}{}", self.session.input, cursor),
                    styles::text_primary(p),
                ),
            ]
        } else {
            vec![Span::styled(
                self.t
                    .get("console.offline_input", "Console not connected")
                    .to_string(),
                styles::text_muted(p),
            )]
        };
        Paragraph::new(Line::from(fit_spans(spans, area.width as usize))).render(area, buf);
    }
}

impl Widget for ConsolePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(self.palette, self.focused).title(self.title());
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        if !self.has_rcon {
            self.render_locked(inner, buf);
            return;
        }

        let [scrollback, input] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(inner);
        self.render_scrollback(scrollback, buf);
        self.render_input(input, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;
    use crate::theme::palette::DARK;

    #[test]
    fn test_locked_without_rcon() {
        let session = ConsoleSession::new();
        let t = Translations::builtin("en");
        let mut term = TestTerminal::with_size(60, 8);
        term.render_widget(ConsolePanel::new(&session, false, &t, &DARK), term.area());
        assert!(term.buffer_contains("RCON not configured"));
        assert!(term.buffer_contains("Press e to set the RCON port and password"));
    }

    #[test]
    fn test_connecting_marker_translated() {
        let mut session = ConsoleSession::new();
        session.open("a.net");
        let t = Translations::builtin("pt-BR");
        let mut term = TestTerminal::with_size(60, 8);
        term.render_widget(ConsolePanel::new(&session, true, &t, &DARK), term.area());
        assert!(term.buffer_contains("* Conectando..."));
        assert!(term.buffer_contains("Console não conectado"));
    }

    #[test]
    fn test_connect_failure_shows_error() {
        let mut session = ConsoleSession::new();
        let id = session.open("a.net");
        session.connect_failed(id, "refused");
        let t = Translations::builtin("en");
        let mut term = TestTerminal::with_size(60, 8);
        term.render_widget(ConsolePanel::new(&session, true, &t, &DARK), term.area());
        assert!(term.buffer_contains("connection failed: refused"));
    }
}
