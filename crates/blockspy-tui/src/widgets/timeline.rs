//! Recent events, newest first as the backend sends them

use blockspy_core::i18n::Translations;
use blockspy_core::timeline::{TimelineDetail, TimelineEntry};
use blockspy_core::types::EventKind;
use chrono::Local;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::text::fit_spans;
use crate::theme::{styles, Palette};

pub struct Timeline<'a> {
    entries: &'a [TimelineEntry],
    scroll: usize,
    t: &'a Translations,
    palette: &'a Palette,
    focused: bool,
}

/// Human text of one entry.
pub fn describe(entry: &TimelineEntry, t: &Translations) -> String {
    match &entry.detail {
        TimelineDetail::ServerOnline { players } => t.format(
            "timeline.online",
            "Server online with {n} players",
            &[("n", &players.to_string())],
        ),
        TimelineDetail::ServerOffline => t.get("timeline.offline", "Server went offline").to_string(),
        TimelineDetail::PlayerJoined { player } => {
            t.format("timeline.joined", "{player} joined", &[("player", player)])
        }
        TimelineDetail::PlayerLeft { player } => {
            t.format("timeline.left", "{player} left", &[("player", player)])
        }
        TimelineDetail::NewPeak { players } => t.format(
            "timeline.peak",
            "New player peak: {n}",
            &[("n", &players.to_string())],
        ),
        TimelineDetail::VersionChanged { from, to } => t.format(
            "timeline.version",
            "Version changed from {from} to {to}",
            &[("from", from), ("to", to)],
        ),
        TimelineDetail::Unparsed(text) => text.clone(),
    }
}

impl<'a> Timeline<'a> {
    pub fn new(
        entries: &'a [TimelineEntry],
        scroll: usize,
        t: &'a Translations,
        palette: &'a Palette,
    ) -> Self {
        Self {
            entries,
            scroll,
            t,
            palette,
            focused: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn icon(&self, kind: EventKind) -> Span<'static> {
        let p = self.palette;
        let (symbol, color) = match kind {
            EventKind::ServerOnline => ("▲", p.status_green),
            EventKind::ServerOffline => ("▼", p.status_red),
            EventKind::PlayerJoined => ("+", p.status_green),
            EventKind::PlayerLeft => ("-", p.text_muted),
            EventKind::NewPeak => ("★", p.status_yellow),
            EventKind::VersionChanged => ("↻", p.status_blue),
        };
        Span::styled(format!("{} ", symbol), Style::default().fg(color))
    }
}

impl Widget for Timeline<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let p = self.palette;
        let title = Line::from(Span::styled(
            format!(" {} ", self.t.get("timeline.title", "Timeline")),
            styles::text_bright_bold(p),
        ));
        let block = styles::glass_block(p, self.focused).title(title);
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        if self.entries.is_empty() {
            Paragraph::new(Line::styled(
                self.t.get("timeline.empty", "No recent events").to_string(),
                styles::text_muted(p),
            ))
            .centered()
            .render(inner, buf);
            return;
        }

        let width = inner.width as usize;
        let lines: Vec<Line> = self
            .entries
            .iter()
            .skip(self.scroll)
            .take(inner.height as usize)
            .map(|entry| {
                let when = entry
                    .at
                    .map(|at| at.with_timezone(&Local).format("%d/%m %H:%M").to_string())
                    .unwrap_or_else(|| "--/-- --:--".to_string());
                let spans = vec![
                    Span::styled(format!("{} ", when), styles::text_muted(p)),
                    self.icon(entry.kind),
                    Span::styled(describe(entry, self.t), styles::text_primary(p)),
                ];
                Line::from(fit_spans(spans, width))
            })
            .collect();
        Paragraph::new(lines).render(inner, buf);
    }
}
