//! Details header: name, status, summary stats and the period selector

use blockspy_app::config::HISTORY_PERIODS;
use blockspy_app::details::DetailsState;
use blockspy_core::i18n::Translations;
use blockspy_core::types::{format_number, StatusBadge};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::text::{fit_spans, period_label, server_name_spans};
use crate::theme::{styles, Palette};

pub struct DetailsHeader<'a> {
    details: &'a DetailsState,
    t: &'a Translations,
    palette: &'a Palette,
}

impl<'a> DetailsHeader<'a> {
    pub fn new(details: &'a DetailsState, t: &'a Translations, palette: &'a Palette) -> Self {
        Self {
            details,
            t,
            palette,
        }
    }

    fn title_line(&self, width: usize) -> Line<'static> {
        let p = self.palette;
        let server = &self.details.server;
        let badge = server.badge();
        let badge_label = match badge {
            StatusBadge::Paused => self.t.get("status.paused", "Paused"),
            StatusBadge::Online => self.t.get("status.online", "Online"),
            StatusBadge::Checking => self.t.get("status.checking", "Checking..."),
            StatusBadge::Offline => self.t.get("status.offline", "Offline"),
        };

        let mut spans = server_name_spans(p, server);
        spans.push(Span::raw("  "));
        spans.push(Span::styled(format!("● {}", badge_label), styles::badge(p, badge)));
        spans.push(Span::raw("  "));
        spans.push(Span::styled(server.ip.clone(), styles::text_secondary(p)));
        if self.details.refresh_in_flight || self.details.load.is_loading() {
            spans.push(Span::styled("  ⟳", styles::accent(p)));
        }
        Line::from(fit_spans(spans, width))
    }

    fn stats_line(&self) -> Line<'static> {
        let p = self.palette;
        let Some(stats) = &self.details.stats else {
            return Line::styled("--", styles::text_muted(p));
        };
        let label = |key: &str, default: &str| {
            Span::styled(
                format!("{} ", self.t.get(key, default)),
                styles::text_secondary(p),
            )
        };
        let sep = Span::styled(" · ", styles::text_muted(p));
        Line::from(vec![
            label("stats.uptime", "Uptime"),
            Span::styled(
                format!("{}%", format_number((stats.uptime_percent * 10.0).round() / 10.0)),
                styles::text_bright_bold(p),
            ),
            sep.clone(),
            label("stats.peak", "Peak"),
            Span::styled(stats.peak_players.to_string(), styles::text_bright_bold(p)),
            sep,
            label("stats.average", "Average"),
            Span::styled(
                format_number((stats.average_players * 10.0).round() / 10.0),
                styles::text_bright_bold(p),
            ),
        ])
    }

    fn period_spans(&self) -> Vec<Span<'static>> {
        let p = self.palette;
        let mut spans = vec![Span::styled(
            format!("{} ", self.t.get("details.period", "Period")),
            styles::text_secondary(p),
        )];
        for hours in HISTORY_PERIODS {
            let label = format!(" {} ", period_label(hours));
            let style = if hours == self.details.hours {
                styles::focused_selected(p)
            } else {
                styles::text_muted(p)
            };
            spans.push(Span::styled(label, style));
        }
        if self.details.chart_view.is_zoomed() {
            spans.push(Span::styled(
                format!("  {}", self.t.get("chart.zoomed", "zoomed")),
                styles::accent(p),
            ));
        }
        spans
    }
}

impl Widget for DetailsHeader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(self.palette, false);
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let mut second = self.stats_line().spans;
        second.push(Span::raw("    "));
        second.extend(self.period_spans());

        let width = inner.width as usize;
        Paragraph::new(vec![
            self.title_line(width),
            Line::from(fit_spans(second, width)),
        ])
        .render(inner, buf);
    }
}
