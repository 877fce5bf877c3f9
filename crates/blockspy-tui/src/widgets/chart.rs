//! History chart: ping, occupancy and players on a shared 0-100 axis, with
//! player deltas as bars underneath

use blockspy_app::details::{ChartData, DetailsState, LoadState, Series};
use blockspy_core::i18n::Translations;
use blockspy_core::types::format_number;
use chrono::{DateTime, Local};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget},
};

use crate::theme::{styles, Palette};

/// Delta subchart height as a share of the plot area.
const DELTA_SHARE: u16 = 4;

pub struct HistoryChart<'a> {
    details: &'a DetailsState,
    t: &'a Translations,
    palette: &'a Palette,
    focused: bool,
}

/// Points within `[lo, hi]`, rescaled so `max` maps to 100.
fn windowed(points: &[(f64, f64)], [lo, hi]: [f64; 2], max: Option<f64>) -> Vec<(f64, f64)> {
    points
        .iter()
        .filter(|(x, _)| *x >= lo && *x <= hi)
        .map(|&(x, y)| match max {
            Some(m) if m > 0.0 => (x, y / m * 100.0),
            Some(_) => (x, 0.0),
            None => (x, y),
        })
        .collect()
}

fn time_label(x: f64, long_range: bool) -> String {
    let Some(at) = DateTime::from_timestamp(x as i64, 0) else {
        return String::new();
    };
    let local = at.with_timezone(&Local);
    if long_range {
        local.format("%d/%m %H:%M").to_string()
    } else {
        local.format("%H:%M").to_string()
    }
}

impl<'a> HistoryChart<'a> {
    pub fn new(details: &'a DetailsState, t: &'a Translations, palette: &'a Palette) -> Self {
        Self {
            details,
            t,
            palette,
            focused: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn legend(&self, data: &ChartData) -> Line<'static> {
        let p = self.palette;
        let view = &self.details.chart_view;
        let entry = |digit: &str, series: Series, color, text: String| {
            let style = if view.is_visible(series) {
                Style::default().fg(color)
            } else {
                styles::text_muted(p).add_modifier(Modifier::CROSSED_OUT)
            };
            vec![
                Span::styled(format!("{} ", digit), styles::keybinding(p)),
                Span::styled(format!("■ {}  ", text), style),
            ]
        };

        let mut spans = Vec::new();
        spans.extend(entry(
            "1",
            Series::Ping,
            p.series_ping,
            self.t.format(
                "chart.ping",
                "Ping (max {max}ms)",
                &[("max", &format_number(data.max_ping().round()))],
            ),
        ));
        spans.extend(entry(
            "2",
            Series::Occupancy,
            p.series_occupancy,
            self.t.get("chart.occupancy", "Occupancy %").to_string(),
        ));
        spans.extend(entry(
            "3",
            Series::Players,
            p.series_players,
            self.t.format(
                "chart.players",
                "Players (max {max})",
                &[("max", &format_number(data.max_players()))],
            ),
        ));
        spans.extend(entry(
            "4",
            Series::Delta,
            p.delta_up,
            self.t.get("chart.delta", "Δ players").to_string(),
        ));
        Line::from(spans)
    }

    fn render_message(&self, area: Rect, buf: &mut Buffer, text: String, style: Style) {
        if area.height == 0 {
            return;
        }
        let y = area.y + area.height / 2;
        Paragraph::new(Line::styled(text, style))
            .centered()
            .render(Rect::new(area.x, y, area.width, 1), buf);
    }

    fn render_main(&self, area: Rect, buf: &mut Buffer, data: &ChartData, bounds: [f64; 2]) {
        let p = self.palette;
        let view = &self.details.chart_view;

        let ping = windowed(&data.ping, bounds, Some(data.max_ping()));
        let occupancy = windowed(&data.occupancy, bounds, None);
        let players = windowed(&data.players, bounds, Some(data.max_players()));

        let series = [
            (Series::Occupancy, &occupancy, p.series_occupancy),
            (Series::Players, &players, p.series_players),
            (Series::Ping, &ping, p.series_ping),
        ];
        let datasets: Vec<Dataset> = series
            .into_iter()
            .filter(|(s, points, _)| view.is_visible(*s) && !points.is_empty())
            .map(|(_, points, color)| {
                Dataset::default()
                    .marker(Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(color))
                    .data(points)
            })
            .collect();

        let long_range = bounds[1] - bounds[0] > 86_400.0;
        let mid = (bounds[0] + bounds[1]) / 2.0;
        let x_labels = vec![
            Span::styled(time_label(bounds[0], long_range), styles::text_muted(p)),
            Span::styled(time_label(mid, long_range), styles::text_muted(p)),
            Span::styled(time_label(bounds[1], long_range), styles::text_muted(p)),
        ];
        let y_labels = vec![
            Span::styled("0", styles::text_muted(p)),
            Span::styled("50", styles::text_muted(p)),
            Span::styled("100", styles::text_muted(p)),
        ];

        Chart::new(datasets)
            .style(Style::default().bg(p.card_bg))
            .legend_position(None)
            .x_axis(
                Axis::default()
                    .style(Style::default().fg(p.border_dim))
                    .bounds(bounds)
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .style(Style::default().fg(p.border_dim))
                    .bounds([0.0, 100.0])
                    .labels(y_labels),
            )
            .render(area, buf);
    }

    fn render_delta(&self, area: Rect, buf: &mut Buffer, data: &ChartData, bounds: [f64; 2]) {
        let p = self.palette;
        let up = windowed(&data.delta_up, bounds, None);
        let down = windowed(&data.delta_down, bounds, None);
        let max = data.max_delta().max(1.0);

        let datasets = vec![
            Dataset::default()
                .marker(Marker::HalfBlock)
                .graph_type(GraphType::Bar)
                .style(Style::default().fg(p.delta_up))
                .data(&up),
            Dataset::default()
                .marker(Marker::HalfBlock)
                .graph_type(GraphType::Bar)
                .style(Style::default().fg(p.delta_down))
                .data(&down),
        ];

        let max_label = format_number(max);
        Chart::new(datasets)
            .style(Style::default().bg(p.card_bg))
            .legend_position(None)
            .x_axis(Axis::default().bounds(bounds))
            .y_axis(
                Axis::default()
                    .style(Style::default().fg(p.border_dim))
                    .bounds([-max, max])
                    .labels(vec![
                        Span::styled(format!("-{}", max_label), styles::text_muted(p)),
                        Span::styled(format!("+{}", max_label), styles::text_muted(p)),
                    ]),
            )
            .render(area, buf);
    }
}

impl Widget for HistoryChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let p = self.palette;
        let title = Line::from(Span::styled(
            format!(" {} ", self.t.get("chart.title", "History")),
            styles::text_bright_bold(p),
        ));
        let block = styles::glass_block(p, self.focused).title(title);
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height < 2 || inner.width < 10 {
            return;
        }

        match &self.details.load {
            LoadState::Loading if self.details.chart.is_none() => {
                self.render_message(
                    inner,
                    buf,
                    self.t.get("chart.loading", "Loading history...").to_string(),
                    styles::text_muted(p),
                );
                return;
            }
            LoadState::Failed(error) if self.details.chart.is_none() => {
                self.render_message(
                    inner,
                    buf,
                    self.t.format(
                        "chart.failed",
                        "Could not load history: {error}",
                        &[("error", error)],
                    ),
                    styles::error(p),
                );
                return;
            }
            _ => {}
        }

        let Some(data) = &self.details.chart else {
            self.render_message(
                inner,
                buf,
                self.t.get("chart.empty", "No data for this period").to_string(),
                styles::text_muted(p),
            );
            return;
        };

        let [legend_area, plot_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(inner);
        Paragraph::new(self.legend(data)).render(legend_area, buf);

        let bounds = self.details.chart_view.bounds(data);
        let bounds = if bounds[1] > bounds[0] {
            bounds
        } else {
            [bounds[0] - 60.0, bounds[1] + 60.0]
        };

        let show_delta =
            self.details.chart_view.is_visible(Series::Delta) && plot_area.height >= 8;
        if show_delta {
            let delta_height = (plot_area.height / DELTA_SHARE).max(3);
            let [main, delta] = Layout::vertical([
                Constraint::Fill(1),
                Constraint::Length(delta_height),
            ])
            .areas(plot_area);
            self.render_main(main, buf, data, bounds);
            self.render_delta(delta, buf, data, bounds);
        } else {
            self.render_main(plot_area, buf, data, bounds);
        }
    }
}
