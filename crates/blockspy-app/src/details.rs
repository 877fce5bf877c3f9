//! Details view state for the one open server
//!
//! A [`DetailsState`] lives from opening a server until navigating away. Each
//! instance carries a generation number; background results tagged with any
//! other generation are dropped by the handler.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use tokio::sync::watch;

use blockspy_core::heatmap::{can_navigate_next, HeatmapData, MonthRef};
use blockspy_core::timeline::{build_timeline, TimelineEntry};
use blockspy_core::types::{
    CalendarEntry, HistoryPoint, PlayerLists, RawEvent, ServerStats, ServerSummary,
};

/// Everything one refresh cycle fetches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailsPayload {
    pub history: Vec<HistoryPoint>,
    pub players: PlayerLists,
    pub stats: ServerStats,
    pub events: Vec<RawEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Loaded,
    Failed(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailsFocus {
    #[default]
    Chart,
    Heatmap,
    Timeline,
    Players,
    Console,
}

impl DetailsFocus {
    const ORDER: [DetailsFocus; 5] = [
        DetailsFocus::Chart,
        DetailsFocus::Heatmap,
        DetailsFocus::Timeline,
        DetailsFocus::Players,
        DetailsFocus::Console,
    ];

    pub fn next(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    pub fn previous(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Chart data
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Series {
    Ping,
    Occupancy,
    Players,
    Delta,
}

impl Series {
    pub const ALL: [Series; 4] = [Series::Ping, Series::Occupancy, Series::Players, Series::Delta];

    /// Series bound to the number keys `1`-`4`.
    pub fn from_digit(digit: char) -> Option<Self> {
        digit
            .to_digit(10)
            .and_then(|d| (d as usize).checked_sub(1))
            .and_then(|i| Self::ALL.get(i).copied())
    }

    fn index(self) -> usize {
        match self {
            Series::Ping => 0,
            Series::Occupancy => 1,
            Series::Players => 2,
            Series::Delta => 3,
        }
    }
}

/// Time-aligned chart points; x is unix seconds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartData {
    pub ping: Vec<(f64, f64)>,
    /// Clamped to 0..=100
    pub occupancy: Vec<(f64, f64)>,
    pub players: Vec<(f64, f64)>,
    pub delta_up: Vec<(f64, f64)>,
    pub delta_down: Vec<(f64, f64)>,
    pub x_min: f64,
    pub x_max: f64,
}

impl ChartData {
    /// Assemble the four series; `None` when no sample has a usable timestamp.
    pub fn from_history(history: &[HistoryPoint]) -> Option<Self> {
        let mut data = ChartData::default();
        let mut bounds: Option<(f64, f64)> = None;

        for point in history {
            let Some(at) = point.at() else {
                tracing::debug!("Skipping history sample with bad timestamp {:?}", point.timestamp);
                continue;
            };
            let x = at.timestamp() as f64;
            bounds = Some(match bounds {
                Some((lo, hi)) => (lo.min(x), hi.max(x)),
                None => (x, x),
            });

            if let Some(ping) = point.ping {
                data.ping.push((x, ping));
            }
            data.occupancy
                .push((x, point.occupancy_percent.clamp(0.0, 100.0)));
            if let Some(players) = point.players {
                data.players.push((x, players as f64));
            }
            match point.player_delta {
                d if d > 0 => data.delta_up.push((x, d as f64)),
                d if d < 0 => data.delta_down.push((x, d as f64)),
                _ => {}
            }
        }

        let (x_min, x_max) = bounds?;
        data.x_min = x_min;
        data.x_max = x_max;
        Some(data)
    }

    pub fn max_ping(&self) -> f64 {
        self.ping.iter().map(|(_, y)| *y).fold(0.0, f64::max)
    }

    pub fn max_players(&self) -> f64 {
        self.players.iter().map(|(_, y)| *y).fold(0.0, f64::max)
    }

    /// Largest absolute delta, for a symmetric bar axis.
    pub fn max_delta(&self) -> f64 {
        self.delta_up
            .iter()
            .chain(self.delta_down.iter())
            .map(|(_, y)| y.abs())
            .fold(0.0, f64::max)
    }
}

const MIN_SPAN: f64 = 0.05;
const PAN_STEP: f64 = 0.25;

/// Client-side x-axis zoom and series visibility.
///
/// The window is kept as fractions of the full time range, so it survives a
/// refresh that extends the range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartView {
    start: f64,
    end: f64,
    visible: [bool; 4],
}

impl Default for ChartView {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 1.0,
            visible: [true; 4],
        }
    }
}

impl ChartView {
    pub fn is_zoomed(&self) -> bool {
        self.start > 0.0 || self.end < 1.0
    }

    pub fn fractions(&self) -> (f64, f64) {
        (self.start, self.end)
    }

    pub fn zoom_in(&mut self) {
        let center = (self.start + self.end) / 2.0;
        let span = ((self.end - self.start) / 2.0).max(MIN_SPAN);
        self.set_window(center - span / 2.0, span);
    }

    pub fn zoom_out(&mut self) {
        let center = (self.start + self.end) / 2.0;
        let span = ((self.end - self.start) * 2.0).min(1.0);
        self.set_window(center - span / 2.0, span);
    }

    /// Shift by a quarter of the window; negative goes back in time.
    pub fn pan(&mut self, direction: f64) {
        let span = self.end - self.start;
        self.set_window(self.start + span * PAN_STEP * direction.signum(), span);
    }

    pub fn reset_zoom(&mut self) {
        self.start = 0.0;
        self.end = 1.0;
    }

    fn set_window(&mut self, start: f64, span: f64) {
        let start = start.clamp(0.0, 1.0 - span);
        self.start = start;
        self.end = start + span;
    }

    /// Absolute x bounds of the window over `data`.
    pub fn bounds(&self, data: &ChartData) -> [f64; 2] {
        let range = data.x_max - data.x_min;
        [
            data.x_min + range * self.start,
            data.x_min + range * self.end,
        ]
    }

    pub fn is_visible(&self, series: Series) -> bool {
        self.visible[series.index()]
    }

    pub fn toggle(&mut self, series: Series) {
        let slot = &mut self.visible[series.index()];
        *slot = !*slot;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Heatmap
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapState {
    pub month: MonthRef,
    pub load: LoadState,
    pub data: HeatmapData,
    /// Highlighted day of month, 1-based
    pub cursor: u32,
}

impl HeatmapState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            month: MonthRef::of(today),
            load: LoadState::Loading,
            data: HeatmapData::default(),
            cursor: today.day(),
        }
    }

    pub fn can_go_next(&self, today: NaiveDate) -> bool {
        can_navigate_next(self.month, today)
    }

    /// Move to the previous month; returns the month to fetch.
    pub fn go_previous(&mut self) -> MonthRef {
        self.switch_to(self.month.prev());
        self.month
    }

    /// Move to the next month unless it would pass `today`.
    pub fn go_next(&mut self, today: NaiveDate) -> Option<MonthRef> {
        if !self.can_go_next(today) {
            return None;
        }
        self.switch_to(self.month.next());
        Some(self.month)
    }

    fn switch_to(&mut self, month: MonthRef) {
        self.month = month;
        self.load = LoadState::Loading;
        self.data = HeatmapData::default();
        self.cursor = self.cursor.min(month.days_in_month()).max(1);
    }

    pub fn apply(&mut self, month: MonthRef, entries: &[CalendarEntry]) -> bool {
        if month != self.month {
            return false;
        }
        self.data = HeatmapData::from_entries(entries);
        self.load = LoadState::Loaded;
        true
    }

    pub fn fail(&mut self, month: MonthRef, error: String) -> bool {
        if month != self.month {
            return false;
        }
        self.load = LoadState::Failed(error);
        true
    }

    /// Move the highlighted day by `delta` days, staying inside the month.
    pub fn move_cursor(&mut self, delta: i32) {
        let days = self.month.days_in_month().max(1) as i32;
        let target = self.cursor as i32 + delta;
        if (1..=days).contains(&target) {
            self.cursor = target as u32;
        }
    }

    pub fn cursor_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.month.year, self.month.month, self.cursor)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DetailsState
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct DetailsState {
    pub ip: String,
    /// Snapshot of the server row, updated on every list poll
    pub server: ServerSummary,
    pub generation: u64,
    pub hours: u32,
    pub load: LoadState,

    /// Last successful history payload, reused by export and re-render
    pub history: Vec<HistoryPoint>,
    pub chart: Option<ChartData>,
    pub players: PlayerLists,
    pub stats: Option<ServerStats>,
    pub timeline: Vec<TimelineEntry>,

    pub chart_view: ChartView,
    pub heatmap: HeatmapState,
    pub focus: DetailsFocus,
    pub timeline_scroll: usize,
    pub players_scroll: usize,

    pub refresh_in_flight: bool,
    refresh_timer: Option<Arc<watch::Sender<bool>>>,
}

impl DetailsState {
    pub fn new(server: ServerSummary, generation: u64, hours: u32, today: NaiveDate) -> Self {
        Self {
            ip: server.ip.clone(),
            server,
            generation,
            hours,
            load: LoadState::Loading,
            history: Vec::new(),
            chart: None,
            players: PlayerLists::default(),
            stats: None,
            timeline: Vec::new(),
            chart_view: ChartView::default(),
            heatmap: HeatmapState::new(today),
            focus: DetailsFocus::default(),
            timeline_scroll: 0,
            players_scroll: 0,
            refresh_in_flight: true,
            refresh_timer: None,
        }
    }

    /// Whether a result tagged `(ip, generation)` belongs to this view.
    pub fn owns(&self, ip: &str, generation: u64) -> bool {
        self.ip == ip && self.generation == generation
    }

    /// Replace every widget from one successful cycle.
    pub fn apply_payload(&mut self, payload: DetailsPayload) {
        self.chart = ChartData::from_history(&payload.history);
        self.history = payload.history;
        self.players = payload.players;
        self.stats = Some(payload.stats);
        self.timeline = build_timeline(&payload.events);
        self.load = LoadState::Loaded;
        self.refresh_in_flight = false;
    }

    /// A failed cycle stops the periodic refresh for this view.
    pub fn fail(&mut self, error: String) {
        self.load = LoadState::Failed(error);
        self.refresh_in_flight = false;
        self.cancel_refresh_timer();
    }

    /// Switch the lookback window; widgets go back to loading.
    pub fn set_hours(&mut self, hours: u32) {
        self.hours = hours;
        self.load = LoadState::Loading;
        self.refresh_in_flight = true;
        self.chart_view.reset_zoom();
    }

    pub fn has_refresh_timer(&self) -> bool {
        self.refresh_timer.is_some()
    }

    pub fn set_refresh_timer(&mut self, shutdown_tx: Arc<watch::Sender<bool>>) {
        self.cancel_refresh_timer();
        self.refresh_timer = Some(shutdown_tx);
    }

    pub fn cancel_refresh_timer(&mut self) {
        if let Some(tx) = self.refresh_timer.take() {
            let _ = tx.send(true);
        }
    }
}

impl Drop for DetailsState {
    fn drop(&mut self) {
        self.cancel_refresh_timer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(ts: &str, players: Option<i64>, ping: Option<f64>, occ: f64, delta: i64) -> HistoryPoint {
        HistoryPoint {
            timestamp: ts.to_string(),
            players,
            ping,
            occupancy_percent: occ,
            player_delta: delta,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_chart_series_from_history() {
        let history = vec![
            point("2024-06-01T10:00:00Z", Some(4), Some(40.0), 20.0, 0),
            point("2024-06-01T10:05:00Z", Some(6), None, 130.0, 2),
            point("not a time", Some(1), Some(1.0), 5.0, 1),
            point("2024-06-01T10:10:00Z", None, Some(55.0), -3.0, -1),
        ];
        let chart = ChartData::from_history(&history).unwrap();

        assert_eq!(chart.ping.len(), 2);
        assert_eq!(chart.players.len(), 2);
        let occ: Vec<f64> = chart.occupancy.iter().map(|(_, y)| *y).collect();
        assert_eq!(occ, vec![20.0, 100.0, 0.0]);
        assert_eq!(chart.delta_up.len(), 1);
        assert_eq!(chart.delta_down.len(), 1);
        assert_eq!(chart.x_max - chart.x_min, 600.0);
        assert_eq!(chart.max_delta(), 2.0);
    }

    #[test]
    fn test_empty_history_has_no_chart() {
        assert!(ChartData::from_history(&[]).is_none());
    }

    #[test]
    fn test_zoom_pan_and_reset() {
        let mut view = ChartView::default();
        view.zoom_in();
        assert_eq!(view.fractions(), (0.25, 0.75));

        view.pan(1.0);
        let (start, end) = view.fractions();
        assert!((start - 0.375).abs() < 1e-9 && (end - 0.875).abs() < 1e-9);

        // Panning stops at the edge
        view.pan(1.0);
        view.pan(1.0);
        assert_eq!(view.fractions().1, 1.0);

        view.zoom_out();
        view.zoom_out();
        assert_eq!(view.fractions(), (0.0, 1.0));
        assert!(!view.is_zoomed());

        view.zoom_in();
        view.reset_zoom();
        assert_eq!(view.fractions(), (0.0, 1.0));
    }

    #[test]
    fn test_zoom_has_a_floor() {
        let mut view = ChartView::default();
        for _ in 0..20 {
            view.zoom_in();
        }
        let (start, end) = view.fractions();
        assert!(end - start >= MIN_SPAN - 1e-9);
    }

    #[test]
    fn test_bounds_map_fractions_to_time() {
        let data = ChartData {
            x_min: 100.0,
            x_max: 200.0,
            ..Default::default()
        };
        let mut view = ChartView::default();
        view.zoom_in();
        assert_eq!(view.bounds(&data), [125.0, 175.0]);
    }

    #[test]
    fn test_series_toggle() {
        let mut view = ChartView::default();
        let delta = Series::from_digit('4').unwrap();
        assert_eq!(delta, Series::Delta);
        view.toggle(delta);
        assert!(!view.is_visible(Series::Delta));
        assert!(view.is_visible(Series::Ping));
        assert_eq!(Series::from_digit('0'), None);
        assert_eq!(Series::from_digit('5'), None);
    }

    #[test]
    fn test_heatmap_next_month_stops_at_today() {
        let today = date(2024, 6, 15);
        let mut heatmap = HeatmapState::new(today);
        assert!(!heatmap.can_go_next(today));
        assert_eq!(heatmap.go_next(today), None);

        assert_eq!(heatmap.go_previous(), MonthRef::new(2024, 5));
        assert!(heatmap.load.is_loading());
        assert_eq!(heatmap.go_next(today), Some(MonthRef::new(2024, 6)));
        assert_eq!(heatmap.go_next(today), None);
    }

    #[test]
    fn test_heatmap_ignores_other_month_results() {
        let mut heatmap = HeatmapState::new(date(2024, 6, 15));
        let may = heatmap.month.prev();
        assert!(!heatmap.apply(may, &[]));
        assert!(heatmap.load.is_loading());
        assert!(heatmap.apply(MonthRef::new(2024, 6), &[]));
        assert_eq!(heatmap.load, LoadState::Loaded);
    }

    #[test]
    fn test_heatmap_cursor_clamps_to_month() {
        let mut heatmap = HeatmapState::new(date(2024, 3, 31));
        heatmap.go_previous();
        assert_eq!(heatmap.cursor, 29);
        heatmap.move_cursor(7);
        assert_eq!(heatmap.cursor, 29);
        heatmap.move_cursor(-7);
        assert_eq!(heatmap.cursor, 22);
        assert_eq!(heatmap.cursor_date(), Some(date(2024, 2, 22)));
    }

    #[test]
    fn test_failure_cancels_timer() {
        let mut details = DetailsState::new(ServerSummary::new("a"), 1, 24, date(2024, 6, 1));
        let (tx, rx) = watch::channel(false);
        details.set_refresh_timer(Arc::new(tx));
        details.fail("boom".into());
        assert!(!details.has_refresh_timer());
        assert!(*rx.borrow());
        assert_eq!(details.load, LoadState::Failed("boom".into()));
    }

    #[test]
    fn test_drop_cancels_timer() {
        let (tx, rx) = watch::channel(false);
        {
            let mut details = DetailsState::new(ServerSummary::new("a"), 1, 24, date(2024, 6, 1));
            details.set_refresh_timer(Arc::new(tx));
        }
        assert!(*rx.borrow());
    }

    #[test]
    fn test_apply_payload_replaces_widgets() {
        let mut details = DetailsState::new(ServerSummary::new("a"), 3, 24, date(2024, 6, 1));
        assert!(details.owns("a", 3));
        assert!(!details.owns("a", 2));

        details.apply_payload(DetailsPayload {
            history: vec![point("2024-06-01T10:00:00Z", Some(1), Some(20.0), 5.0, 1)],
            players: PlayerLists {
                online: vec!["b".into(), "A".into()],
                offline: vec![],
            },
            stats: ServerStats {
                uptime_percent: 99.5,
                peak_players: 10,
                average_players: 3.2,
            },
            events: vec![RawEvent {
                timestamp: "2024-06-01T10:00:00Z".into(),
                kind: "SERVIDOR_OFFLINE".into(),
                details: None,
            }],
        });

        assert_eq!(details.load, LoadState::Loaded);
        assert!(!details.refresh_in_flight);
        assert_eq!(details.history.len(), 1);
        assert!(details.chart.is_some());
        assert_eq!(details.timeline.len(), 1);
        assert_eq!(details.stats.as_ref().map(|s| s.peak_players), Some(10));
    }
}
