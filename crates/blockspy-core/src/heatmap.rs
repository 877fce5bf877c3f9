//! Calendar heatmap layout
//!
//! Lays out one month as a Sunday-first grid of days colored by average
//! occupancy. Days after "today" are disabled and carry no tooltip. Days
//! without a sample are absent from [`HeatmapData`] and show as "no data"
//! rather than as zero.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Months, NaiveDate};

use crate::types::CalendarEntry;

/// A calendar month (`month` is 1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthRef {
    pub year: i32,
    pub month: u32,
}

impl MonthRef {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn days_in_month(&self) -> u32 {
        match (self.first_day(), self.next().first_day()) {
            (Some(first), Some(next)) => (next - first).num_days() as u32,
            _ => 0,
        }
    }

    pub fn prev(&self) -> Self {
        self.first_day()
            .and_then(|d| d.checked_sub_months(Months::new(1)))
            .map(Self::of)
            .unwrap_or(*self)
    }

    pub fn next(&self) -> Self {
        if self.month >= 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }
}

/// Forward navigation stops at the month containing `today`.
pub fn can_navigate_next(displayed: MonthRef, today: NaiveDate) -> bool {
    displayed < MonthRef::of(today)
}

/// Five-step occupancy scale used to color a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OccupancyBucket {
    NoData,
    /// up to 20% of capacity
    Low,
    /// up to 45%
    Medium,
    /// up to 70%
    High,
    /// above 70%
    Full,
}

/// Bucket for an average player count against the server capacity.
///
/// Missing or non-positive averages, and servers without a known capacity,
/// fall in [`OccupancyBucket::NoData`].
pub fn bucket_for(value: Option<f64>, max_players: i64) -> OccupancyBucket {
    let value = match value {
        Some(v) if v > 0.0 && max_players > 0 => v,
        _ => return OccupancyBucket::NoData,
    };
    let ratio = value / max_players as f64;
    if ratio <= 0.20 {
        OccupancyBucket::Low
    } else if ratio <= 0.45 {
        OccupancyBucket::Medium
    } else if ratio <= 0.70 {
        OccupancyBucket::High
    } else {
        OccupancyBucket::Full
    }
}

/// Daily averages keyed by UTC date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeatmapData {
    days: BTreeMap<NaiveDate, f64>,
}

impl HeatmapData {
    pub fn from_entries(entries: &[CalendarEntry]) -> Self {
        let days = entries
            .iter()
            .filter_map(|e| {
                DateTime::from_timestamp(e.timestamp, 0).map(|dt| (dt.date_naive(), e.value))
            })
            .collect();
        Self { days }
    }

    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.days.get(&date).copied()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DayState {
    /// After today; drawn disabled, not interactive
    Future,
    Past {
        bucket: OccupancyBucket,
        average: Option<f64>,
        /// Share of capacity, rounded to a whole percent
        percent: Option<u32>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapDay {
    pub date: NaiveDate,
    pub state: DayState,
}

/// Hover text of an interactive day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayTooltip {
    pub date: NaiveDate,
    pub average: Option<f64>,
    pub percent: Option<u32>,
}

impl HeatmapDay {
    pub fn is_interactive(&self) -> bool {
        matches!(self.state, DayState::Past { .. })
    }

    pub fn tooltip(&self) -> Option<DayTooltip> {
        match &self.state {
            DayState::Future => None,
            DayState::Past {
                average, percent, ..
            } => Some(DayTooltip {
                date: self.date,
                average: *average,
                percent: *percent,
            }),
        }
    }
}

/// One laid out month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthGrid {
    pub month: MonthRef,
    /// Empty cells before the 1st (0 = Sunday)
    pub leading_blanks: u32,
    pub days: Vec<HeatmapDay>,
}

impl MonthGrid {
    /// Rows of seven cells, Sunday first, padded with `None`.
    pub fn weeks(&self) -> Vec<[Option<&HeatmapDay>; 7]> {
        let mut cells: Vec<Option<&HeatmapDay>> = Vec::new();
        cells.extend((0..self.leading_blanks).map(|_| None));
        cells.extend(self.days.iter().map(Some));
        while cells.len() % 7 != 0 {
            cells.push(None);
        }
        cells
            .chunks(7)
            .map(|chunk| {
                let mut row = [None; 7];
                row.copy_from_slice(chunk);
                row
            })
            .collect()
    }
}

/// Lay out `month` against `data`, treating days after `today` as future.
pub fn layout_month(
    month: MonthRef,
    data: &HeatmapData,
    max_players: i64,
    today: NaiveDate,
) -> MonthGrid {
    let Some(first) = month.first_day() else {
        return MonthGrid {
            month,
            leading_blanks: 0,
            days: Vec::new(),
        };
    };

    let days = first
        .iter_days()
        .take(month.days_in_month() as usize)
        .map(|date| {
            let state = if date > today {
                DayState::Future
            } else {
                let average = data.get(date);
                let percent = match average {
                    Some(v) if max_players > 0 => {
                        Some((v / max_players as f64 * 100.0).round().max(0.0) as u32)
                    }
                    _ => None,
                };
                DayState::Past {
                    bucket: bucket_for(average, max_players),
                    average,
                    percent,
                }
            };
            HeatmapDay { date, state }
        })
        .collect();

    MonthGrid {
        month,
        leading_blanks: first.weekday().num_days_from_sunday(),
        days,
    }
}
