//! Screen layout definitions for the TUI

use ratatui::layout::{Constraint, Layout, Rect};

/// Rows taken by the heatmap panel: borders, weekday header, six weeks.
pub const HEATMAP_HEIGHT: u16 = 9;

/// Areas of the server list screen
#[derive(Debug, Clone, Copy)]
pub struct DashboardAreas {
    /// Title, filters and sort order
    pub header: Rect,
    pub list: Rect,
    pub status: Rect,
}

pub fn dashboard(area: Rect) -> DashboardAreas {
    let chunks = Layout::vertical([
        Constraint::Length(4),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .split(area);

    DashboardAreas {
        header: chunks[0],
        list: chunks[1],
        status: chunks[2],
    }
}

/// Areas of the details screen
#[derive(Debug, Clone, Copy)]
pub struct DetailsAreas {
    /// Server name, badge, stats and period selector
    pub header: Rect,
    pub chart: Rect,
    pub console: Rect,
    pub heatmap: Rect,
    pub timeline: Rect,
    pub players: Rect,
    pub status: Rect,
}

/// Chart and console on the left, calendar, timeline and players on the
/// right.
pub fn details(area: Rect) -> DetailsAreas {
    let rows = Layout::vertical([
        Constraint::Length(4),
        Constraint::Min(10),
        Constraint::Length(1),
    ])
    .split(area);

    let columns =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).split(rows[1]);

    let left = Layout::vertical([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(columns[0]);

    let right = Layout::vertical([
        Constraint::Length(HEATMAP_HEIGHT),
        Constraint::Fill(1),
        Constraint::Fill(1),
    ])
    .split(columns[1]);

    DetailsAreas {
        header: rows[0],
        chart: left[0],
        console: left[1],
        heatmap: right[0],
        timeline: right[1],
        players: right[2],
        status: rows[2],
    }
}
