//! # blockspy-core - Core Domain Types
//!
//! Foundation crate for BlockSpy. Provides the backend payload types, error
//! handling, and the pure data shaping behind every dashboard panel.
//!
//! This crate has **zero internal dependencies** and performs no network I/O.
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`ServerSummary`] - One monitored server with card label helpers
//! - [`HistoryPoint`], [`PlayerLists`], [`ServerStats`], [`CalendarEntry`], [`RawEvent`]
//! - [`GlobalSettings`], [`WatchlistEntry`], [`ServerPatch`], [`RconTestRequest`]
//!
//! ### Text Shaping
//! - [`parse_version()`] - Split a version string into flavor and base version
//! - [`render_motd()`] - Decode `§` formatting codes into styled spans
//! - [`build_timeline()`] - Typed timeline rows from raw event prose
//! - [`format_last_seen()`] - Relative "last seen" labels
//!
//! ### Calendar (`heatmap`)
//! - [`layout_month()`] - Sunday-first month grid with occupancy buckets
//!
//! ### Console (`console`)
//! - [`ConsoleMessage`], [`classify()`], [`banner_for()`]
//!
//! ### Export (`export`)
//! - [`history_to_csv()`], [`write_history_csv()`]
//!
//! ## Prelude
//!
//! ```rust
//! use blockspy_core::prelude::*;
//! ```

pub mod console;
pub mod error;
pub mod export;
pub mod heatmap;
pub mod i18n;
pub mod logging;
pub mod motd;
pub mod relative_time;
pub mod timeline;
pub mod types;
pub mod version;

/// Prelude for common imports used throughout all BlockSpy crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

pub use console::{
    banner_for, classify, ConsoleBanner, ConsoleLine, ConsoleLineKind, ConsoleMessage,
};
pub use error::{Error, Result, ResultExt};
pub use export::{export_file_name, history_to_csv, write_history_csv};
pub use heatmap::{
    bucket_for, can_navigate_next, layout_month, DayState, DayTooltip, HeatmapData, HeatmapDay,
    MonthGrid, MonthRef, OccupancyBucket,
};
pub use i18n::{available_languages, Translations, DEFAULT_LANGUAGE};
pub use motd::{into_lines, render_motd, strip_codes, McColor, MotdFormats, MotdPiece, MotdSpan};
pub use relative_time::format_last_seen;
pub use timeline::{build_timeline, TimelineDetail, TimelineEntry};
pub use types::{
    format_number, parse_timestamp, CalendarEntry, EventKind, GlobalSettings, HistoryPoint,
    OfflinePlayer, PlayerLists, RawEvent, RconTestRequest, ServerPatch, ServerStats,
    ServerStatus, ServerSummary, ServerType, StatusBadge, WatchlistEntry,
};
pub use version::{parse_version, ParsedVersion};
