//! Widget components for the TUI

mod chart;
mod console;
mod details_header;
mod dialogs;
mod header;
mod heatmap;
pub mod modal_overlay;
mod players;
mod server_list;
mod status_bar;
pub mod text;
mod timeline;

pub use chart::HistoryChart;
pub use console::ConsolePanel;
pub use details_header::DetailsHeader;
pub use dialogs::ModalView;
pub use header::DashboardHeader;
pub use heatmap::Heatmap;
pub use players::PlayersPanel;
pub use server_list::{ServerList, ROW_HEIGHT};
pub use status_bar::StatusBar;
pub use timeline::{describe as describe_event, Timeline};
