//! blockspy-tui - Terminal UI for BlockSpy
//!
//! Presentation layer of the dashboard, organized into:
//!
//! - `runner`: Entry point and event loop
//! - `startup`: Config and command line merging
//! - `event`: Terminal event polling
//! - `layout`: Screen layout calculation
//! - `render`: Frame rendering
//! - `terminal`: Terminal setup/restore
//! - `theme`: Dark and light palettes
//! - `widgets`: Reusable UI components

pub mod event;
pub mod layout;
pub mod render;
pub mod runner;
pub mod startup;
pub mod terminal;
pub mod theme;
pub mod widgets;

#[cfg(test)]
pub mod test_utils;

pub use runner::run;
pub use startup::LaunchOptions;
