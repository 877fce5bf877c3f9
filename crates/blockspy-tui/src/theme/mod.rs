//! Theme system: a dark and a light palette plus semantic style builders.
//!
//! - `palette`: the two color sets
//! - `styles`: style builders taking the active palette

pub mod palette;
pub mod styles;

use blockspy_app::config::ThemeMode;

pub use palette::Palette;

/// Palette for the persisted theme preference.
pub fn palette_for(mode: ThemeMode) -> &'static Palette {
    match mode {
        ThemeMode::Dark => &palette::DARK,
        ThemeMode::Light => &palette::LIGHT,
    }
}
