//! Color palettes for the dark and light themes.

use ratatui::style::Color;

/// Every color a widget may draw with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    // --- Background layers ---
    pub deepest_bg: Color,
    pub card_bg: Color,
    pub popup_bg: Color,

    // --- Borders ---
    pub border_dim: Color,
    pub border_active: Color,

    // --- Accent ---
    pub accent: Color,
    /// Text drawn on top of the accent color
    pub contrast_fg: Color,

    // --- Text ---
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub text_bright: Color,

    // --- Status ---
    pub status_green: Color,
    pub status_red: Color,
    pub status_yellow: Color,
    pub status_blue: Color,

    pub shadow: Color,

    // --- Heatmap scale ---
    pub heat_no_data: Color,
    pub heat_low: Color,
    pub heat_medium: Color,
    pub heat_high: Color,
    pub heat_full: Color,
    pub heat_future: Color,

    // --- Chart series ---
    pub series_ping: Color,
    pub series_occupancy: Color,
    pub series_players: Color,
    pub delta_up: Color,
    pub delta_down: Color,
}

pub const DARK: Palette = Palette {
    deepest_bg: Color::Rgb(10, 12, 16),
    card_bg: Color::Rgb(18, 21, 28),
    popup_bg: Color::Rgb(28, 33, 43),

    border_dim: Color::Rgb(45, 51, 59),
    border_active: Color::Rgb(88, 166, 255),

    accent: Color::Rgb(88, 166, 255),
    contrast_fg: Color::Black,

    text_primary: Color::Rgb(201, 209, 217),
    text_secondary: Color::Rgb(125, 133, 144),
    text_muted: Color::Rgb(72, 79, 88),
    text_bright: Color::Rgb(240, 246, 252),

    status_green: Color::Rgb(16, 185, 129),
    status_red: Color::Rgb(244, 63, 94),
    status_yellow: Color::Rgb(234, 179, 8),
    status_blue: Color::Rgb(56, 189, 248),

    shadow: Color::Rgb(5, 6, 8),

    heat_no_data: Color::Rgb(38, 44, 54),
    heat_low: Color::Rgb(14, 68, 41),
    heat_medium: Color::Rgb(0, 109, 50),
    heat_high: Color::Rgb(38, 166, 65),
    heat_full: Color::Rgb(57, 211, 83),
    heat_future: Color::Rgb(22, 25, 31),

    series_ping: Color::Rgb(234, 179, 8),
    series_occupancy: Color::Rgb(129, 140, 248),
    series_players: Color::Rgb(88, 166, 255),
    delta_up: Color::Rgb(16, 185, 129),
    delta_down: Color::Rgb(244, 63, 94),
};

pub const LIGHT: Palette = Palette {
    deepest_bg: Color::Rgb(246, 248, 250),
    card_bg: Color::Rgb(255, 255, 255),
    popup_bg: Color::Rgb(234, 238, 242),

    border_dim: Color::Rgb(208, 215, 222),
    border_active: Color::Rgb(9, 105, 218),

    accent: Color::Rgb(9, 105, 218),
    contrast_fg: Color::White,

    text_primary: Color::Rgb(31, 35, 40),
    text_secondary: Color::Rgb(87, 96, 106),
    text_muted: Color::Rgb(140, 149, 159),
    text_bright: Color::Black,

    status_green: Color::Rgb(26, 127, 55),
    status_red: Color::Rgb(207, 34, 46),
    status_yellow: Color::Rgb(154, 103, 0),
    status_blue: Color::Rgb(9, 105, 218),

    shadow: Color::Rgb(208, 215, 222),

    heat_no_data: Color::Rgb(235, 237, 240),
    heat_low: Color::Rgb(155, 233, 168),
    heat_medium: Color::Rgb(64, 196, 99),
    heat_high: Color::Rgb(48, 161, 78),
    heat_full: Color::Rgb(33, 110, 57),
    heat_future: Color::Rgb(246, 248, 250),

    series_ping: Color::Rgb(154, 103, 0),
    series_occupancy: Color::Rgb(130, 80, 223),
    series_players: Color::Rgb(9, 105, 218),
    delta_up: Color::Rgb(26, 127, 55),
    delta_down: Color::Rgb(207, 34, 46),
};
