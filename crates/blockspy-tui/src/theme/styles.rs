//! Semantic style builders over a [`Palette`].

use blockspy_core::console::ConsoleLineKind;
use blockspy_core::heatmap::OccupancyBucket;
use blockspy_core::motd::{McColor, MotdFormats};
use blockspy_core::types::StatusBadge;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders};

use super::palette::Palette;

// --- Text styles ---
pub fn text_primary(p: &Palette) -> Style {
    Style::default().fg(p.text_primary)
}

pub fn text_secondary(p: &Palette) -> Style {
    Style::default().fg(p.text_secondary)
}

pub fn text_muted(p: &Palette) -> Style {
    Style::default().fg(p.text_muted)
}

pub fn text_bright_bold(p: &Palette) -> Style {
    Style::default()
        .fg(p.text_bright)
        .add_modifier(Modifier::BOLD)
}

pub fn accent(p: &Palette) -> Style {
    Style::default().fg(p.accent)
}

pub fn keybinding(p: &Palette) -> Style {
    Style::default().fg(p.status_yellow)
}

pub fn error(p: &Palette) -> Style {
    Style::default().fg(p.status_red)
}

pub fn success(p: &Palette) -> Style {
    Style::default().fg(p.status_green)
}

/// Focused and selected row, text on the accent color
pub fn focused_selected(p: &Palette) -> Style {
    Style::default()
        .fg(p.contrast_fg)
        .bg(p.accent)
        .add_modifier(Modifier::BOLD)
}

// --- Block builders ---
pub fn glass_block(p: &Palette, focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(if focused {
            p.border_active
        } else {
            p.border_dim
        }))
        .style(Style::default().bg(p.card_bg))
}

pub fn modal_block<'a>(p: &Palette, title: impl Into<Line<'a>>, is_error: bool) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(if is_error {
            p.status_red
        } else {
            p.border_active
        }))
        .style(Style::default().bg(p.popup_bg).fg(p.text_primary))
}

// --- Domain styles ---

pub fn badge(p: &Palette, badge: StatusBadge) -> Style {
    let color = match badge {
        StatusBadge::Online => p.status_green,
        StatusBadge::Paused => p.status_yellow,
        StatusBadge::Checking => p.status_blue,
        StatusBadge::Offline => p.status_red,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

pub fn console_line(p: &Palette, kind: ConsoleLineKind) -> Style {
    match kind {
        ConsoleLineKind::Status => Style::default().fg(p.status_blue),
        ConsoleLineKind::Log | ConsoleLineKind::Plain => Style::default().fg(p.text_primary),
        ConsoleLineKind::Chat => Style::default().fg(p.status_green),
        ConsoleLineKind::RconSent => Style::default()
            .fg(p.accent)
            .add_modifier(Modifier::BOLD),
        ConsoleLineKind::RconResponse => Style::default().fg(p.text_secondary),
        ConsoleLineKind::RconError => Style::default().fg(p.status_red),
        ConsoleLineKind::System => Style::default()
            .fg(p.text_muted)
            .add_modifier(Modifier::ITALIC),
    }
}

pub fn heat_color(p: &Palette, bucket: OccupancyBucket) -> Color {
    match bucket {
        OccupancyBucket::NoData => p.heat_no_data,
        OccupancyBucket::Low => p.heat_low,
        OccupancyBucket::Medium => p.heat_medium,
        OccupancyBucket::High => p.heat_high,
        OccupancyBucket::Full => p.heat_full,
    }
}

/// Style of one MOTD span.
///
/// White is the default MOTD color; it follows the theme's text color so the
/// name stays readable on a light background.
pub fn motd(p: &Palette, color: McColor, formats: MotdFormats) -> Style {
    let fg = if color == McColor::WHITE {
        p.text_bright
    } else {
        let (r, g, b) = color.rgb();
        Color::Rgb(r, g, b)
    };
    let mut style = Style::default().fg(fg);
    if formats.bold {
        style = style.add_modifier(Modifier::BOLD);
    }
    if formats.italic {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if formats.underline {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    if formats.strikethrough {
        style = style.add_modifier(Modifier::CROSSED_OUT);
    }
    style
}
