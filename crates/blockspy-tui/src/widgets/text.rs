//! Text helpers shared by the widgets: MOTD spans and width-aware truncation.

use blockspy_core::motd::{into_lines, render_motd};
use blockspy_core::types::ServerSummary;
use ratatui::style::Modifier;
use ratatui::text::Span;
use unicode_width::UnicodeWidthStr;

use crate::theme::{styles, Palette};

/// Separator drawn where a multi-line MOTD breaks.
const MOTD_LINE_SEPARATOR: &str = " · ";

/// Styled spans of a server name.
///
/// A custom name is shown plain. Otherwise the advertised MOTD is decoded,
/// with its lines joined on one row.
pub fn server_name_spans(palette: &Palette, server: &ServerSummary) -> Vec<Span<'static>> {
    if let Some(custom) = server.custom_name.as_deref().filter(|s| !s.trim().is_empty()) {
        return vec![Span::styled(
            custom.to_string(),
            styles::text_bright_bold(palette),
        )];
    }

    let mut spans = Vec::new();
    for (i, line) in into_lines(render_motd(server.advertised_name.as_deref()))
        .into_iter()
        .enumerate()
    {
        if i > 0 {
            spans.push(Span::styled(MOTD_LINE_SEPARATOR, styles::text_muted(palette)));
        }
        for span in line {
            spans.push(Span::styled(
                span.text,
                styles::motd(palette, span.color, span.formats).add_modifier(Modifier::BOLD),
            ));
        }
    }
    spans
}

/// Cut `text` to at most `max_width` display columns, marking the cut with `…`.
pub fn truncate(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut width = 0;
    for c in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if width + w + 1 > max_width {
            break;
        }
        out.push(c);
        width += w;
    }
    out.push('…');
    out
}

/// Drop whole spans, then truncate the last one, so the row fits `max_width`.
pub fn fit_spans(spans: Vec<Span<'static>>, max_width: usize) -> Vec<Span<'static>> {
    let mut out = Vec::new();
    let mut used = 0;
    for span in spans {
        let w = span.content.width();
        if used + w <= max_width {
            used += w;
            out.push(span);
            continue;
        }
        let rest = max_width.saturating_sub(used);
        if rest > 0 {
            out.push(Span::styled(truncate(&span.content, rest), span.style));
        }
        break;
    }
    out
}

/// Label of a lookback period in hours.
pub fn period_label(hours: u32) -> String {
    if hours >= 24 && hours % 24 == 0 && hours > 24 {
        format!("{}d", hours / 24)
    } else {
        format!("{}h", hours)
    }
}
