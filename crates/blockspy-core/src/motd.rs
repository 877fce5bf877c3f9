//! Minecraft MOTD rendering
//!
//! Turns a `§`-coded message of the day into styled spans. Rendering is
//! line oriented: every line starts over at white with no formats, and line
//! breaks come out as their own [`MotdPiece::LineBreak`] rather than as text
//! inside a span.

/// Section sign that introduces a formatting code.
pub const SECTION: char = '§';

/// Text used when a server has no name at all.
pub const NO_NAME: &str = "no name";

/// One of the 16 Minecraft chat colors, indexed by its code `0`-`f`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct McColor(u8);

impl McColor {
    pub const WHITE: McColor = McColor(0xf);

    pub fn from_code(code: char) -> Option<Self> {
        code.to_digit(16).map(|d| McColor(d as u8))
    }

    pub fn code(&self) -> char {
        std::char::from_digit(self.0 as u32, 16).unwrap_or('f')
    }

    /// The color's canonical RGB value.
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self.0 {
            0x0 => (0x00, 0x00, 0x00),
            0x1 => (0x00, 0x00, 0xAA),
            0x2 => (0x00, 0xAA, 0x00),
            0x3 => (0x00, 0xAA, 0xAA),
            0x4 => (0xAA, 0x00, 0x00),
            0x5 => (0xAA, 0x00, 0xAA),
            0x6 => (0xFF, 0xAA, 0x00),
            0x7 => (0xAA, 0xAA, 0xAA),
            0x8 => (0x55, 0x55, 0x55),
            0x9 => (0x55, 0x55, 0xFF),
            0xa => (0x55, 0xFF, 0x55),
            0xb => (0x55, 0xFF, 0xFF),
            0xc => (0xFF, 0x55, 0x55),
            0xd => (0xFF, 0x55, 0xFF),
            0xe => (0xFF, 0xFF, 0x55),
            _ => (0xFF, 0xFF, 0xFF),
        }
    }
}

/// Accumulated format flags (`§l`, `§o`, `§n`, `§m`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct MotdFormats {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
}

impl MotdFormats {
    pub fn is_empty(&self) -> bool {
        *self == MotdFormats::default()
    }

    fn apply(&mut self, code: char) -> bool {
        match code {
            'l' => self.bold = true,
            'o' => self.italic = true,
            'n' => self.underline = true,
            'm' => self.strikethrough = true,
            _ => return false,
        }
        true
    }
}

/// A run of text sharing one color and one set of formats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotdSpan {
    pub text: String,
    pub color: McColor,
    pub formats: MotdFormats,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MotdPiece {
    Span(MotdSpan),
    LineBreak,
}

/// Render a raw MOTD into ordered spans and line breaks.
pub fn render_motd(raw: Option<&str>) -> Vec<MotdPiece> {
    let raw = match raw {
        Some(r) if !r.is_empty() => r,
        _ => {
            return vec![MotdPiece::Span(MotdSpan {
                text: NO_NAME.to_string(),
                color: McColor::WHITE,
                formats: MotdFormats::default(),
            })]
        }
    };

    let lines: Vec<&str> = raw.split('\n').collect();
    let mut pieces = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        render_line(line.trim(), &mut pieces);
        if index + 1 < lines.len() {
            pieces.push(MotdPiece::LineBreak);
        }
    }

    pieces
}

fn render_line(line: &str, pieces: &mut Vec<MotdPiece>) {
    let mut color = McColor::WHITE;
    let mut formats = MotdFormats::default();
    let mut fragments = line.split(SECTION);

    if let Some(first) = fragments.next() {
        if !first.is_empty() {
            pieces.push(MotdPiece::Span(MotdSpan {
                text: first.to_string(),
                color,
                formats,
            }));
        }
    }

    for fragment in fragments {
        let mut chars = fragment.chars();
        let Some(code) = chars.next() else {
            continue;
        };
        let code = code.to_ascii_lowercase();

        if let Some(new_color) = McColor::from_code(code) {
            color = new_color;
            formats = MotdFormats::default();
        } else if code == 'r' {
            color = McColor::WHITE;
            formats = MotdFormats::default();
        } else {
            // Unknown codes (e.g. `k`) leave the state alone.
            formats.apply(code);
        }

        let text = chars.as_str();
        if !text.is_empty() {
            pieces.push(MotdPiece::Span(MotdSpan {
                text: text.to_string(),
                color,
                formats,
            }));
        }
    }
}

/// Split rendered pieces back into lines of spans.
pub fn into_lines(pieces: Vec<MotdPiece>) -> Vec<Vec<MotdSpan>> {
    let mut lines = vec![Vec::new()];
    for piece in pieces {
        match piece {
            MotdPiece::Span(span) => {
                if let Some(line) = lines.last_mut() {
                    line.push(span);
                }
            }
            MotdPiece::LineBreak => lines.push(Vec::new()),
        }
    }
    lines
}

/// Remove `§x` formatting codes, leaving plain text.
pub fn strip_codes(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == SECTION {
            if let Some(next) = chars.peek() {
                if is_format_code(*next) {
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

fn is_format_code(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), '0'..='9' | 'a'..='f' | 'k'..='o' | 'r')
}
