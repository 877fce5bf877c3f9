//! Keyboard input, decoupled from the terminal backend
//!
//! The TUI converts crossterm key events into [`InputKey`] before they reach
//! the update loop, so `blockspy-app` never depends on crossterm.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKey {
    Char(char),
    /// Character typed with Ctrl held (Ctrl+C, Ctrl+U, Ctrl+X)
    CharCtrl(char),

    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,

    Enter,
    Esc,
    Tab,
    BackTab,
    Backspace,
    Delete,
}

impl InputKey {
    /// The printable character this key inserts into a text field.
    pub fn typed_char(&self) -> Option<char> {
        match self {
            InputKey::Char(c) if !c.is_control() => Some(*c),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctrl_is_distinct_from_plain() {
        assert_ne!(InputKey::CharCtrl('c'), InputKey::Char('c'));
    }

    #[test]
    fn test_typed_char() {
        assert_eq!(InputKey::Char('a').typed_char(), Some('a'));
        assert_eq!(InputKey::Char(' ').typed_char(), Some(' '));
        assert_eq!(InputKey::CharCtrl('u').typed_char(), None);
        assert_eq!(InputKey::Enter.typed_char(), None);
    }
}
