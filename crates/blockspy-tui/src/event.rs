//! Terminal event polling

use std::time::Duration;

use blockspy_app::message::Message;
use blockspy_app::InputKey;
use blockspy_core::prelude::*;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Poll timeout; a quiet terminal still produces a `Tick` this often.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Convert a crossterm key event to an [`InputKey`]
pub fn key_event_to_input(key: KeyEvent) -> Option<InputKey> {
    match key.code {
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(InputKey::CharCtrl(c.to_ascii_lowercase()))
        }
        KeyCode::Char(c) => Some(InputKey::Char(c)),
        KeyCode::Enter => Some(InputKey::Enter),
        KeyCode::Esc => Some(InputKey::Esc),
        KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => Some(InputKey::BackTab),
        KeyCode::Tab => Some(InputKey::Tab),
        KeyCode::BackTab => Some(InputKey::BackTab),
        KeyCode::Backspace => Some(InputKey::Backspace),
        KeyCode::Delete => Some(InputKey::Delete),
        KeyCode::Up => Some(InputKey::Up),
        KeyCode::Down => Some(InputKey::Down),
        KeyCode::Left => Some(InputKey::Left),
        KeyCode::Right => Some(InputKey::Right),
        KeyCode::Home => Some(InputKey::Home),
        KeyCode::End => Some(InputKey::End),
        KeyCode::PageUp => Some(InputKey::PageUp),
        KeyCode::PageDown => Some(InputKey::PageDown),
        _ => None,
    }
}

/// Poll for terminal events with timeout
pub fn poll() -> Result<Option<Message>> {
    if !event::poll(POLL_INTERVAL)? {
        return Ok(Some(Message::Tick));
    }

    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            Ok(key_event_to_input(key).map(Message::Key))
        }
        // Redraw happens on the next loop iteration anyway
        Event::Resize(..) => Ok(Some(Message::Tick)),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Option<InputKey> {
        key_event_to_input(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_char_conversion() {
        assert_eq!(
            key(KeyCode::Char('a'), KeyModifiers::NONE),
            Some(InputKey::Char('a'))
        );
    }

    #[test]
    fn test_ctrl_chars() {
        assert_eq!(
            key(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Some(InputKey::CharCtrl('c'))
        );
        // Ctrl+Shift+U still unlocks
        assert_eq!(
            key(KeyCode::Char('U'), KeyModifiers::CONTROL | KeyModifiers::SHIFT),
            Some(InputKey::CharCtrl('u'))
        );
    }

    #[test]
    fn test_uppercase_letters_keep_case() {
        assert_eq!(
            key(KeyCode::Char('L'), KeyModifiers::SHIFT),
            Some(InputKey::Char('L'))
        );
    }

    #[test]
    fn test_navigation_keys() {
        assert_eq!(key(KeyCode::Up, KeyModifiers::NONE), Some(InputKey::Up));
        assert_eq!(key(KeyCode::Down, KeyModifiers::NONE), Some(InputKey::Down));
        assert_eq!(key(KeyCode::PageUp, KeyModifiers::NONE), Some(InputKey::PageUp));
        assert_eq!(key(KeyCode::End, KeyModifiers::NONE), Some(InputKey::End));
    }

    #[test]
    fn test_backtab_variants() {
        assert_eq!(key(KeyCode::Tab, KeyModifiers::SHIFT), Some(InputKey::BackTab));
        assert_eq!(key(KeyCode::BackTab, KeyModifiers::NONE), Some(InputKey::BackTab));
        assert_eq!(key(KeyCode::Tab, KeyModifiers::NONE), Some(InputKey::Tab));
    }

    #[test]
    fn test_unsupported_key_returns_none() {
        assert_eq!(key(KeyCode::Insert, KeyModifiers::NONE), None);
        assert_eq!(key(KeyCode::F(5), KeyModifiers::NONE), None);
    }
}
