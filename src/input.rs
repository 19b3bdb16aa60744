//! Input handling module
//!
//! Decodes crossterm key events into wizard [`Key`]s. The page under the
//! cursor decides what a key means; this module only names it.

use crate::wizard::Key;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map a terminal key event; `None` for keys the wizard ignores
pub fn map_key(event: KeyEvent) -> Option<Key> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        return match event.code {
            KeyCode::Char('c') | KeyCode::Char('q') => Some(Key::Quit),
            _ => None,
        };
    }
    match event.code {
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Home | KeyCode::PageUp => Some(Key::Home),
        KeyCode::End | KeyCode::PageDown => Some(Key::End),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Esc => Some(Key::Esc),
        KeyCode::Char(c) => Some(Key::Char(c)),
        _ => None,
    }
}
