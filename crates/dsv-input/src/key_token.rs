//! Translate crossterm key events into a terminal-independent token.
//! spec.md §4.M's router dispatches on these, never on crossterm types
//! directly.
//!
//! An exhaustive match over `KeyCode`, collapsed to the one enum this
//! viewer needs; nothing here composes modifier chords beyond Shift (used
//! only to distinguish `Tab` from `Shift-Tab`).

use crossterm::event::{KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyModifiers as CKeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyToken {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    ShiftTab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

/// Map a crossterm key event to a `KeyToken`. `None` for keys the viewer
/// has no binding for (function keys, media keys, modifier-only events).
pub fn map_key_event(event: &CKeyEvent) -> Option<KeyToken> {
    let shift = event.modifiers.contains(CKeyModifiers::SHIFT);
    let token = match event.code {
        CKeyCode::Char(c) => KeyToken::Char(c),
        CKeyCode::Enter => KeyToken::Enter,
        CKeyCode::Esc => KeyToken::Esc,
        CKeyCode::Backspace => KeyToken::Backspace,
        CKeyCode::Tab => {
            if shift {
                KeyToken::ShiftTab
            } else {
                KeyToken::Tab
            }
        }
        CKeyCode::BackTab => KeyToken::ShiftTab,
        CKeyCode::Up => KeyToken::Up,
        CKeyCode::Down => KeyToken::Down,
        CKeyCode::Left => KeyToken::Left,
        CKeyCode::Right => KeyToken::Right,
        CKeyCode::Home => KeyToken::Home,
        CKeyCode::End => KeyToken::End,
        CKeyCode::PageUp => KeyToken::PageUp,
        CKeyCode::PageDown => KeyToken::PageDown,
        _ => return None,
    };
    Some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn key_event(code: CKeyCode, modifiers: CKeyModifiers) -> CKeyEvent {
        CKeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::empty(),
        }
    }

    #[test]
    fn maps_basic_char() {
        let ev = key_event(CKeyCode::Char('q'), CKeyModifiers::NONE);
        assert_eq!(map_key_event(&ev), Some(KeyToken::Char('q')));
    }

    #[test]
    fn tab_vs_shift_tab() {
        let tab = key_event(CKeyCode::Tab, CKeyModifiers::NONE);
        let shift_tab = key_event(CKeyCode::Tab, CKeyModifiers::SHIFT);
        assert_eq!(map_key_event(&tab), Some(KeyToken::Tab));
        assert_eq!(map_key_event(&shift_tab), Some(KeyToken::ShiftTab));
    }

    #[test]
    fn backtab_maps_to_shift_tab() {
        let ev = key_event(CKeyCode::BackTab, CKeyModifiers::NONE);
        assert_eq!(map_key_event(&ev), Some(KeyToken::ShiftTab));
    }

    #[test]
    fn unsupported_keys_return_none() {
        let ev = key_event(CKeyCode::F(5), CKeyModifiers::NONE);
        assert_eq!(map_key_event(&ev), None);
    }
}
