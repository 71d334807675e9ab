//! Keymap
//!
//! Key events mapped to actions, for the editing line and the mode menu.

use super::keys::{KeyEvent, EOT, ETX};
use super::modes::InputMode;

/// One-line help shown when the mode menu opens
pub const MENU_HELP: &str = "input mode: [s]td, [i]nt, [b]raille ; [enter] inserts EOL ; \
                             [d] inserts EOF ; [r]esets input ; ctrl+D again raises EOF";

/// Actions that can be triggered by key presses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Editing
    InsertChar(char),
    InsertText(String),
    DeleteChar,
    ClearLine,
    Submit,

    // Menu
    OpenMenu,
    SetMode(InputMode),
    Resume,

    // Session
    Abort,
    Interrupt,
}

/// Map key event to action while editing
pub fn editing_action(key: &KeyEvent) -> Action {
    match key {
        KeyEvent::Enter => Action::Submit,
        KeyEvent::Backspace => Action::DeleteChar,
        KeyEvent::Control(EOT) => Action::OpenMenu,
        KeyEvent::Control(ETX) => Action::Interrupt,
        KeyEvent::Control(code) => Action::InsertChar(char::from(*code)),
        KeyEvent::Escape(seq) => match navigation_symbol(seq) {
            Some(symbol) => Action::InsertChar(symbol),
            None => Action::InsertText(seq.clone()),
        },
        KeyEvent::Printable(c) => Action::InsertChar(*c),
    }
}

/// Map key event to action in the mode menu
pub fn menu_action(key: &KeyEvent) -> Action {
    match key {
        KeyEvent::Printable('s') => Action::SetMode(InputMode::Default),
        KeyEvent::Printable('i') => Action::SetMode(InputMode::Integer),
        KeyEvent::Printable('b') => Action::SetMode(InputMode::Braille),
        KeyEvent::Printable('r') => Action::ClearLine,
        KeyEvent::Printable('d') => Action::InsertChar(char::from(EOT)),
        KeyEvent::Enter => Action::InsertChar('\n'),
        KeyEvent::Control(EOT) => Action::Abort,
        KeyEvent::Control(ETX) => Action::Interrupt,
        _ => Action::Resume,
    }
}

/// Symbol recorded for a navigation key; the line has no cursor, so
/// these are data rather than movements
pub fn navigation_symbol(seq: &str) -> Option<char> {
    match seq {
        "\x1b[A" | "\x1bOA" => Some('↑'),
        "\x1b[B" | "\x1bOB" => Some('↓'),
        "\x1b[C" | "\x1bOC" => Some('→'),
        "\x1b[D" | "\x1bOD" => Some('←'),
        "\x1b[H" | "\x1bOH" => Some('↤'),
        "\x1b[F" | "\x1bOF" => Some('↦'),
        "\x1b[5~" => Some('↥'),
        "\x1b[6~" => Some('↧'),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn esc(seq: &str) -> KeyEvent {
        KeyEvent::Escape(seq.to_string())
    }

    #[test]
    fn test_editing_keys() {
        assert_eq!(editing_action(&KeyEvent::Printable('a')), Action::InsertChar('a'));
        assert_eq!(editing_action(&KeyEvent::Backspace), Action::DeleteChar);
        assert_eq!(editing_action(&KeyEvent::Enter), Action::Submit);
        assert_eq!(editing_action(&KeyEvent::Control(EOT)), Action::OpenMenu);
        assert_eq!(editing_action(&KeyEvent::Control(ETX)), Action::Interrupt);
    }

    #[test]
    fn test_navigation_symbols() {
        let expected = [
            ("\x1b[A", '↑'),
            ("\x1b[B", '↓'),
            ("\x1b[C", '→'),
            ("\x1b[D", '←'),
            ("\x1b[H", '↤'),
            ("\x1b[F", '↦'),
            ("\x1b[5~", '↥'),
            ("\x1b[6~", '↧'),
        ];
        for (seq, symbol) in expected {
            assert_eq!(editing_action(&esc(seq)), Action::InsertChar(symbol), "{:?}", seq);
        }
        assert_eq!(editing_action(&esc("\x1bOA")), Action::InsertChar('↑'));
    }

    #[test]
    fn test_unknown_escape_kept_as_text() {
        assert_eq!(editing_action(&esc("\x1b[3~")), Action::InsertText("\x1b[3~".into()));
    }

    #[test]
    fn test_menu_keys() {
        assert_eq!(menu_action(&KeyEvent::Printable('i')), Action::SetMode(InputMode::Integer));
        assert_eq!(menu_action(&KeyEvent::Printable('b')), Action::SetMode(InputMode::Braille));
        assert_eq!(menu_action(&KeyEvent::Printable('s')), Action::SetMode(InputMode::Default));
        assert_eq!(menu_action(&KeyEvent::Printable('r')), Action::ClearLine);
        assert_eq!(menu_action(&KeyEvent::Printable('d')), Action::InsertChar('\x04'));
        assert_eq!(menu_action(&KeyEvent::Enter), Action::InsertChar('\n'));
        assert_eq!(menu_action(&KeyEvent::Control(EOT)), Action::Abort);
        assert_eq!(menu_action(&KeyEvent::Printable('x')), Action::Resume);
    }
}
