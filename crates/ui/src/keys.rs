use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tankobon_application::{Key, KeyInput};

/// Terminal key to reader input. Keys the reader never binds map to `None`.
pub(crate) fn key_input(key: &KeyEvent) -> Option<KeyInput> {
    let mapped = match key.code {
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Esc => Key::Escape,
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Char(c) => Key::Char(c),
        _ => return None,
    };
    let modified = key
        .modifiers
        .intersects(KeyModifiers::SHIFT | KeyModifiers::CONTROL);
    Some(KeyInput {
        key: mapped,
        modified,
    })
}

pub(crate) fn is_scroll_down(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Down | KeyCode::Char('j'))
}

pub(crate) fn is_scroll_up(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Up | KeyCode::Char('k'))
}
