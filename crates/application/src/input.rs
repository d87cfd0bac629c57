//! Raw key input to reader actions.
//!
//! Front ends translate their native key events into [`KeyInput`] and feed
//! the resulting [`InputEvent`]s through an [`InputQueue`]; the session
//! never sees terminal or window types.

use std::collections::VecDeque;

use tankobon_core::ReadingMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Space,
    Escape,
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    /// Shift or Ctrl held.
    pub modified: bool,
}

impl KeyInput {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            modified: false,
        }
    }

    pub fn modified(key: Key) -> Self {
        Self {
            key,
            modified: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    NextPage,
    PreviousPage,
    NextChapter,
    PreviousChapter,
    JumpToStart,
    JumpToEnd,
    ToggleMode,
    ToggleAutoAdvance,
    TogglePageIndicator,
    /// Continuous mode: the furthest page index currently in view.
    ScrolledTo(usize),
    Exit,
}

/// Continuous mode drops page-level keys; scrolling drives the position
/// there, so only chapter jumps, toggles and exit stay bound.
pub fn map_key(mode: ReadingMode, input: KeyInput) -> Option<InputEvent> {
    let event = match (input.key, input.modified) {
        (Key::Left, true) | (Key::Char('['), _) => InputEvent::PreviousChapter,
        (Key::Right, true) | (Key::Char(']'), _) => InputEvent::NextChapter,
        (Key::Left, false) | (Key::Char('h'), false) => InputEvent::PreviousPage,
        (Key::Right, false) | (Key::Char('l'), false) | (Key::Space, _) => InputEvent::NextPage,
        (Key::Home, _) => InputEvent::JumpToStart,
        (Key::End, _) => InputEvent::JumpToEnd,
        (Key::Char('m'), _) => InputEvent::ToggleMode,
        (Key::Char('a'), _) => InputEvent::ToggleAutoAdvance,
        (Key::Char('p'), _) => InputEvent::TogglePageIndicator,
        (Key::Escape, _) | (Key::Char('q'), _) => InputEvent::Exit,
        _ => return None,
    };

    if mode == ReadingMode::Continuous && is_page_level(event) {
        return None;
    }
    Some(event)
}

fn is_page_level(event: InputEvent) -> bool {
    matches!(
        event,
        InputEvent::NextPage
            | InputEvent::PreviousPage
            | InputEvent::JumpToStart
            | InputEvent::JumpToEnd
    )
}

/// FIFO of pending reader actions, drained by the session between frames.
#[derive(Debug, Default)]
pub struct InputQueue {
    events: VecDeque<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    /// Maps and enqueues a key; returns whether it produced an event.
    pub fn push_key(&mut self, mode: ReadingMode, input: KeyInput) -> bool {
        match map_key(mode, input) {
            Some(event) => {
                self.push(event);
                true
            }
            None => false,
        }
    }

    pub fn pop(&mut self) -> Option<InputEvent> {
        self.events.pop_front()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
