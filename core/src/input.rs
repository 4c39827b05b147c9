use serde::{Deserialize, Serialize};

use crate::*;

/// How long a primary press must be held to flag instead of reveal.
pub const LONG_PRESS_MS: u32 = 400;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Flag,
}

impl Key {
    /// Maps a DOM `KeyboardEvent.key` value.
    pub fn from_key_name(name: &str) -> Option<Self> {
        use Key::*;
        Some(match name {
            "ArrowUp" => Up,
            "ArrowDown" => Down,
            "ArrowLeft" => Left,
            "ArrowRight" => Right,
            " " | "Enter" => Confirm,
            "f" | "F" => Flag,
            _ => return None,
        })
    }
}

/// Moves `selection` one step, clamped to a board of `size`.
pub fn move_selection(selection: Coord2, key: Key, size: Coord2) -> Coord2 {
    let (row, col) = selection;
    let max_row = size.0.saturating_sub(1);
    let max_col = size.1.saturating_sub(1);
    match key {
        Key::Up => (row.saturating_sub(1), col),
        Key::Down => (row.saturating_add(1).min(max_row), col),
        Key::Left => (row, col.saturating_sub(1)),
        Key::Right => (row, col.saturating_add(1).min(max_col)),
        Key::Confirm | Key::Flag => selection,
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// What the adapter has to do after a pointer press.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PointerAction {
    None,
    /// Start a [`LONG_PRESS_MS`] timer, replacing any pending one, and call
    /// [`GameSession::long_press_elapsed`] when it fires.
    StartLongPress(Coord2),
}

/// Single pending long press; starting another replaces it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LongPress {
    pending: Option<Coord2>,
}

impl LongPress {
    pub fn start(&mut self, coords: Coord2) -> Option<Coord2> {
        self.pending.replace(coords)
    }

    pub fn cancel(&mut self) -> Option<Coord2> {
        self.pending.take()
    }

    /// Timer expired: the press becomes a flag and can no longer reveal.
    pub fn fire(&mut self) -> Option<Coord2> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
