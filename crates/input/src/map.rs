//! Key mapping from terminal events to game actions.

use crate::types::Direction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Player intent decoded from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiAction {
    Move(Direction),
    Restart,
    /// Grow the board by one and restart.
    Grow,
    /// Shrink the board by one and restart.
    Shrink,
    ToggleHelp,
}

impl UiAction {
    /// Whether the action still applies once the game has ended.
    pub fn allowed_when_finished(self) -> bool {
        !matches!(self, UiAction::Move(_))
    }
}

/// Map keyboard input to game actions.
pub fn handle_key_event(key: KeyEvent) -> Option<UiAction> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    match key.code {
        // Movement
        KeyCode::Left
        | KeyCode::Char('h')
        | KeyCode::Char('H')
        | KeyCode::Char('a')
        | KeyCode::Char('A') => Some(UiAction::Move(Direction::Left)),
        KeyCode::Right
        | KeyCode::Char('l')
        | KeyCode::Char('L')
        | KeyCode::Char('d')
        | KeyCode::Char('D') => Some(UiAction::Move(Direction::Right)),
        KeyCode::Up
        | KeyCode::Char('k')
        | KeyCode::Char('K')
        | KeyCode::Char('w')
        | KeyCode::Char('W') => Some(UiAction::Move(Direction::Up)),
        KeyCode::Down
        | KeyCode::Char('j')
        | KeyCode::Char('J')
        | KeyCode::Char('s')
        | KeyCode::Char('S') => Some(UiAction::Move(Direction::Down)),

        // Board size
        KeyCode::Char('+') | KeyCode::Char('=') => Some(UiAction::Grow),
        KeyCode::Char('-') | KeyCode::Char('_') => Some(UiAction::Shrink),

        KeyCode::Char('r') | KeyCode::Char('R') => Some(UiAction::Restart),
        KeyCode::Char('?') | KeyCode::F(1) => Some(UiAction::ToggleHelp),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(
        key.code,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
    ) || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
