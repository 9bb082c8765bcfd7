//! Terminal input module.
//!
//! Maps `crossterm` key events into [`UiAction`]s. 2048 is turn based, so every
//! key press is one action; there is no repeat or timing state.

pub mod map;

pub use tui_2048_types as types;

pub use map::{handle_key_event, should_quit, UiAction};
