//! Terminal "game renderer" module.
//!
//! Renders into a simple framebuffer that is diffed and flushed to the
//! terminal, instead of going through a widget/layout library.
//!
//! - [`fb`]: styled character framebuffer
//! - [`game_view`]: pure mapping from a `GameState` to a framebuffer
//! - [`renderer`]: crossterm backend with changed-run redraws

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use tui_2048_core as core;
pub use tui_2048_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{tile_style, GameView, TileSize, ViewState, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
