//! TUI 2048 (workspace facade crate).
//!
//! Re-exports the workspace crates under one `tui_2048::{core,adapter,term,input,types}`
//! path; the implementation lives in dedicated crates under `crates/`.

pub use tui_2048_adapter as adapter;
pub use tui_2048_core as core;
pub use tui_2048_input as input;
pub use tui_2048_term as term;
pub use tui_2048_types as types;
