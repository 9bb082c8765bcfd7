//! Adapter module - multi-user game server over a TCP socket with JSON protocol
//!
//! Remote clients play 2048 by sending one JSON request per line. Each request
//! names a `userId`; the server keeps one game per user in a [`SessionStore`]
//! and answers every request with exactly one reply line.
//!
//! # Message Types
//!
//! ## Client → Server
//!
//! - **start**: Create (or replace) the user's game, optional `size`
//! - **move**: Slide the user's board in `direction` (`left`, `right`, `up`, `down`)
//! - **restart**: Same as start
//!
//! ## Server → Client
//!
//! - **state**: Board, score, `won`, `gameOver`, `size`; replies to `move` also
//!   carry `moved` and `scoreDelta`
//! - **error**: `code` and `message`; the connection stays open
//!
//! Replies echo the request `seq` (0 when the line could not be parsed).
//!
//! # Environment Variables
//!
//! - `TUI2048_HOST`: Bind address (default: "127.0.0.1")
//! - `TUI2048_PORT`: Port number (default: 5001)
//! - `TUI2048_MAX_BOARD_SIZE`: Largest board a client may request (default: 10)
//! - `TUI2048_SESSION_TTL_SECS`: Idle session lifetime, 0 disables (default: 3600)
//! - `TUI2048_MAX_SESSIONS`: Live session cap (default: 10000)
//! - `TUI2048_SWEEP_SECS`: Idle sweep period (default: 60)
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"start","seq":1,"userId":"u1","size":4}
//! Server -> Client: {"type":"state","seq":1,"ts":1700000000000,"board":[[0,2,0,0],...],"score":0,"won":false,"gameOver":false,"size":4}
//! Client -> Server: {"type":"move","seq":2,"userId":"u1","direction":"left"}
//! Server -> Client: {"type":"state","seq":2,...,"score":4,"moved":true,"scoreDelta":4}
//! Client -> Server: {"type":"move","seq":3,"userId":"u2","direction":"left"}
//! Server -> Client: {"type":"error","seq":3,"ts":1700000000002,"code":"unknown_user","message":"..."}
//! ```
//!
//! # Testing
//!
//! ```bash
//! nc 127.0.0.1 5001
//! {"type":"start","seq":1,"userId":"me"}
//! ```

pub mod protocol;
pub mod server;
pub mod session;

pub use tui_2048_core as core;
pub use tui_2048_types as types;

// Re-export protocol types for convenience
pub use protocol::*;
pub use server::{handle_line, run_server, ServerConfig, ServerState};
pub use session::{SessionConfig, SessionError, SessionStore};
