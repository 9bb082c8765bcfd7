//! Protocol module - JSON message types for the game server
//!
//! Line-delimited JSON, one message per line. Every message carries `type`,
//! `seq` (sequence number, echoed back in the reply) and `ts` (timestamp in ms).
//! Field names are camelCase (`userId`, `gameOver`, `scoreDelta`).

use serde::{Deserialize, Serialize};

use crate::core::GameState;
use crate::core::MoveResult;
use crate::types::Tile;

// ============== Client -> Server Messages ==============

/// Start (or replace) the game for a user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartMessage {
    pub seq: u64,
    #[serde(default)]
    pub ts: u64,
    #[serde(default)]
    pub user_id: String,
    /// Board size; missing or 0 selects the default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
}

/// Move in one direction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveMessage {
    pub seq: u64,
    #[serde(default)]
    pub ts: u64,
    #[serde(default)]
    pub user_id: String,
    /// Kept as raw text so an unknown direction gets its own error code.
    #[serde(default)]
    pub direction: String,
}

/// Restart uses the same shape as start.
pub type RestartMessage = StartMessage;

// ============== Server -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateType {
    #[serde(rename = "state")]
    State,
}

/// Snapshot of one user's game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateMessage {
    #[serde(rename = "type")]
    pub msg_type: StateType,
    pub seq: u64,
    pub ts: u64,
    pub board: Vec<Vec<Tile>>,
    pub score: u64,
    pub won: bool,
    pub game_over: bool,
    pub size: usize,
    /// Only present in replies to `move`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moved: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_delta: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

/// Error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "invalid_message")]
    InvalidMessage,
    #[serde(rename = "user_id_required")]
    UserIdRequired,
    #[serde(rename = "unknown_user")]
    UnknownUser,
    #[serde(rename = "invalid_direction")]
    InvalidDirection,
    #[serde(rename = "invalid_size")]
    InvalidSize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
}

/// Any server reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServerMessage {
    State(StateMessage),
    Error(ErrorMessage),
}

impl ServerMessage {
    pub fn seq(&self) -> u64 {
        match self {
            ServerMessage::State(m) => m.seq,
            ServerMessage::Error(m) => m.seq,
        }
    }
}

// ============== Message Parsing ==============

/// Parsed incoming message
#[derive(Debug, Clone)]
pub enum ParsedMessage {
    Start(StartMessage),
    Move(MoveMessage),
    Restart(RestartMessage),
    Unknown(UnknownMessage),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMessage {
    pub seq: u64,
    pub msg_type: String,
}

/// Parse a JSON message from a string
pub fn parse_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type")]
    enum InboundMessage {
        #[serde(rename = "start")]
        Start(StartMessage),
        #[serde(rename = "move")]
        Move(MoveMessage),
        #[serde(rename = "restart")]
        Restart(RestartMessage),
    }

    match serde_json::from_str::<InboundMessage>(json) {
        Ok(InboundMessage::Start(m)) => Ok(ParsedMessage::Start(m)),
        Ok(InboundMessage::Move(m)) => Ok(ParsedMessage::Move(m)),
        Ok(InboundMessage::Restart(m)) => Ok(ParsedMessage::Restart(m)),
        Err(e) => {
            // Unknown message type is not a hard parse error for the protocol.
            #[derive(Debug, Deserialize)]
            struct Envelope {
                #[serde(rename = "type")]
                msg_type: Option<String>,
                seq: Option<u64>,
            }
            let envelope = serde_json::from_str::<Envelope>(json)?;
            let msg_type = envelope.msg_type.unwrap_or_else(|| "unknown".to_string());
            if !matches!(msg_type.as_str(), "start" | "move" | "restart") {
                return Ok(ParsedMessage::Unknown(UnknownMessage {
                    seq: envelope.seq.unwrap_or(0),
                    msg_type,
                }));
            }
            Err(e)
        }
    }
}

/// Best-effort `seq` extraction from a line that failed to parse.
pub fn extract_seq(json: &str) -> u64 {
    #[derive(Deserialize)]
    struct SeqOnly {
        seq: Option<u64>,
    }
    serde_json::from_str::<SeqOnly>(json)
        .ok()
        .and_then(|s| s.seq)
        .unwrap_or(0)
}

// ============== Utility Functions ==============

/// Create a state reply for `game`
pub fn create_state(seq: u64, game: &GameState) -> StateMessage {
    StateMessage {
        msg_type: StateType::State,
        seq,
        ts: current_timestamp_ms(),
        board: game.board().rows(),
        score: game.score(),
        won: game.won(),
        game_over: game.game_over(),
        size: game.size(),
        moved: None,
        score_delta: None,
    }
}

/// Create a state reply for a move, including move metadata
pub fn create_move_state(seq: u64, game: &GameState, result: &MoveResult) -> StateMessage {
    StateMessage {
        moved: Some(result.moved),
        score_delta: Some(result.score_delta),
        ..create_state(seq, game)
    }
}

/// Create an error message
pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        ts: current_timestamp_ms(),
        code,
        message: message.to_string(),
    }
}

/// Get current timestamp in milliseconds
fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Board;

    #[test]
    fn test_parse_start() {
        let json = r#"{"type":"start","seq":1,"ts":1234567890,"userId":"u_abc","size":5}"#;

        match parse_message(json).unwrap() {
            ParsedMessage::Start(msg) => {
                assert_eq!(msg.seq, 1);
                assert_eq!(msg.user_id, "u_abc");
                assert_eq!(msg.size, Some(5));
            }
            _ => panic!("Expected Start message"),
        }
    }

    #[test]
    fn test_parse_start_without_size_or_ts() {
        let json = r#"{"type":"start","seq":4,"userId":"u"}"#;
        match parse_message(json).unwrap() {
            ParsedMessage::Start(msg) => {
                assert_eq!(msg.size, None);
                assert_eq!(msg.ts, 0);
            }
            _ => panic!("Expected Start message"),
        }
    }

    #[test]
    fn test_parse_move() {
        let json = r#"{"type":"move","seq":2,"ts":1,"userId":"u_abc","direction":"up"}"#;

        match parse_message(json).unwrap() {
            ParsedMessage::Move(msg) => {
                assert_eq!(msg.direction, "up");
                assert_eq!(msg.user_id, "u_abc");
            }
            _ => panic!("Expected Move message"),
        }
    }

    #[test]
    fn test_parse_restart() {
        let json = r#"{"type":"restart","seq":3,"ts":1,"userId":"u","size":6}"#;
        assert!(matches!(
            parse_message(json).unwrap(),
            ParsedMessage::Restart(StartMessage { size: Some(6), .. })
        ));
    }

    #[test]
    fn test_parse_unknown_type() {
        let json = r#"{"type":"undo","seq":9}"#;
        match parse_message(json).unwrap() {
            ParsedMessage::Unknown(u) => {
                assert_eq!(u.seq, 9);
                assert_eq!(u.msg_type, "undo");
            }
            _ => panic!("Expected Unknown message"),
        }
    }

    #[test]
    fn test_parse_malformed_known_type_is_error() {
        // seq is required
        assert!(parse_message(r#"{"type":"move","userId":"u"}"#).is_err());
        assert!(parse_message("not json").is_err());
    }

    #[test]
    fn test_extract_seq() {
        assert_eq!(extract_seq(r#"{"type":"move","seq":17}"#), 17);
        assert_eq!(extract_seq("garbage"), 0);
    }

    #[test]
    fn test_state_serializes_camel_case() {
        let board = Board::from_rows(vec![vec![2, 0], vec![0, 4]]).unwrap();
        let game = GameState::from_board(board);
        let state = create_state(5, &game);
        let v: serde_json::Value = serde_json::to_value(&state).unwrap();

        assert_eq!(v["type"], "state");
        assert_eq!(v["seq"], 5);
        assert_eq!(v["board"], serde_json::json!([[2, 0], [0, 4]]));
        assert_eq!(v["gameOver"], false);
        assert_eq!(v["size"], 2);
        assert!(v.get("moved").is_none());
        assert!(v.get("scoreDelta").is_none());
    }

    #[test]
    fn test_create_error() {
        let error = create_error(3, ErrorCode::UnknownUser, "Invalid userId");
        assert_eq!(error.msg_type, ErrorType::Error);
        let v: serde_json::Value = serde_json::to_value(&error).unwrap();
        assert_eq!(v["type"], "error");
        assert_eq!(v["code"], "unknown_user");
    }

    #[test]
    fn test_server_message_untagged_roundtrip() {
        let err = ServerMessage::Error(create_error(8, ErrorCode::InvalidSize, "bad"));
        let json = serde_json::to_string(&err).unwrap();
        let back: ServerMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
        assert_eq!(back.seq(), 8);
    }
}
