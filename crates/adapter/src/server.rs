//! TCP server for the game protocol
//!
//! Handles incoming connections and routes each request line to the shared
//! [`SessionStore`]. Uses tokio for async networking.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use rand::Rng;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{oneshot, Mutex};
use tracing::{debug, info, warn};

use crate::protocol::*;
use crate::core::EngineError;
use crate::session::{SessionConfig, SessionError, SessionStore};
use crate::types::{Direction, MAX_BOARD_SIZE, MIN_BOARD_SIZE};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub session: SessionConfig,
    /// How often idle sessions are swept.
    pub sweep_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5001,
            session: SessionConfig::default(),
            sweep_interval: Duration::from_secs(60),
        }
    }
}

impl ServerConfig {
    /// Create from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        use std::env;

        fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
            env::var(key).ok().and_then(|s| s.trim().parse().ok())
        }

        let defaults = Self::default();
        let host = env::var("TUI2048_HOST").unwrap_or(defaults.host);
        let port = parsed("TUI2048_PORT").unwrap_or(defaults.port);

        // 0 disables expiry
        let idle_ttl = match parsed::<u64>("TUI2048_SESSION_TTL_SECS") {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => defaults.session.idle_ttl,
        };
        let max_sessions =
            parsed("TUI2048_MAX_SESSIONS").unwrap_or(defaults.session.max_sessions);
        let max_board_size =
            parsed("TUI2048_MAX_BOARD_SIZE").unwrap_or(defaults.session.max_board_size);
        let sweep_interval = parsed("TUI2048_SWEEP_SECS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.sweep_interval);

        Self {
            host,
            port,
            session: SessionConfig {
                idle_ttl,
                max_sessions,
                max_board_size,
            },
            sweep_interval,
        }
        .normalized()
    }

    /// Clamp limits into ranges the engine supports.
    pub fn normalized(mut self) -> Self {
        self.session.max_board_size = self
            .session
            .max_board_size
            .clamp(MIN_BOARD_SIZE, MAX_BOARD_SIZE);
        self.session.max_sessions = self.session.max_sessions.max(1);
        if self.sweep_interval.is_zero() {
            self.sweep_interval = Duration::from_secs(1);
        }
        self
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid socket address {}:{}", self.host, self.port))
    }
}

/// Shared server state
pub struct ServerState {
    pub store: Mutex<SessionStore>,
}

impl ServerState {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            store: Mutex::new(SessionStore::new(config.session.clone())),
        }
    }
}

/// Map a session error to its wire error.
fn session_error(seq: u64, err: &SessionError) -> ErrorMessage {
    let code = match err {
        SessionError::UserIdRequired => ErrorCode::UserIdRequired,
        SessionError::UnknownUser(_) => ErrorCode::UnknownUser,
        SessionError::Engine(EngineError::InvalidSize { .. }) => ErrorCode::InvalidSize,
        SessionError::Engine(EngineError::InvalidDirection(_)) => ErrorCode::InvalidDirection,
        SessionError::Engine(_) => ErrorCode::InvalidMessage,
    };
    create_error(seq, code, &err.to_string())
}

/// Handle one request line against the store and build the reply.
///
/// Pure with respect to I/O so it can be exercised without sockets.
pub fn handle_line<R: Rng + ?Sized>(
    store: &mut SessionStore,
    line: &str,
    now: Instant,
    rng: &mut R,
) -> ServerMessage {
    let parsed = match parse_message(line) {
        Ok(p) => p,
        Err(e) => {
            return ServerMessage::Error(create_error(
                extract_seq(line),
                ErrorCode::InvalidMessage,
                &format!("invalid message: {}", e),
            ));
        }
    };

    match parsed {
        ParsedMessage::Start(msg) | ParsedMessage::Restart(msg) => {
            match store.start(&msg.user_id, msg.size, now, rng) {
                Ok(game) => ServerMessage::State(create_state(msg.seq, game)),
                Err(e) => ServerMessage::Error(session_error(msg.seq, &e)),
            }
        }
        ParsedMessage::Move(msg) => {
            if msg.user_id.is_empty() {
                return ServerMessage::Error(session_error(msg.seq, &SessionError::UserIdRequired));
            }
            if store.get(&msg.user_id).is_none() {
                let err = SessionError::UnknownUser(msg.user_id.clone());
                return ServerMessage::Error(session_error(msg.seq, &err));
            }
            let direction: Direction = match msg.direction.parse() {
                Ok(d) => d,
                Err(e) => {
                    return ServerMessage::Error(create_error(
                        msg.seq,
                        ErrorCode::InvalidDirection,
                        &e.to_string(),
                    ));
                }
            };
            match store.apply_move(&msg.user_id, direction, now, rng) {
                Ok((game, result)) => {
                    ServerMessage::State(create_move_state(msg.seq, game, &result))
                }
                Err(e) => ServerMessage::Error(session_error(msg.seq, &e)),
            }
        }
        ParsedMessage::Unknown(u) => ServerMessage::Error(create_error(
            u.seq,
            ErrorCode::InvalidMessage,
            &format!("unknown message type {:?}", u.msg_type),
        )),
    }
}

/// Start the TCP server and run until `shutdown` resolves
pub async fn run_server(
    config: ServerConfig,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    let bound = listener.local_addr()?;
    info!(addr = %bound, "game server listening");
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let state = Arc::new(ServerState::new(&config));

    // Idle session sweeper.
    let sweeper = {
        let state = Arc::clone(&state);
        let period = config.sweep_interval;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let mut store = state.store.lock().await;
                let removed = store.sweep_expired(Instant::now());
                if removed > 0 {
                    warn!(removed, remaining = store.len(), "evicted idle sessions");
                }
            }
        })
    };

    let mut client_id_counter = 0usize;
    tokio::pin!(shutdown);

    // Accept incoming connections
    let result = loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("shutdown requested");
                break Ok(());
            }
            accepted = listener.accept() => {
                let (socket, peer) = match accepted {
                    Ok(v) => v,
                    Err(e) => break Err(anyhow::Error::from(e).context("accept failed")),
                };
                client_id_counter += 1;
                let client_id = client_id_counter;
                info!(client_id, peer = %peer, "client connected");

                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    if let Err(e) = handle_client(socket, client_id, state).await {
                        warn!(client_id, error = %e, "client error");
                    }
                    info!(client_id, "client disconnected");
                });
            }
        }
    };

    sweeper.abort();
    result
}

/// Handle a single client connection
async fn handle_client(
    socket: TcpStream,
    client_id: usize,
    state: Arc<ServerState>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = tokio::io::split(socket);
    let mut reader = BufReader::new(reader);

    let mut line = String::new();
    let mut buf: Vec<u8> = Vec::with_capacity(1024);

    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            // Client disconnected
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let reply = {
            let mut store = state.store.lock().await;
            let mut rng = rand::thread_rng();
            handle_line(&mut store, trimmed, Instant::now(), &mut rng)
        };

        let seq = reply.seq();
        match &reply {
            ServerMessage::State(s) => debug!(client_id, seq, score = s.score, "state sent"),
            ServerMessage::Error(e) => {
                warn!(client_id, seq, code = ?e.code, message = %e.message, "request rejected")
            }
        }

        buf.clear();
        serde_json::to_writer(&mut buf, &reply)?;
        buf.push(b'\n');
        writer.write_all(&buf).await?;
        writer.flush().await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup() -> (SessionStore, StdRng, Instant) {
        (
            SessionStore::new(SessionConfig::default()),
            StdRng::seed_from_u64(2048),
            Instant::now(),
        )
    }

    fn expect_error(reply: ServerMessage) -> ErrorMessage {
        match reply {
            ServerMessage::Error(e) => e,
            other => panic!("expected error, got {:?}", other),
        }
    }

    fn expect_state(reply: ServerMessage) -> StateMessage {
        match reply {
            ServerMessage::State(s) => s,
            other => panic!("expected state, got {:?}", other),
        }
    }

    #[test]
    fn test_start_then_move() {
        let (mut store, mut rng, now) = setup();
        let start = expect_state(handle_line(
            &mut store,
            r#"{"type":"start","seq":1,"userId":"u1","size":4}"#,
            now,
            &mut rng,
        ));
        assert_eq!(start.seq, 1);
        assert_eq!(start.size, 4);
        assert_eq!(start.moved, None);

        let moved = expect_state(handle_line(
            &mut store,
            r#"{"type":"move","seq":2,"userId":"u1","direction":"left"}"#,
            now,
            &mut rng,
        ));
        assert_eq!(moved.seq, 2);
        assert!(moved.moved.is_some());
        assert!(moved.score_delta.is_some());
    }

    #[test]
    fn test_move_unknown_user() {
        let (mut store, mut rng, now) = setup();
        let err = expect_error(handle_line(
            &mut store,
            r#"{"type":"move","seq":3,"userId":"nobody","direction":"up"}"#,
            now,
            &mut rng,
        ));
        assert_eq!(err.code, ErrorCode::UnknownUser);
        assert_eq!(err.seq, 3);
    }

    #[test]
    fn test_move_invalid_direction() {
        let (mut store, mut rng, now) = setup();
        handle_line(
            &mut store,
            r#"{"type":"start","seq":1,"userId":"u"}"#,
            now,
            &mut rng,
        );
        let before = store.get("u").cloned();
        let err = expect_error(handle_line(
            &mut store,
            r#"{"type":"move","seq":2,"userId":"u","direction":"sideways"}"#,
            now,
            &mut rng,
        ));
        assert_eq!(err.code, ErrorCode::InvalidDirection);
        // Rejected moves leave the game untouched.
        assert_eq!(store.get("u").cloned(), before);
    }

    #[test]
    fn test_missing_user_id() {
        let (mut store, mut rng, now) = setup();
        let err = expect_error(handle_line(
            &mut store,
            r#"{"type":"start","seq":1}"#,
            now,
            &mut rng,
        ));
        assert_eq!(err.code, ErrorCode::UserIdRequired);
    }

    #[test]
    fn test_invalid_size() {
        let (mut store, mut rng, now) = setup();
        let err = expect_error(handle_line(
            &mut store,
            r#"{"type":"restart","seq":1,"userId":"u","size":1}"#,
            now,
            &mut rng,
        ));
        assert_eq!(err.code, ErrorCode::InvalidSize);
        assert_eq!(err.message, "board size 1 out of range (2..=10)");
    }

    #[test]
    fn test_engine_errors_keep_their_code() {
        let size = SessionError::Engine(EngineError::InvalidSize {
            size: 20,
            min: 2,
            max: 10,
        });
        assert_eq!(session_error(1, &size).code, ErrorCode::InvalidSize);

        let parse = "sideways".parse::<Direction>().unwrap_err();
        let direction = SessionError::Engine(parse.into());
        assert_eq!(session_error(2, &direction).code, ErrorCode::InvalidDirection);

        let board = SessionError::Engine(EngineError::EmptyBoard);
        let err = session_error(3, &board);
        assert_eq!(err.code, ErrorCode::InvalidMessage);
        assert_eq!(err.seq, 3);
    }

    #[test]
    fn test_garbage_and_unknown_type() {
        let (mut store, mut rng, now) = setup();
        let err = expect_error(handle_line(&mut store, "{not json", now, &mut rng));
        assert_eq!(err.code, ErrorCode::InvalidMessage);
        assert_eq!(err.seq, 0);

        let err = expect_error(handle_line(
            &mut store,
            r#"{"type":"undo","seq":12}"#,
            now,
            &mut rng,
        ));
        assert_eq!(err.code, ErrorCode::InvalidMessage);
        assert_eq!(err.seq, 12);
    }

    #[test]
    fn test_config_normalized() {
        let mut config = ServerConfig::default();
        config.session.max_board_size = 99;
        config.session.max_sessions = 0;
        config.sweep_interval = Duration::ZERO;
        let config = config.normalized();
        assert_eq!(config.session.max_board_size, MAX_BOARD_SIZE);
        assert_eq!(config.session.max_sessions, 1);
        assert_eq!(config.sweep_interval, Duration::from_secs(1));
    }

    #[test]
    fn test_config_normalized_raises_tiny_board_limit() {
        let mut config = ServerConfig::default();
        config.session.max_board_size = 1;
        let config = config.normalized();
        assert_eq!(config.session.max_board_size, MIN_BOARD_SIZE);

        let mut store = SessionStore::new(config.session);
        let mut rng = StdRng::seed_from_u64(7);
        let state = expect_state(handle_line(
            &mut store,
            r#"{"type":"start","seq":1,"userId":"u","size":2}"#,
            Instant::now(),
            &mut rng,
        ));
        assert_eq!(state.size, 2);
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig::default();
        assert_eq!(
            config.socket_addr().unwrap(),
            "127.0.0.1:5001".parse::<SocketAddr>().unwrap()
        );
        let bad = ServerConfig {
            host: "not a host".to_string(),
            ..ServerConfig::default()
        };
        assert!(bad.socket_addr().is_err());
    }
}
