//! Session store - per-user game state owned by the server
//!
//! Maps an opaque user id to that user's [`GameState`]. Sessions are created on
//! `start`/`restart`, mutated on `move`, refreshed on every access, and evicted
//! when idle longer than the configured TTL or when the store is full (least
//! recently used first).
//!
//! The store itself is synchronous; the server wraps it in a single async mutex
//! so at most one request mutates any session at a time.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, info, warn};

use crate::core::{EngineError, GameState, MoveResult};
use crate::types::{Direction, DEFAULT_BOARD_SIZE, MAX_PLAYER_BOARD_SIZE, MIN_BOARD_SIZE};

/// Session store errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("userId is required")]
    UserIdRequired,

    #[error("Invalid userId: no game started for {0:?}")]
    UnknownUser(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Store limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Sessions idle longer than this are dropped by [`SessionStore::sweep_expired`].
    pub idle_ttl: Option<Duration>,
    /// Upper bound on live sessions; inserting past it evicts the least recently used.
    pub max_sessions: usize,
    /// Largest board a user may request.
    pub max_board_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_ttl: Some(Duration::from_secs(3600)),
            max_sessions: 10_000,
            max_board_size: MAX_PLAYER_BOARD_SIZE,
        }
    }
}

#[derive(Debug, Clone)]
struct SessionEntry {
    game: GameState,
    last_active: Instant,
}

/// In-memory user id -> game map
#[derive(Debug)]
pub struct SessionStore {
    config: SessionConfig,
    sessions: HashMap<String, SessionEntry>,
}

impl SessionStore {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            sessions: HashMap::new(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Resolve a requested size: missing or 0 means the default.
    pub fn resolve_size(&self, requested: Option<usize>) -> Result<usize, SessionError> {
        let size = match requested {
            None | Some(0) => DEFAULT_BOARD_SIZE,
            Some(size) => size,
        };
        if size < MIN_BOARD_SIZE || size > self.config.max_board_size {
            return Err(EngineError::InvalidSize {
                size,
                min: MIN_BOARD_SIZE,
                max: self.config.max_board_size,
            }
            .into());
        }
        Ok(size)
    }

    /// Create (or replace) the session for `user_id` with a fresh game.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        user_id: &str,
        size: Option<usize>,
        now: Instant,
        rng: &mut R,
    ) -> Result<&GameState, SessionError> {
        if user_id.is_empty() {
            return Err(SessionError::UserIdRequired);
        }
        let size = self.resolve_size(size)?;
        let game = GameState::new(size, rng)?;

        if !self.sessions.contains_key(user_id) && self.sessions.len() >= self.config.max_sessions
        {
            self.evict_least_recent();
        }

        info!(user_id, size, "session started");
        let entry = SessionEntry {
            game,
            last_active: now,
        };
        let slot = match self.sessions.entry(user_id.to_string()) {
            Entry::Occupied(mut occupied) => {
                occupied.insert(entry);
                occupied.into_mut()
            }
            Entry::Vacant(vacant) => vacant.insert(entry),
        };
        Ok(&slot.game)
    }

    /// Same as [`SessionStore::start`]; kept separate to mirror the client verbs.
    pub fn restart<R: Rng + ?Sized>(
        &mut self,
        user_id: &str,
        size: Option<usize>,
        now: Instant,
        rng: &mut R,
    ) -> Result<&GameState, SessionError> {
        self.start(user_id, size, now, rng)
    }

    /// Apply a move to an existing session.
    pub fn apply_move<R: Rng + ?Sized>(
        &mut self,
        user_id: &str,
        direction: Direction,
        now: Instant,
        rng: &mut R,
    ) -> Result<(&GameState, MoveResult), SessionError> {
        if user_id.is_empty() {
            return Err(SessionError::UserIdRequired);
        }
        let entry = self
            .sessions
            .get_mut(user_id)
            .ok_or_else(|| SessionError::UnknownUser(user_id.to_string()))?;

        entry.last_active = now;
        let result = entry.game.apply_move(direction, rng);
        debug!(
            user_id,
            direction = direction.as_str(),
            moved = result.moved,
            score_delta = result.score_delta,
            score = entry.game.score(),
            "move applied"
        );
        Ok((&entry.game, result))
    }

    pub fn get(&self, user_id: &str) -> Option<&GameState> {
        self.sessions.get(user_id).map(|e| &e.game)
    }

    /// Drop sessions idle longer than the TTL; returns how many were removed.
    pub fn sweep_expired(&mut self, now: Instant) -> usize {
        let Some(ttl) = self.config.idle_ttl else {
            return 0;
        };
        let before = self.sessions.len();
        self.sessions
            .retain(|_, e| now.saturating_duration_since(e.last_active) <= ttl);
        before - self.sessions.len()
    }

    fn evict_least_recent(&mut self) {
        let oldest = self
            .sessions
            .iter()
            .min_by_key(|(_, e)| e.last_active)
            .map(|(k, _)| k.clone());
        if let Some(user_id) = oldest {
            warn!(user_id = %user_id, "session store full, evicting least recently used");
            self.sessions.remove(&user_id);
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
