mod chat;
mod room;
mod round;
mod score;
mod vote;

pub use chat::ChatLog;
pub use round::discussion_order;
pub use score::minimum_to_catch;
pub use vote::VoteTally;

use crate::error::{GameError, GameResult};
use crate::types::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Shared state of one room. All mutation goes through `&mut Room` while the
/// room's mutex is held, so every operation is atomic per room.
#[derive(Debug, Clone)]
pub struct Room {
    pub code: RoomCode,
    /// Join order, which is also the seating order
    pub players: Vec<Player>,
    pub word: Option<String>,
    pub spy_id: Option<PlayerId>,
    pub game_started: bool,
    /// 0 = not started
    pub current_round: u32,
    pub round_state: RoundState,
    /// voter id -> target id
    pub votes: HashMap<PlayerId, PlayerId>,
    pub chat: ChatLog,
    pub discussion_order: Vec<String>,
    /// Bumped on every successful mutation so pollers can detect change
    pub version: u64,
    pub config: GameConfig,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub rooms: Arc<RwLock<HashMap<RoomCode, Arc<Mutex<Room>>>>>,
    pub config: GameConfig,
    rng: Arc<Mutex<StdRng>>,
}

impl AppState {
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// State with a deterministic random source (tests, reproducible sessions)
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        Self {
            rooms: Arc::new(RwLock::new(HashMap::new())),
            config,
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// Get a room, creating it with default state if absent
    pub async fn get_or_create_room(&self, room_code: &str) -> GameResult<Arc<Mutex<Room>>> {
        let code = normalize_room_code(room_code, self.config.max_room_code_chars)?;

        if let Some(room) = self.rooms.read().await.get(&code) {
            return Ok(room.clone());
        }

        let mut rooms = self.rooms.write().await;
        let room = rooms
            .entry(code.clone())
            .or_insert_with(|| {
                tracing::info!("Creating room {}", code);
                Arc::new(Mutex::new(Room::new(code.clone(), self.config.clone())))
            })
            .clone();
        Ok(room)
    }

    /// Get an existing room
    pub async fn get_room(&self, room_code: &str) -> Option<Arc<Mutex<Room>>> {
        let code = normalize_room_code(room_code, self.config.max_room_code_chars).ok()?;
        self.rooms.read().await.get(&code).cloned()
    }

    /// Get an existing room or fail with `NotFound`
    pub(crate) async fn require_room(&self, room_code: &str) -> GameResult<Arc<Mutex<Room>>> {
        let code = normalize_room_code(room_code, self.config.max_room_code_chars)?;
        self.rooms
            .read()
            .await
            .get(&code)
            .cloned()
            .ok_or_else(|| GameError::NotFound(format!("Room {} not found", code)))
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

/// Trim and upper-case a room code
pub fn normalize_room_code(room_code: &str, max_chars: usize) -> GameResult<RoomCode> {
    let code = room_code.trim().to_uppercase();
    if code.is_empty() {
        return Err(GameError::InvalidInput("Room code is required".to_string()));
    }
    if code.chars().count() > max_chars {
        return Err(GameError::InvalidInput(format!(
            "Room code cannot exceed {} characters",
            max_chars
        )));
    }
    Ok(code)
}
