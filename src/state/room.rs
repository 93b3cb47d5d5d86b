use super::chat::validate_name;
use super::{AppState, ChatLog, Room};
use crate::error::{GameError, GameResult};
use crate::protocol::{
    JoinResponse, PlayerState, PlayerView, PrivateView, RoomSnapshot, VersionResponse,
};
use crate::types::*;
use std::collections::HashMap;

impl Room {
    pub fn new(code: RoomCode, config: GameConfig) -> Self {
        Self {
            code,
            players: Vec::new(),
            word: None,
            spy_id: None,
            game_started: false,
            current_round: 0,
            round_state: RoundState::Waiting,
            votes: HashMap::new(),
            chat: ChatLog::new(config.chat_capacity),
            discussion_order: Vec::new(),
            version: 1,
            config,
        }
    }

    /// Mark the room as changed
    pub(crate) fn touch(&mut self) {
        self.version += 1;
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub(crate) fn require_player(&self, player_id: &str) -> GameResult<&Player> {
        if player_id.trim().is_empty() {
            return Err(GameError::InvalidInput("Player id is required".to_string()));
        }
        self.player(player_id).ok_or_else(|| {
            GameError::NotFound(format!("Player not found in room {}, rejoin required", self.code))
        })
    }

    /// Check that the requester exists and is the host
    pub(crate) fn require_host(&self, player_id: &str, action: &str) -> GameResult<()> {
        let player = self.require_player(player_id)?;
        if !player.is_host {
            return Err(GameError::Forbidden(format!("Only the host can {}", action)));
        }
        Ok(())
    }

    pub fn host(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_host)
    }

    /// Make the first seated player the only host
    pub(crate) fn reassign_host(&mut self) {
        for (index, player) in self.players.iter_mut().enumerate() {
            player.is_host = index == 0;
        }
    }

    /// Seat a new player; the first player of an empty room becomes host
    pub fn add_player(&mut self, name: &str) -> GameResult<PlayerId> {
        let name = validate_name(name, self.config.max_name_chars)?;
        if self
            .players
            .iter()
            .any(|p| p.name.eq_ignore_ascii_case(&name))
        {
            return Err(GameError::InvalidInput(format!(
                "The name \"{}\" is already taken in this room",
                name
            )));
        }

        let mut player = Player::new(name);
        player.is_host = self.players.is_empty();
        let id = player.id.clone();
        self.players.push(player);
        self.touch();
        Ok(id)
    }

    /// Clear round data (secret, spy, votes, order) without touching scores
    pub(crate) fn clear_round(&mut self) {
        self.word = None;
        self.spy_id = None;
        self.votes.clear();
        self.discussion_order.clear();
        for player in &mut self.players {
            player.role = None;
            player.word = None;
        }
    }

    /// Return the room to the lobby: scores, roles and chat are wiped and the
    /// first seated player becomes host. Players stay seated.
    pub fn full_reset(&mut self) {
        self.clear_round();
        for player in &mut self.players {
            player.score = 0;
            player.round_score = 0;
        }
        self.chat.clear();
        self.game_started = false;
        self.current_round = 0;
        self.round_state = RoundState::Waiting;
        self.reassign_host();
        self.touch();
        tracing::info!("Room {} reset to lobby", self.code);
    }

    /// Sanitised snapshot shared with every client
    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            code: self.code.clone(),
            players: self
                .players
                .iter()
                .map(|p| PlayerView {
                    id: p.id.clone(),
                    name: p.name.clone(),
                    score: p.score,
                    round_score: p.round_score,
                    is_host: p.is_host,
                    has_voted: self.votes.contains_key(&p.id),
                })
                .collect(),
            game_started: self.game_started,
            current_round: self.current_round,
            max_rounds: self.config.max_rounds,
            round_state: self.round_state,
            chat: self.chat.iter().cloned().collect(),
            discussion_order: self.discussion_order.clone(),
            votes_cast: self.votes.len(),
            version: self.version,
        }
    }

    pub fn private_view(&self, player_id: &str) -> GameResult<PrivateView> {
        let player = self.require_player(player_id)?;
        Ok(PrivateView {
            id: player.id.clone(),
            name: player.name.clone(),
            is_host: player.is_host,
            role: player.role,
            word: player.word.clone(),
        })
    }

    pub(crate) fn player_state(&self, player_id: &str) -> GameResult<PlayerState> {
        Ok(PlayerState {
            you: self.private_view(player_id)?,
            room: self.snapshot(),
        })
    }
}

impl AppState {
    /// Join a room, creating it on first use. Always issues a new identity.
    pub async fn join(&self, name: &str, room_code: &str) -> GameResult<JoinResponse> {
        // Validate before the room is created so a bad name leaves no empty room behind
        validate_name(name, self.config.max_name_chars)?;

        let room = self.get_or_create_room(room_code).await?;
        let mut room = room.lock().await;

        let player_id = room.add_player(name)?;
        let state = room.player_state(&player_id)?;

        tracing::info!(
            "Player {} ({}) joined room {} as {}",
            state.you.name,
            player_id,
            room.code,
            if state.you.is_host { "host" } else { "player" }
        );

        Ok(JoinResponse {
            player_id,
            room: state.room,
            you: state.you,
        })
    }

    /// Poll the room; fails with `NotFound` when the player must rejoin
    pub async fn poll_state(&self, room_code: &str, player_id: &str) -> GameResult<PlayerState> {
        let room = self.require_room(room_code).await?;
        let room = room.lock().await;
        room.player_state(player_id)
    }

    /// Current change marker of a room
    pub async fn room_version(&self, room_code: &str) -> GameResult<VersionResponse> {
        let room = self.require_room(room_code).await?;
        let room = room.lock().await;
        Ok(VersionResponse {
            version: room.version,
        })
    }
}
