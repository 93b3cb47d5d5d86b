use super::{AppState, Room};
use crate::error::{GameError, GameResult};
use crate::protocol::PlayerState;
use crate::types::*;
use crate::words::pick_word;
use rand::seq::SliceRandom;
use rand::Rng;

/// Build the round-robin "asker -> target" pairs from a shuffled seating
pub fn discussion_order<R: Rng + ?Sized>(names: &[String], rng: &mut R) -> Vec<String> {
    let mut shuffled = names.to_vec();
    shuffled.shuffle(rng);

    let n = shuffled.len();
    if n < 2 {
        return Vec::new();
    }
    (0..n)
        .map(|i| format!("{} -> {}", shuffled[i], shuffled[(i + 1) % n]))
        .collect()
}

impl Room {
    /// Check if a round state transition is valid
    fn is_valid_transition(from: RoundState, to: RoundState) -> bool {
        use RoundState::*;

        matches!(
            (from, to),
            (Waiting, Playing)
                | (Playing, Voting)
                | (Voting, Ended)
                // Next round
                | (Ended, Playing)
                // Game over
                | (Ended, Waiting)
        )
    }

    pub(crate) fn require_phase(&self, expected: RoundState, action: &str) -> GameResult<()> {
        if self.round_state != expected {
            return Err(GameError::InvalidPhase(format!(
                "Cannot {} while the round is {:?}",
                action, self.round_state
            )));
        }
        Ok(())
    }

    /// Move the state machine, rejecting skipped phases
    pub(crate) fn transition(&mut self, to: RoundState) -> GameResult<()> {
        if !Self::is_valid_transition(self.round_state, to) {
            return Err(GameError::InvalidPhase(format!(
                "Invalid round state transition from {:?} to {:?}",
                self.round_state, to
            )));
        }
        self.round_state = to;
        Ok(())
    }

    /// Host starts the game from the lobby
    pub fn start_game<R: Rng + ?Sized>(&mut self, requester: &str, rng: &mut R) -> GameResult<()> {
        self.require_host(requester, "start the game")?;
        if self.game_started {
            return Err(GameError::InvalidPhase("Game already started".to_string()));
        }
        self.require_phase(RoundState::Waiting, "start the game")?;
        if self.players.len() < 2 {
            return Err(GameError::InvalidPhase(
                "At least 2 players are required to start".to_string(),
            ));
        }

        self.game_started = true;
        self.current_round = 1;
        self.begin_round(rng)?;
        tracing::info!(
            "Game started in room {} with {} players",
            self.code,
            self.players.len()
        );
        Ok(())
    }

    /// Assign the secret word and the spy and publish a discussion order.
    /// Performs a full reset instead when fewer than 2 players are seated.
    /// Returns whether a round was started.
    pub(crate) fn begin_round<R: Rng + ?Sized>(&mut self, rng: &mut R) -> GameResult<bool> {
        if !Self::is_valid_transition(self.round_state, RoundState::Playing) {
            return Err(GameError::InvalidPhase(format!(
                "Cannot begin a round while the round is {:?}",
                self.round_state
            )));
        }
        if self.players.len() < 2 {
            tracing::warn!(
                "Room {} has fewer than 2 players, resetting instead of starting a round",
                self.code
            );
            self.full_reset();
            return Ok(false);
        }

        let word = pick_word(rng).to_string();
        let spy_index = rng.random_range(0..self.players.len());
        let spy_id = self.players[spy_index].id.clone();
        self.assign_secret(&spy_id, &word);

        let names: Vec<String> = self.players.iter().map(|p| p.name.clone()).collect();
        self.discussion_order = discussion_order(&names, rng);

        self.votes.clear();
        self.transition(RoundState::Playing)?;
        let announcement = format!(
            "Round {} of {} has started.",
            self.current_round, self.config.max_rounds
        );
        self.narrate(&announcement);
        self.touch();

        tracing::info!("Round {} started in room {}", self.current_round, self.code);
        Ok(true)
    }

    /// Hand out roles: the spy gets no word, everyone else is a civilian
    pub(crate) fn assign_secret(&mut self, spy_id: &str, word: &str) {
        for player in &mut self.players {
            if player.id == spy_id {
                player.role = Some(Role::Spy);
                player.word = None;
            } else {
                player.role = Some(Role::Civilian);
                player.word = Some(word.to_string());
            }
        }
        self.word = Some(word.to_string());
        self.spy_id = Some(spy_id.to_string());
    }

    /// Host opens the voting phase
    pub fn start_vote(&mut self, requester: &str) -> GameResult<()> {
        self.require_host(requester, "start the vote")?;
        self.require_phase(RoundState::Playing, "start the vote")?;

        self.votes.clear();
        self.transition(RoundState::Voting)?;
        self.narrate("Voting has started. Who is the spy?");
        self.touch();

        tracing::info!(
            "Voting opened for round {} in room {}",
            self.current_round,
            self.code
        );
        Ok(())
    }
}

impl AppState {
    /// Host starts the game (requires at least 2 players)
    pub async fn start_game(&self, room_code: &str, player_id: &str) -> GameResult<PlayerState> {
        let room = self.require_room(room_code).await?;
        let mut room = room.lock().await;

        {
            let mut rng = self.rng.lock().await;
            room.start_game(player_id, &mut *rng)?;
        }

        room.player_state(player_id)
    }

    /// Host moves the round from discussion to voting
    pub async fn start_vote(&self, room_code: &str, player_id: &str) -> GameResult<PlayerState> {
        let room = self.require_room(room_code).await?;
        let mut room = room.lock().await;

        room.start_vote(player_id)?;
        room.player_state(player_id)
    }
}
