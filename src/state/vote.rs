use super::{AppState, Room};
use crate::error::{GameError, GameResult};
use crate::protocol::PlayerState;
use crate::types::*;
use std::collections::HashMap;

/// Vote counts for one round
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoteTally {
    pub counts: HashMap<PlayerId, u32>,
    pub max_votes: u32,
    /// Targets tied at `max_votes`, in seating order (empty if nobody voted)
    pub leaders: Vec<PlayerId>,
}

impl VoteTally {
    pub fn votes_for(&self, player_id: &str) -> u32 {
        self.counts.get(player_id).copied().unwrap_or(0)
    }

    pub fn is_tie(&self) -> bool {
        self.leaders.len() > 1
    }
}

impl Room {
    /// Record a vote, replacing any earlier vote by the same voter
    pub fn cast_vote(&mut self, voter_id: &str, target_id: &str) -> GameResult<()> {
        self.require_player(voter_id)?;
        self.require_phase(RoundState::Voting, "vote")?;
        if voter_id == target_id {
            return Err(GameError::InvalidInput(
                "You cannot vote for yourself".to_string(),
            ));
        }
        if target_id.trim().is_empty() {
            return Err(GameError::InvalidInput("Vote target is required".to_string()));
        }
        if self.player(target_id).is_none() {
            return Err(GameError::NotFound(
                "Vote target is not in this room".to_string(),
            ));
        }

        let previous = self
            .votes
            .insert(voter_id.to_string(), target_id.to_string());
        self.touch();

        tracing::debug!(
            "Vote in room {}: {} -> {}{}",
            self.code,
            voter_id,
            target_id,
            if previous.is_some() { " (changed)" } else { "" }
        );
        Ok(())
    }

    /// Aggregate votes into counts per target
    pub fn tally_votes(&self) -> VoteTally {
        let mut counts: HashMap<PlayerId, u32> = HashMap::new();
        for target in self.votes.values() {
            *counts.entry(target.clone()).or_insert(0) += 1;
        }

        let max_votes = counts.values().copied().max().unwrap_or(0);
        let leaders = if max_votes == 0 {
            Vec::new()
        } else {
            self.players
                .iter()
                .filter(|p| counts.get(&p.id) == Some(&max_votes))
                .map(|p| p.id.clone())
                .collect()
        };

        VoteTally {
            counts,
            max_votes,
            leaders,
        }
    }
}

impl AppState {
    /// Cast (or change) a vote during the voting phase
    pub async fn cast_vote(
        &self,
        room_code: &str,
        voter_id: &str,
        target_id: &str,
    ) -> GameResult<PlayerState> {
        let room = self.require_room(room_code).await?;
        let mut room = room.lock().await;

        room.cast_vote(voter_id, target_id)?;
        room.player_state(voter_id)
    }
}
