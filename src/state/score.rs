use super::{AppState, Room};
use crate::error::{GameError, GameResult};
use crate::protocol::{EndRoundResponse, RoundOutcome, ScoreDelta, Standing};
use crate::types::*;
use rand::Rng;

/// Votes needed to catch the spy: half the table, rounded up
pub fn minimum_to_catch(total_players: usize) -> u32 {
    total_players.div_ceil(2) as u32
}

impl Room {
    /// Host resolves the voting phase: tally, score, narrate, then either
    /// start the next round or finish the game with a full reset.
    pub fn end_round<R: Rng + ?Sized>(
        &mut self,
        requester: &str,
        rng: &mut R,
    ) -> GameResult<RoundOutcome> {
        self.require_host(requester, "end the round")?;
        self.require_phase(RoundState::Voting, "end the round")?;
        let spy_id = self
            .spy_id
            .clone()
            .ok_or_else(|| GameError::InvalidPhase("No spy assigned this round".to_string()))?;
        let spy_name = self
            .player(&spy_id)
            .map(|p| p.name.clone())
            .ok_or_else(|| GameError::NotFound("Spy is no longer in the room".to_string()))?;
        let word = self.word.clone().unwrap_or_default();

        self.transition(RoundState::Ended)?;

        let tally = self.tally_votes();
        let votes_against_spy = tally.votes_for(&spy_id);
        let needed = minimum_to_catch(self.players.len());
        let spy_caught = votes_against_spy >= needed;

        let mut deltas = Vec::with_capacity(self.players.len());
        for player in &mut self.players {
            let delta = match player.role {
                Some(Role::Spy) => u32::from(!spy_caught),
                Some(Role::Civilian) => {
                    u32::from(self.votes.get(&player.id) == Some(&spy_id))
                }
                None => 0,
            };
            player.round_score = delta;
            player.score += delta;
            deltas.push(ScoreDelta {
                player_id: player.id.clone(),
                name: player.name.clone(),
                round_score: delta,
            });
        }

        let most_voted: Vec<String> = tally
            .leaders
            .iter()
            .filter_map(|id| self.player(id).map(|p| p.name.clone()))
            .collect();

        let summary = if most_voted.is_empty() {
            "No votes were cast.".to_string()
        } else if tally.is_tie() {
            format!(
                "Tie between {} with {} vote(s) each.",
                most_voted.join(", "),
                tally.max_votes
            )
        } else {
            format!(
                "Most voted: {} with {} vote(s).",
                most_voted.join(", "),
                tally.max_votes
            )
        };
        self.narrate(&summary);

        let verdict = if spy_caught {
            format!(
                "The spy {} was caught with {} of {} required votes!",
                spy_name, votes_against_spy, needed
            )
        } else {
            format!(
                "The spy {} escaped with {} of {} required votes.",
                spy_name, votes_against_spy, needed
            )
        };
        self.narrate(&verdict);
        self.narrate(&format!("The secret word was \"{}\".", word));

        tracing::info!(
            "Round {} resolved in room {}: spy {} {} ({}/{} votes)",
            self.current_round,
            self.code,
            spy_name,
            if spy_caught { "caught" } else { "escaped" },
            votes_against_spy,
            needed
        );

        let round = self.current_round;
        let game_over = self.current_round >= self.config.max_rounds;
        let mut final_standings = Vec::new();

        if game_over {
            final_standings = self.standings();
            self.narrate("Game over! Final standings:");
            for standing in &final_standings {
                let line = format!("{}. {}: {}", standing.rank, standing.name, standing.score);
                self.narrate(&line);
            }
            tracing::info!("Game over in room {}", self.code);
            self.full_reset();
        } else {
            self.current_round += 1;
            self.begin_round(rng)?;
        }
        self.touch();

        Ok(RoundOutcome {
            round,
            spy_id,
            spy_name,
            word,
            votes_against_spy,
            minimum_to_catch: needed,
            spy_caught,
            most_voted,
            max_votes: tally.max_votes,
            deltas,
            game_over,
            final_standings,
        })
    }

    /// Players by cumulative score, highest first; ties keep seating order
    pub fn standings(&self) -> Vec<Standing> {
        let mut players: Vec<&Player> = self.players.iter().collect();
        players.sort_by(|a, b| b.score.cmp(&a.score));

        players
            .into_iter()
            .enumerate()
            .map(|(i, p)| Standing {
                rank: i + 1,
                player_id: p.id.clone(),
                name: p.name.clone(),
                score: p.score,
            })
            .collect()
    }
}

impl AppState {
    /// Host ends the voting phase and resolves the round
    pub async fn end_round(&self, room_code: &str, player_id: &str) -> GameResult<EndRoundResponse> {
        let room = self.require_room(room_code).await?;
        let mut room = room.lock().await;

        let outcome = {
            let mut rng = self.rng.lock().await;
            room.end_round(player_id, &mut *rng)?
        };

        let state = room.player_state(player_id)?;
        Ok(EndRoundResponse {
            outcome,
            room: state.room,
            you: state.you,
        })
    }
}
