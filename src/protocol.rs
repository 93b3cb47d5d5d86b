//! Request and response bodies exchanged with clients.
//!
//! Everything that leaves the server goes through the sanitised views here;
//! roles, words and vote targets of other players never appear in them.

use crate::types::*;
use serde::{Deserialize, Serialize};

// ========== Requests ==========

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub room_code: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerQuery {
    #[serde(default)]
    pub player_id: String,
}

/// Body of host-only actions (start, start-vote, end-round)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostActionRequest {
    #[serde(default)]
    pub player_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    #[serde(default)]
    pub voter_id: String,
    #[serde(default)]
    pub target_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub message: String,
}

// ========== Views ==========

/// Public view of a player, identical for every client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub score: u32,
    pub round_score: u32,
    pub is_host: bool,
    pub has_voted: bool,
}

/// The requesting player's private view of themself
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PrivateView {
    pub id: PlayerId,
    pub name: String,
    pub is_host: bool,
    pub role: Option<Role>,
    pub word: Option<String>,
}

/// Sanitised room snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    pub code: RoomCode,
    pub players: Vec<PlayerView>,
    pub game_started: bool,
    pub current_round: u32,
    pub max_rounds: u32,
    pub round_state: RoundState,
    pub chat: Vec<ChatEntry>,
    pub discussion_order: Vec<String>,
    pub votes_cast: usize,
    pub version: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreDelta {
    pub player_id: PlayerId,
    pub name: String,
    pub round_score: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub rank: usize,
    pub player_id: PlayerId,
    pub name: String,
    pub score: u32,
}

/// Report of a resolved round, returned to the host that ended it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoundOutcome {
    pub round: u32,
    pub spy_id: PlayerId,
    pub spy_name: String,
    pub word: String,
    pub votes_against_spy: u32,
    pub minimum_to_catch: u32,
    pub spy_caught: bool,
    /// Names tied at the highest vote count (empty when nobody voted)
    pub most_voted: Vec<String>,
    pub max_votes: u32,
    pub deltas: Vec<ScoreDelta>,
    pub game_over: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub final_standings: Vec<Standing>,
}

// ========== Responses ==========

/// Snapshot plus the caller's private view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub room: RoomSnapshot,
    pub you: PrivateView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinResponse {
    pub player_id: PlayerId,
    pub room: RoomSnapshot,
    pub you: PrivateView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndRoundResponse {
    pub outcome: RoundOutcome,
    pub room: RoomSnapshot,
    pub you: PrivateView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub room: RoomSnapshot,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VersionResponse {
    pub version: u64,
}
