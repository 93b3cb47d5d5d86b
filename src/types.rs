use serde::{Deserialize, Serialize};

/// Opaque ID types for type safety
pub type PlayerId = String;
pub type RoomCode = String;

/// Author used for engine narration in the chat log
pub const SYSTEM_AUTHOR: &str = "System";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoundState {
    Waiting,
    Playing,
    Voting,
    Ended,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Spy,
    Civilian,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Cumulative across the rounds of the current game
    pub score: u32,
    /// Delta earned in the last resolved round
    pub round_score: u32,
    pub is_host: bool,
    pub role: Option<Role>,
    /// Secret word, only ever set for civilians
    pub word: Option<String>,
}

impl Player {
    pub fn new(name: String) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            name,
            score: 0,
            round_score: 0,
            is_host: false,
            role: None,
            word: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    Player,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatEntry {
    pub author: String,
    pub message: String,
    /// RFC 3339 timestamp
    pub timestamp: String,
    pub kind: ChatKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    pub max_rounds: u32,
    pub chat_capacity: usize,
    pub max_name_chars: usize,
    pub max_message_chars: usize,
    pub max_room_code_chars: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_rounds: 3,
            chat_capacity: 50,
            max_name_chars: 24,
            max_message_chars: 300,
            max_room_code_chars: 16,
        }
    }
}
