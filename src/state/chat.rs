use super::{AppState, Room};
use crate::error::{GameError, GameResult};
use crate::protocol::ChatResponse;
use crate::types::*;
use std::collections::VecDeque;

/// Bounded chat log; the oldest entry is evicted once capacity is reached
#[derive(Debug, Clone)]
pub struct ChatLog {
    entries: VecDeque<ChatEntry>,
    capacity: usize,
}

impl ChatLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, author: &str, message: &str, kind: ChatKind) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(ChatEntry {
            author: author.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            kind,
        });
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatEntry> {
        self.entries.iter()
    }
}

impl Room {
    /// Append engine narration
    pub(crate) fn narrate(&mut self, message: &str) {
        self.chat.push(SYSTEM_AUTHOR, message, ChatKind::System);
    }

    /// Append a chat message from a player
    pub fn post_chat(&mut self, name: &str, message: &str) -> GameResult<()> {
        let name = validate_name(name, self.config.max_name_chars)?;
        let message = message.trim();
        if message.is_empty() {
            return Err(GameError::InvalidInput("Message cannot be empty".to_string()));
        }
        if message.chars().count() > self.config.max_message_chars {
            return Err(GameError::InvalidInput(format!(
                "Message cannot exceed {} characters",
                self.config.max_message_chars
            )));
        }

        self.chat.push(&name, message, ChatKind::Player);
        self.touch();
        Ok(())
    }
}

/// Trim a display name and check it against the length limit and reserved names
pub(crate) fn validate_name(name: &str, max_chars: usize) -> GameResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(GameError::InvalidInput("Name is required".to_string()));
    }
    if name.chars().count() > max_chars {
        return Err(GameError::InvalidInput(format!(
            "Name cannot exceed {} characters",
            max_chars
        )));
    }
    if name.eq_ignore_ascii_case(SYSTEM_AUTHOR) {
        return Err(GameError::InvalidInput(format!(
            "The name \"{}\" is reserved",
            name
        )));
    }
    Ok(name.to_string())
}

impl AppState {
    /// Send a chat message to an existing room
    pub async fn send_chat(
        &self,
        room_code: &str,
        name: &str,
        message: &str,
    ) -> GameResult<ChatResponse> {
        let room = self.require_room(room_code).await?;
        let mut room = room.lock().await;

        room.post_chat(name, message)?;
        tracing::debug!("Chat in room {} from {}", room.code, name.trim());

        Ok(ChatResponse {
            room: room.snapshot(),
        })
    }
}
