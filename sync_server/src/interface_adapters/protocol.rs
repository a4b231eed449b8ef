use crate::domain::PlayerState;
use serde::{Deserialize, Serialize};

// Request payload for registering a player.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
}

// Response payload carrying the assigned client id.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub client_id: String,
}

// Request payload for a sequence-numbered position command.
#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    pub client_id: String,
    pub sequence: u64,
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub command: String,
}

// Stale sequences come back as applied=false with an empty error.
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    pub applied: bool,
    pub error: String,
}

// Request payload for a state snapshot.
#[derive(Debug, Deserialize)]
pub struct StateRequest {
    #[serde(default)]
    pub client_id: String,
}

#[derive(Debug, Serialize)]
pub struct PlayerStateDto {
    pub id: String,
    pub name: String,
    pub x: i32,
    pub y: i32,
}

impl From<PlayerState> for PlayerStateDto {
    fn from(player: PlayerState) -> Self {
        Self {
            id: player.id,
            name: player.name,
            x: player.x,
            y: player.y,
        }
    }
}

// Snapshot of all players; `time` is epoch milliseconds.
#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub players: Vec<PlayerStateDto>,
    pub time: u64,
    pub map_lines: Vec<String>,
}
