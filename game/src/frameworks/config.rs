use std::{env, time::Duration};

// Runtime constants (not gameplay tuning).

pub const TICK_INTERVAL: Duration = Duration::from_millis(50);
pub const COMMAND_CHANNEL_CAPACITY: usize = 32;
pub const SNAPSHOT_CHANNEL_CAPACITY: usize = 4;

pub fn map_path() -> String {
    env::var("GAME_MAP_PATH").unwrap_or_else(|_| "mapa.txt".to_string())
}

/// Where the network client accepts `MOVE` lines.
pub fn command_addr() -> String {
    env::var("GAME_CMD_ADDR").unwrap_or_else(|_| "127.0.0.1:4000".to_string())
}

/// Where the network client broadcasts state blocks.
pub fn state_addr() -> String {
    env::var("GAME_STATE_ADDR").unwrap_or_else(|_| "127.0.0.1:4001".to_string())
}

// The terminal belongs to the frontend, so logs go to a file.
pub fn log_path() -> String {
    env::var("GAME_LOG_PATH").unwrap_or_else(|_| "game.log".to_string())
}
