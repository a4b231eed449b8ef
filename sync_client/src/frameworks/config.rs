use std::{env, time::Duration};

// Runtime constants.
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);
pub const SUBSCRIBER_WRITE_TIMEOUT: Duration = Duration::from_millis(100);
pub const POSITION_CHANNEL_CAPACITY: usize = 64;

pub fn sync_server_url() -> String {
    env::var("SYNC_SERVER_URL").unwrap_or_else(|_| "http://127.0.0.1:12345".to_string())
}

pub fn player_name() -> String {
    env::var("PLAYER_NAME")
        .ok()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| "Player".to_string())
}

pub fn command_addr() -> String {
    env::var("GAME_CMD_ADDR").unwrap_or_else(|_| "127.0.0.1:4000".to_string())
}

pub fn state_addr() -> String {
    env::var("GAME_STATE_ADDR").unwrap_or_else(|_| "127.0.0.1:4001".to_string())
}

pub fn request_timeout() -> Duration {
    let millis = env::var("SYNC_REQUEST_TIMEOUT_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(1500);
    Duration::from_millis(millis)
}
