use crate::domain::RemotePlayer;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
}

#[derive(Deserialize)]
pub struct RegisterResponse {
    pub client_id: String,
}

// Reply to a position command; `error` is empty unless the command was rejected.
#[derive(Deserialize)]
pub struct CommandResponse {
    pub applied: bool,
    #[serde(default)]
    pub error: String,
}

#[derive(Serialize)]
pub struct StateRequest<'a> {
    pub client_id: &'a str,
}

// `time` is epoch milliseconds on the server clock.
#[derive(Deserialize)]
pub struct StateResponse {
    pub players: Vec<RemotePlayer>,
    pub time: u64,
    #[serde(default)]
    pub map_lines: Vec<String>,
}
