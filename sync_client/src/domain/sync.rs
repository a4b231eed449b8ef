use crate::domain::SyncClientError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// Sequence-numbered position report for one client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionCommand {
    pub client_id: String,
    pub sequence: u64,
    pub x: i32,
    pub y: i32,
    pub command: String,
}

// `applied == false` means the sequence was already seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandAck {
    pub applied: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemotePlayer {
    pub id: String,
    pub name: String,
    pub x: i32,
    pub y: i32,
}

// Authoritative state as returned by the sync service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateSnapshot {
    pub players: Vec<RemotePlayer>,
    pub time_ms: u64,
    pub map_lines: Vec<String>,
}

// Use cases depend on this trait, not on the HTTP client.
#[async_trait]
pub trait SyncApi: Send + Sync {
    async fn register(&self, name: &str) -> Result<String, SyncClientError>;

    async fn send_command(&self, cmd: &PositionCommand) -> Result<CommandAck, SyncClientError>;

    async fn get_state(&self, client_id: &str) -> Result<StateSnapshot, SyncClientError>;
}

// Destination for snapshots fetched by the poller.
#[async_trait]
pub trait SnapshotPublisher: Send + Sync {
    async fn publish(&self, self_id: &str, snapshot: &StateSnapshot);
}
