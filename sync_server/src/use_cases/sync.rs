use crate::domain::ports::Clock;
use crate::domain::{Command, CommandOutcome, PlayerRegistry, PlayerState, SyncError};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

// Point-in-time copy of the authoritative state returned to pollers.
#[derive(Debug, Clone)]
pub struct GameSnapshot {
    pub players: Vec<PlayerState>,
    pub time_ms: u64,
    pub map_lines: Arc<Vec<String>>,
}

// Sync service with injected clock. A single lock serializes all three operations.
pub struct SyncService<C> {
    registry: Mutex<PlayerRegistry>,
    map_lines: Arc<Vec<String>>,
    clock: C,
}

impl<C> SyncService<C>
where
    C: Clock,
{
    pub fn new(clock: C, map_lines: Vec<String>) -> Self {
        Self {
            registry: Mutex::new(PlayerRegistry::new()),
            map_lines: Arc::new(map_lines),
            clock,
        }
    }

    pub async fn register(&self, name: &str) -> String {
        let mut registry = self.registry.lock().await;
        let client_id = registry.register(name);
        info!(%client_id, name, "player registered");
        client_id
    }

    pub async fn send_command(&self, cmd: Command) -> Result<CommandOutcome, SyncError> {
        let mut registry = self.registry.lock().await;
        debug!(
            client_id = %cmd.client_id,
            seq = cmd.sequence,
            x = cmd.x,
            y = cmd.y,
            command = %cmd.command,
            "command received"
        );

        let outcome = registry.apply(&cmd)?;
        match outcome {
            CommandOutcome::Applied => {
                debug!(client_id = %cmd.client_id, seq = cmd.sequence, "command applied");
            }
            CommandOutcome::Stale { last_applied } => {
                debug!(
                    client_id = %cmd.client_id,
                    seq = cmd.sequence,
                    last_applied,
                    "duplicate or old command ignored"
                );
            }
        }
        Ok(outcome)
    }

    pub async fn get_state(&self, client_id: &str) -> GameSnapshot {
        let registry = self.registry.lock().await;
        let players = registry.snapshot();
        debug!(client_id, players = players.len(), "state requested");
        GameSnapshot {
            players,
            time_ms: self.clock.now_epoch_millis(),
            map_lines: self.map_lines.clone(),
        }
    }
}
