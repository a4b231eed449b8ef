// Registry of remote players keyed by server-assigned client id.

use crate::domain::errors::SyncError;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerState {
    pub id: String,
    pub name: String,
    pub x: i32,
    pub y: i32,
}

// A sequence-numbered position report from one client.
#[derive(Debug, Clone)]
pub struct Command {
    pub client_id: String,
    pub sequence: u64,
    pub x: i32,
    pub y: i32,
    pub command: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied,
    // Sequence was not newer than the last applied one; nothing changed.
    Stale { last_applied: u64 },
}

#[derive(Debug)]
pub struct PlayerRegistry {
    players: HashMap<String, PlayerState>,
    last_seq: HashMap<String, u64>,
    names: HashMap<String, String>,
    next_id: u64,
}

impl Default for PlayerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self {
            players: HashMap::new(),
            last_seq: HashMap::new(),
            names: HashMap::new(),
            next_id: 1,
        }
    }

    /// Allocates the next client id and seeds the player at the origin.
    pub fn register(&mut self, name: &str) -> String {
        let id = format_client_id(self.next_id);
        self.next_id += 1;

        self.names.insert(id.clone(), name.to_string());
        self.players.insert(
            id.clone(),
            PlayerState {
                id: id.clone(),
                name: name.to_string(),
                x: 0,
                y: 0,
            },
        );
        self.last_seq.insert(id.clone(), 0);
        id
    }

    /// Applies a command if its sequence is newer than the last applied one.
    ///
    /// Position and last sequence change together or not at all.
    pub fn apply(&mut self, cmd: &Command) -> Result<CommandOutcome, SyncError> {
        let Some(player) = self.players.get_mut(&cmd.client_id) else {
            return Err(SyncError::UnknownClient);
        };

        let last = self.last_seq.get(&cmd.client_id).copied().unwrap_or(0);
        if cmd.sequence <= last {
            return Ok(CommandOutcome::Stale { last_applied: last });
        }

        player.x = cmd.x;
        player.y = cmd.y;
        self.last_seq.insert(cmd.client_id.clone(), cmd.sequence);
        Ok(CommandOutcome::Applied)
    }

    pub fn get(&self, client_id: &str) -> Option<&PlayerState> {
        self.players.get(client_id)
    }

    pub fn name(&self, client_id: &str) -> Option<&str> {
        self.names.get(client_id).map(String::as_str)
    }

    pub fn last_sequence(&self, client_id: &str) -> Option<u64> {
        self.last_seq.get(client_id).copied()
    }

    // Order follows map iteration and is not stable.
    pub fn snapshot(&self) -> Vec<PlayerState> {
        self.players.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

fn format_client_id(n: u64) -> String {
    format!("C{n:06}")
}
