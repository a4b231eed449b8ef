use crate::domain::PositionCommand;

// Local bookkeeping for the registered player.
#[derive(Debug, Clone)]
pub struct LocalPlayer {
    client_id: String,
    name: String,
    x: i32,
    y: i32,
    sequence: u64,
}

impl LocalPlayer {
    pub fn new(client_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            name: name.into(),
            x: 0,
            y: 0,
            sequence: 0,
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn last_sequence(&self) -> u64 {
        self.sequence
    }

    // Record a new position and build the command carrying the next sequence.
    pub fn next_move(&mut self, x: i32, y: i32) -> PositionCommand {
        self.x = x;
        self.y = y;
        self.sequence += 1;
        PositionCommand {
            client_id: self.client_id.clone(),
            sequence: self.sequence,
            x,
            y,
            command: "MOVE".to_string(),
        }
    }
}
