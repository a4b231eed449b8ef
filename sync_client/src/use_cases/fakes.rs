// In-memory port implementations shared by the use-case tests.

use crate::domain::{
    CommandAck, PositionCommand, SnapshotPublisher, StateSnapshot, SyncApi, SyncClientError,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeSyncApi {
    // Scripted replies for send_command; an empty script acknowledges.
    pub command_script: Mutex<VecDeque<Result<CommandAck, SyncClientError>>>,
    pub state_script: Mutex<VecDeque<Result<StateSnapshot, SyncClientError>>>,
    pub sent: Mutex<Vec<PositionCommand>>,
    pub state_calls: Mutex<u32>,
}

impl FakeSyncApi {
    pub fn with_command_script(
        script: impl IntoIterator<Item = Result<CommandAck, SyncClientError>>,
    ) -> Self {
        Self {
            command_script: Mutex::new(script.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<PositionCommand> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl SyncApi for FakeSyncApi {
    async fn register(&self, _name: &str) -> Result<String, SyncClientError> {
        Ok("C000001".to_string())
    }

    async fn send_command(&self, cmd: &PositionCommand) -> Result<CommandAck, SyncClientError> {
        self.sent.lock().unwrap().push(cmd.clone());
        self.command_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(CommandAck { applied: true }))
    }

    async fn get_state(&self, _client_id: &str) -> Result<StateSnapshot, SyncClientError> {
        *self.state_calls.lock().unwrap() += 1;
        self.state_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(StateSnapshot::default()))
    }
}

#[derive(Default)]
pub struct RecordingPublisher {
    pub published: Mutex<Vec<(String, StateSnapshot)>>,
}

#[async_trait]
impl SnapshotPublisher for RecordingPublisher {
    async fn publish(&self, self_id: &str, snapshot: &StateSnapshot) {
        self.published
            .lock()
            .unwrap()
            .push((self_id.to_string(), snapshot.clone()));
    }
}
