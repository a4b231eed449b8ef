use crate::domain::{CommandAck, PositionCommand, SyncApi, SyncClientError};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

// Bounded linear backoff: the wait after attempt `n` is `n * backoff_step`.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 6,
            backoff_step: Duration::from_millis(100),
        }
    }
}

// Sends position commands, retrying transport failures.
pub struct CommandSender<A: ?Sized> {
    api: Arc<A>,
    policy: RetryPolicy,
}

impl<A> CommandSender<A>
where
    A: SyncApi + ?Sized,
{
    pub fn new(api: Arc<A>, policy: RetryPolicy) -> Self {
        Self { api, policy }
    }

    pub async fn send_with_retry(
        &self,
        cmd: &PositionCommand,
    ) -> Result<CommandAck, SyncClientError> {
        let mut attempt = 1;
        loop {
            match self.api.send_command(cmd).await {
                Ok(ack) => return Ok(ack),
                Err(err) if err.is_retryable() && attempt < self.policy.max_attempts => {
                    let backoff = self.policy.backoff_step * attempt;
                    warn!(
                        seq = cmd.sequence,
                        attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %err,
                        "command send failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
