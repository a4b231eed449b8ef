use thiserror::Error;

// Failures surfaced by the sync service port.
#[derive(Debug, Error)]
pub enum SyncClientError {
    #[error("sync transport error: {0}")]
    Transport(String),
    #[error("unknown client")]
    UnknownClient,
    #[error("sync upstream error {status}: {message}")]
    Upstream { status: u16, message: String },
    #[error("sync response decode error: {0}")]
    Decode(String),
}

impl SyncClientError {
    // Only transport failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SyncClientError::Transport(_))
    }
}
