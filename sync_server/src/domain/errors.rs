use std::fmt;

// Domain-level errors for the sync workflows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    UnknownClient,
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::UnknownClient => write!(f, "unknown client"),
        }
    }
}

impl std::error::Error for SyncError {}
