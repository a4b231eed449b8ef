use crate::domain::ports::Clock;
use crate::use_cases::SyncService;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

// Shared application state for the HTTP handlers.
pub struct AppState {
    pub sync: Arc<SyncService<SystemClock>>,
}

// System clock adapter used by the sync service.
#[derive(Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}
