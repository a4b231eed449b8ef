// Port for retrieving the current time stamped on state snapshots.
pub trait Clock: Send + Sync {
    fn now_epoch_millis(&self) -> u64;
}
