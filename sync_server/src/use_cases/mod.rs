// Use cases layer: register, command and snapshot workflows.

pub mod sync;

pub use sync::{GameSnapshot, SyncService};
