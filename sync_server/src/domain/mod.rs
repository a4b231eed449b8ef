// Domain layer: authoritative player registry and its rules.

pub mod errors;
pub mod ports;
pub mod registry;

pub use errors::SyncError;
pub use registry::{Command, CommandOutcome, PlayerRegistry, PlayerState};
