mod errors;
mod player;
mod sync;

// Re-export the domain boundary types and ports.
pub use errors::SyncClientError;
pub use player::LocalPlayer;
pub use sync::{CommandAck, PositionCommand, RemotePlayer, SnapshotPublisher, StateSnapshot, SyncApi};
