// Local TCP hand-off to the network client process.

pub mod commands;
pub mod state_sync;
pub mod wire;

pub use commands::{HandoffTimeouts, TcpMoveReporter, send_move};
pub use state_sync::{ReconnectDelays, run_state_sync};
pub use wire::SnapshotParser;
