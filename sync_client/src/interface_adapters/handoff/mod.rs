// Local two-port hand-off: MOVE commands in, state snapshots out.

pub mod broadcaster;
pub mod commands;
pub mod wire;

pub use broadcaster::{StateBroadcaster, serve_state_subscribers};
pub use commands::serve_commands;
