// Use cases layer: retrying command path, position reporting and state polling.

pub mod poller;
pub mod reporter;
pub mod sender;

#[cfg(test)]
pub(crate) mod fakes;

pub use poller::run_poller;
pub use reporter::run_position_reporter;
pub use sender::{CommandSender, RetryPolicy};
