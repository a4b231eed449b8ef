// Interface adapters: JSON wire protocol and HTTP handlers.

pub mod handlers;
pub mod protocol;
pub mod routes;
pub mod state;
