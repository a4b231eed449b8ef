// Interface adapters: hand-off sockets to the network client and the terminal frontend.

pub mod handoff;
pub mod terminal;
