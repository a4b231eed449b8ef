// Interface adapters: HTTP sync client and the local hand-off listeners.

pub mod clients;
pub mod handoff;
pub mod protocol;
