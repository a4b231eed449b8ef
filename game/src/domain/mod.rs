// Domain layer: world state, entity rules and the reducer.

pub mod entities;
pub mod events;
pub mod map;
pub mod ports;
pub mod position;
pub mod systems;
pub mod tuning;
pub mod world;

pub use events::GameEvent;
pub use position::Position;
pub use world::{SyncSnapshot, World};
