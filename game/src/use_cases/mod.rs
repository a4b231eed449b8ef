// Use cases layer: the simulation tasks and the game loop that owns the world.

pub mod arbiter;
pub mod channels;
pub mod game;
pub mod invisibility;
pub mod monster;
pub mod star;

pub use game::{GameSettings, PlayerCommand, Simulation, game_task};
