// Terminal frontend: crossterm drawing and keyboard input.

pub mod input;
pub mod renderer;

pub use input::{map_key, spawn_input_thread};
pub use renderer::{TerminalRenderer, compose_frame};
