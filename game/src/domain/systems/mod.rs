pub mod player;
pub mod reducer;
