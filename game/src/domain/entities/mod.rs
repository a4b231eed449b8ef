// Pure entity state machines. Tasks in `use_cases` drive them with timers and channels.

pub mod invisibility;
pub mod monster;
pub mod star;

pub use invisibility::InvisibilityItem;
pub use monster::{Monster, MonsterState};
pub use star::Star;
