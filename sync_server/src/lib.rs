pub mod domain;
pub mod frameworks;
pub mod interface_adapters;
pub mod use_cases;

pub use frameworks::config::load_map_lines;
pub use frameworks::server::{run, run_with_config};
