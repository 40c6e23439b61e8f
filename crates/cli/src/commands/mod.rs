//! CLI command implementations

mod config;
mod generate;
mod scan;
mod types;

pub use config::{cmd_config_init, cmd_config_show};
pub use generate::{GenerateOptions, cmd_generate};
pub use scan::cmd_scan;
pub use types::cmd_types;
