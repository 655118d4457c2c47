mod args;
mod commands;
mod handlers;
pub mod types;

pub use args::{Cli, Commands, LocationCommand, StatusCommand};
pub use commands::run;
