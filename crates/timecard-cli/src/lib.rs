mod args;
mod commands;
pub mod config;
mod logging;
pub mod sample;

pub use args::{Cli, ColorMode, LogLevel};
pub use commands::run;
