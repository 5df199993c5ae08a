pub mod death_log_commands;

pub use death_log_commands::*;
