pub mod context;
mod discord_bridge;
pub mod lifecycle;

pub use lifecycle::run_standalone;
