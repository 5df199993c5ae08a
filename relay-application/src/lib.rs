// Relay Application Layer

pub mod commands;
pub mod metrics;
pub mod state;

pub use commands::*;
pub use metrics::Metrics;
pub use state::AppState;
