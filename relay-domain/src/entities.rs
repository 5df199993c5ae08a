// Domain entities

pub mod config;
pub mod event;
pub mod message;
pub mod player;

pub use config::*;
pub use event::*;
pub use message::*;
pub use player::*;
