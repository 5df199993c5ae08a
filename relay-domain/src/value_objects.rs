// Domain value objects
pub mod event_type;
pub mod identifiers;

pub use event_type::*;
pub use identifiers::*;
