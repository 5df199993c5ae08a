// Domain services
pub mod dispatcher;
pub mod extractor;

pub use dispatcher::*;
pub use extractor::*;
