pub mod handlers;
pub mod middleware;
pub mod routes;

pub use handlers::*;
pub use middleware::*;
pub use routes::*;
