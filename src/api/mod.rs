//! HTTP API module: ticket sales endpoints, admin dashboard endpoints, and
//! the static site fallback.

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
