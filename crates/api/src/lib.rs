//! HTTP layer: upload notification receiver, health and metrics.

pub mod response;
pub mod routes;
pub mod state;

pub use routes::router;
pub use state::AppState;
