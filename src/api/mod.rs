//! HTTP API layer

mod error;
mod extractors;
mod handlers;
mod routes;

pub use error::ErrorResponse;
pub use routes::{create_router, ApiDoc, AppState};
