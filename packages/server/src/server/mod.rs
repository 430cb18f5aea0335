// HTTP server setup

pub mod app;
pub mod error;
pub mod routes;

pub use app::{build_app, build_router, AppState};
pub use error::ApiError;
