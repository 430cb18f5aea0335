pub mod health;
pub mod jobs;

pub use health::health_handler;
pub use jobs::{analysis_handler, result_handler, status_handler, submit_handler};
