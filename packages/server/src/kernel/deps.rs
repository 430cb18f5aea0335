//! Server dependencies (using traits for testability)
//!
//! This module provides the central dependency container shared by the HTTP
//! routes, the submission service, and the background pipeline. All external
//! services use trait abstractions to enable testing.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::kernel::jobs::{JobQueue, JobStore};
use crate::kernel::{BaseAnalyzer, BaseTranscriber};

/// Server dependencies accessible to routes and the pipeline
#[derive(Clone)]
pub struct ServerDeps {
    /// Job records and their state
    pub store: Arc<dyn JobStore>,
    /// Speech-to-text capability
    pub transcriber: Arc<dyn BaseTranscriber>,
    /// LLM analysis capability
    pub analyzer: Arc<dyn BaseAnalyzer>,
    /// Queue feeding the background worker
    pub job_queue: Arc<dyn JobQueue>,
    /// Directory for transient audio uploads
    pub upload_dir: PathBuf,
    /// Ceiling for each capability call
    pub stage_timeout: Duration,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    pub fn new(
        store: Arc<dyn JobStore>,
        transcriber: Arc<dyn BaseTranscriber>,
        analyzer: Arc<dyn BaseAnalyzer>,
        job_queue: Arc<dyn JobQueue>,
        upload_dir: PathBuf,
        stage_timeout: Duration,
    ) -> Self {
        Self {
            store,
            transcriber,
            analyzer,
            job_queue,
            upload_dir,
            stage_timeout,
        }
    }
}
