//! Job worker service for processing queued work items.
//!
//! The `JobWorker` is a long-running service that:
//! - Dequeues work items from the channel queue
//! - Spawns one handler task per item (jobs run concurrently; stages within
//!   one job stay strictly sequential inside the handler)
//! - Stops on cancellation or when the queue side is dropped
//!
//! # Architecture
//!
//! ```text
//! JobWorker
//!     │
//!     ├─► rx.recv()  (WorkItem from ChannelJobQueue)
//!     └─► spawn WorkHandler.handle(item)
//!             └─► TranscriptionPipeline.process(item)
//! ```

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::queue::WorkItem;

/// Configuration for the job worker.
#[derive(Debug, Clone)]
pub struct JobWorkerConfig {
    /// Worker ID for this instance
    pub worker_id: String,
}

impl Default for JobWorkerConfig {
    fn default() -> Self {
        Self {
            worker_id: format!("worker-{}", Uuid::new_v4()),
        }
    }
}

impl JobWorkerConfig {
    /// Create a new config with a specific worker ID.
    pub fn with_worker_id(worker_id: impl Into<String>) -> Self {
        Self {
            worker_id: worker_id.into(),
        }
    }
}

/// Handler trait for executing dequeued work items.
///
/// The handler owns job-level failure handling (writing the terminal error
/// state); an `Err` from `handle` means the job's state could not be
/// recorded at all and is only logged here.
#[async_trait::async_trait]
pub trait WorkHandler: Send + Sync {
    async fn handle(&self, item: WorkItem) -> Result<()>;
}

/// A worker that processes work items from a queue.
pub struct JobWorker {
    rx: mpsc::UnboundedReceiver<WorkItem>,
    handler: Arc<dyn WorkHandler>,
    config: JobWorkerConfig,
}

impl JobWorker {
    /// Create a new job worker.
    pub fn new(rx: mpsc::UnboundedReceiver<WorkItem>, handler: Arc<dyn WorkHandler>) -> Self {
        Self {
            rx,
            handler,
            config: JobWorkerConfig::default(),
        }
    }

    /// Create with custom configuration.
    pub fn with_config(
        rx: mpsc::UnboundedReceiver<WorkItem>,
        handler: Arc<dyn WorkHandler>,
        config: JobWorkerConfig,
    ) -> Self {
        Self {
            rx,
            handler,
            config,
        }
    }

    /// Run the worker until cancellation or queue closure.
    ///
    /// Each dequeued item runs as its own task; in-flight jobs are abandoned
    /// on cancellation (crash-stop semantics, no mid-pipeline cancellation).
    pub async fn run(mut self, shutdown: CancellationToken) -> Result<()> {
        info!(worker_id = %self.config.worker_id, "job worker starting");

        let mut tasks: JoinSet<()> = JoinSet::new();

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                maybe_item = self.rx.recv() => {
                    let Some(item) = maybe_item else {
                        // All queue senders dropped
                        break;
                    };

                    debug!(
                        worker_id = %self.config.worker_id,
                        job_id = %item.job_id,
                        "dequeued work item"
                    );

                    let handler = self.handler.clone();
                    tasks.spawn(async move {
                        let job_id = item.job_id;
                        if let Err(e) = handler.handle(item).await {
                            error!(job_id = %job_id, error = %e, "work handler failed");
                        }
                    });
                }
                // Reap finished tasks so the set does not grow unbounded
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        // Let in-flight jobs run to their terminal state before returning;
        // dropping the set would abort them mid-pipeline.
        if !tasks.is_empty() {
            info!(
                worker_id = %self.config.worker_id,
                count = tasks.len(),
                "waiting for running jobs to complete"
            );
            while tasks.join_next().await.is_some() {}
        }

        info!(worker_id = %self.config.worker_id, "job worker stopped");
        Ok(())
    }
}
