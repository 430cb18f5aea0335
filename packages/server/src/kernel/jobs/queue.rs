//! Hand-off between the submission service and the background worker.
//!
//! Submission enqueues a `WorkItem` instead of spawning the pipeline
//! directly, so crash-recovery or backpressure can be added behind the
//! `JobQueue` trait later without changing the public contract.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::sync::mpsc;
use uuid::Uuid;

/// One unit of background work: a created job plus its transient audio input.
#[derive(Debug, Clone)]
pub struct WorkItem {
    pub job_id: Uuid,
    pub audio_path: PathBuf,
}

/// Queue seam between submission and the worker.
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Enqueue a work item for the background worker.
    async fn enqueue(&self, item: WorkItem) -> Result<()>;
}

/// In-process queue backed by an unbounded tokio channel.
///
/// Queued items do not survive a process crash (crash-stop semantics).
pub struct ChannelJobQueue {
    tx: mpsc::UnboundedSender<WorkItem>,
}

impl ChannelJobQueue {
    /// Create the queue together with the receiver the worker consumes.
    pub fn unbounded() -> (Self, mpsc::UnboundedReceiver<WorkItem>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl JobQueue for ChannelJobQueue {
    async fn enqueue(&self, item: WorkItem) -> Result<()> {
        self.tx
            .send(item)
            .map_err(|_| anyhow!("job worker is no longer running"))
    }
}
