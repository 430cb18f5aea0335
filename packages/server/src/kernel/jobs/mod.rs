//! Job infrastructure for background audio processing.
//!
//! This module provides the kernel-level infrastructure for job execution:
//! - [`Job`] - Job model with the transcription state machine
//! - [`JobStore`] / [`InMemoryJobStore`] - job record persistence
//! - [`JobQueue`] / [`ChannelJobQueue`] - hand-off from submission to worker
//! - [`JobWorker`] - long-running service that dequeues and executes work
//!
//! # Architecture
//!
//! ```text
//! SubmissionService.submit(audio)
//!     │
//!     ├─► JobStore.create()          (job at pending/0)
//!     └─► JobQueue.enqueue(WorkItem)
//!
//! JobWorker
//!     │
//!     ├─► Dequeue WorkItem
//!     └─► WorkHandler.handle(item)   (TranscriptionPipeline.process)
//!             ├─► JobStore.update()  (checkpoint after each stage)
//!             └─► delete transient audio input
//! ```
//!
//! Business logic stays in the transcription domain; this module only
//! provides the infrastructure.

mod job;
mod queue;
mod store;
mod worker;

pub use job::{Job, JobStatus, JobUpdate};
pub use queue::{ChannelJobQueue, JobQueue, WorkItem};
pub use store::{InMemoryJobStore, JobStore, StoreError};
pub use worker::{JobWorker, JobWorkerConfig, WorkHandler};
