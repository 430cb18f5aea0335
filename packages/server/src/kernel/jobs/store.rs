//! Job record persistence.
//!
//! Exactly one pipeline instance owns a given job's writes, so the store does
//! not need compare-and-swap. It must still apply each update atomically so a
//! concurrent status read never observes a torn record.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::job::{Job, JobUpdate};

/// Job store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No job record with the given id
    #[error("job {0} not found")]
    NotFound(Uuid),

    /// The job is already `completed` or `error`; terminal records never
    /// transition again
    #[error("job {0} is in a terminal state")]
    TerminalState(Uuid),
}

/// Persistence seam for job records.
///
/// The backing representation is an implementation choice; a relational row
/// per job would plug in behind this same trait.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Create a new job at `pending`/progress 0 and return it.
    async fn create(&self) -> Result<Job, StoreError>;

    /// Fetch a job by id.
    async fn get(&self, id: Uuid) -> Result<Job, StoreError>;

    /// Merge the given fields into the existing record, refreshing
    /// `updated_at`. Rejects writes to terminal records.
    async fn update(&self, id: Uuid, update: JobUpdate) -> Result<Job, StoreError>;
}

/// In-memory job store: one record per job behind a single lock.
#[derive(Default)]
pub struct InMemoryJobStore {
    jobs: RwLock<HashMap<Uuid, Job>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn create(&self) -> Result<Job, StoreError> {
        let job = Job::new();
        let mut jobs = self.jobs.write().await;
        jobs.insert(job.id, job.clone());
        Ok(job)
    }

    async fn get(&self, id: Uuid) -> Result<Job, StoreError> {
        let jobs = self.jobs.read().await;
        jobs.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    async fn update(&self, id: Uuid, update: JobUpdate) -> Result<Job, StoreError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        if job.status.is_terminal() {
            return Err(StoreError::TerminalState(id));
        }

        job.apply(update);
        Ok(job.clone())
    }
}
