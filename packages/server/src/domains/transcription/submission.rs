//! Job submission: validate the payload, persist the transient input, create
//! the job record, and enqueue work for the background worker.
//!
//! The caller gets the job id back immediately; processing happens on the
//! worker, never inline with the request.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::kernel::jobs::{JobQueue, JobStatus, JobStore, JobUpdate, WorkItem};
use crate::kernel::ServerDeps;

/// Submission failures, surfaced synchronously to the caller.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Missing or empty audio payload; never enters the pipeline
    #[error("no audio payload provided")]
    InvalidInput,

    /// The job could not be persisted or enqueued
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Accepts new audio inputs and hands them to the pipeline via the queue.
pub struct SubmissionService {
    store: Arc<dyn JobStore>,
    job_queue: Arc<dyn JobQueue>,
    upload_dir: PathBuf,
}

impl SubmissionService {
    pub fn new(deps: &ServerDeps) -> Self {
        Self {
            store: deps.store.clone(),
            job_queue: deps.job_queue.clone(),
            upload_dir: deps.upload_dir.clone(),
        }
    }

    /// Submit an audio payload. Returns the new job's id without waiting for
    /// processing to start.
    ///
    /// The transient input is persisted before the job record exists, so a
    /// failed submission never leaves a `pending` job in the store. If the
    /// work item cannot be enqueued after the record was created, the job is
    /// written to `error` and the input removed: nothing downstream would
    /// ever own it.
    pub async fn submit(&self, audio: &[u8]) -> Result<Uuid, SubmitError> {
        if audio.is_empty() {
            return Err(SubmitError::InvalidInput);
        }

        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .context("failed to create upload directory")?;

        let audio_path = self.upload_dir.join(Uuid::new_v4().to_string());
        tokio::fs::write(&audio_path, audio)
            .await
            .context("failed to persist audio upload")?;

        let job = match self.store.create().await {
            Ok(job) => job,
            Err(e) => {
                self.discard_input(&audio_path).await;
                return Err(SubmitError::Internal(e.into()));
            }
        };

        if let Err(e) = self
            .job_queue
            .enqueue(WorkItem {
                job_id: job.id,
                audio_path: audio_path.clone(),
            })
            .await
        {
            self.discard_input(&audio_path).await;

            let failed = JobUpdate {
                status: Some(JobStatus::Error),
                progress: Some(0),
                error_message: Some("job could not be queued for processing".to_string()),
                completed_at: Some(Utc::now()),
                ..Default::default()
            };
            if let Err(store_err) = self.store.update(job.id, failed).await {
                warn!(job_id = %job.id, error = %store_err, "failed to record enqueue failure");
            }

            return Err(SubmitError::Internal(e.context("failed to enqueue job")));
        }

        info!(job_id = %job.id, bytes = audio.len(), "job submitted");
        Ok(job.id)
    }

    async fn discard_input(&self, path: &Path) {
        if let Err(e) = tokio::fs::remove_file(path).await {
            warn!(path = %path.display(), error = %e, "failed to delete transient audio input");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::kernel::jobs::{InMemoryJobStore, JobStatus};
    use crate::kernel::{AnalysisError, BaseAnalyzer, BaseTranscriber, IngestError};
    use crate::domains::transcription::models::{SermonAnalysis, Transcript};

    struct NoopTranscriber;

    #[async_trait]
    impl BaseTranscriber for NoopTranscriber {
        async fn transcribe(&self, _: &std::path::Path) -> Result<Transcript, IngestError> {
            Ok(Transcript::from_text(""))
        }
    }

    struct NoopAnalyzer;

    #[async_trait]
    impl BaseAnalyzer for NoopAnalyzer {
        async fn analyze(&self, _: &str) -> Result<SermonAnalysis, AnalysisError> {
            Err(AnalysisError::Provider("unused".into()))
        }
    }

    struct RecordingQueue {
        items: Mutex<Vec<WorkItem>>,
    }

    #[async_trait]
    impl JobQueue for RecordingQueue {
        async fn enqueue(&self, item: WorkItem) -> anyhow::Result<()> {
            self.items.lock().unwrap().push(item);
            Ok(())
        }
    }

    struct FailingQueue;

    #[async_trait]
    impl JobQueue for FailingQueue {
        async fn enqueue(&self, _: WorkItem) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("job worker is no longer running"))
        }
    }

    /// Store wrapper remembering every created job id, so tests can inspect
    /// records after a submission that returned `Err`.
    struct TrackingStore {
        inner: InMemoryJobStore,
        created: Mutex<Vec<Uuid>>,
    }

    impl TrackingStore {
        fn new() -> Self {
            Self {
                inner: InMemoryJobStore::new(),
                created: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl JobStore for TrackingStore {
        async fn create(&self) -> Result<crate::kernel::jobs::Job, crate::kernel::jobs::StoreError> {
            let job = self.inner.create().await?;
            self.created.lock().unwrap().push(job.id);
            Ok(job)
        }

        async fn get(
            &self,
            id: Uuid,
        ) -> Result<crate::kernel::jobs::Job, crate::kernel::jobs::StoreError> {
            self.inner.get(id).await
        }

        async fn update(
            &self,
            id: Uuid,
            update: JobUpdate,
        ) -> Result<crate::kernel::jobs::Job, crate::kernel::jobs::StoreError> {
            self.inner.update(id, update).await
        }
    }

    fn service(dir: &std::path::Path) -> (SubmissionService, Arc<InMemoryJobStore>, Arc<RecordingQueue>) {
        let store = Arc::new(InMemoryJobStore::new());
        let queue = Arc::new(RecordingQueue {
            items: Mutex::new(Vec::new()),
        });
        let deps = ServerDeps::new(
            store.clone(),
            Arc::new(NoopTranscriber),
            Arc::new(NoopAnalyzer),
            queue.clone(),
            dir.to_path_buf(),
            Duration::from_secs(1),
        );
        (SubmissionService::new(&deps), store, queue)
    }

    #[tokio::test]
    async fn empty_payload_is_rejected_synchronously() {
        let dir = tempfile::tempdir().unwrap();
        let (service, store, queue) = service(dir.path());

        let result = service.submit(&[]).await;
        assert!(matches!(result, Err(SubmitError::InvalidInput)));

        // Nothing was created or enqueued
        assert!(queue.items.lock().unwrap().is_empty());
        drop(store);
    }

    #[tokio::test]
    async fn submit_creates_pending_job_and_enqueues_work() {
        let dir = tempfile::tempdir().unwrap();
        let (service, store, queue) = service(dir.path());

        let job_id = service.submit(b"fake audio bytes").await.unwrap();

        let job = store.get(job_id).await.unwrap();
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.progress, 0);

        let items = queue.items.lock().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].job_id, job_id);

        // The transient input was written where the work item points
        let written = std::fs::read(&items[0].audio_path).unwrap();
        assert_eq!(written, b"fake audio bytes");
    }

    #[tokio::test]
    async fn failed_enqueue_fails_the_job_and_removes_the_input() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(TrackingStore::new());
        let deps = ServerDeps::new(
            store.clone(),
            Arc::new(NoopTranscriber),
            Arc::new(NoopAnalyzer),
            Arc::new(FailingQueue),
            dir.path().to_path_buf(),
            Duration::from_secs(1),
        );
        let service = SubmissionService::new(&deps);

        let result = service.submit(b"fake audio bytes").await;
        assert!(matches!(result, Err(SubmitError::Internal(_))));

        // The record is not left at pending: it was driven to error
        let created = store.created.lock().unwrap().clone();
        assert_eq!(created.len(), 1);
        let job = store.get(created[0]).await.unwrap();
        assert_eq!(job.status, JobStatus::Error);
        assert!(job.error_message.is_some());

        // No orphaned audio file remains
        let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn each_submission_gets_its_own_job() {
        let dir = tempfile::tempdir().unwrap();
        let (service, _store, queue) = service(dir.path());

        let first = service.submit(b"one").await.unwrap();
        let second = service.submit(b"two").await.unwrap();

        assert_ne!(first, second);
        assert_eq!(queue.items.lock().unwrap().len(), 2);
    }
}
