//! The two-stage background pipeline: transcribe, then analyze.
//!
//! State transitions (progress checkpoints in parentheses):
//!
//! ```text
//! pending ──► transcribing(0) ──► analyzing(50) ──► completed(100)
//!                   │                   │
//!                   └───────► error(0) ◄┘
//! ```
//!
//! Every transition is written to the job store before the next capability
//! call begins, so a concurrent status read always observes a progress value
//! consistent with which call is outstanding. Capability failures are caught
//! here and converted into the terminal `error` state; they never escape the
//! background task. Failed jobs are not retried.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::time::timeout;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::kernel::jobs::{JobStatus, JobStore, JobUpdate, WorkHandler, WorkItem};
use crate::kernel::{AnalysisError, BaseAnalyzer, BaseTranscriber, IngestError, ServerDeps};

/// Orchestrates one job's stages. One instance serves all jobs; each job is
/// processed by exactly one call to [`process`](Self::process).
pub struct TranscriptionPipeline {
    store: Arc<dyn JobStore>,
    transcriber: Arc<dyn BaseTranscriber>,
    analyzer: Arc<dyn BaseAnalyzer>,
    stage_timeout: Duration,
}

impl TranscriptionPipeline {
    pub fn new(deps: &ServerDeps) -> Self {
        Self {
            store: deps.store.clone(),
            transcriber: deps.transcriber.clone(),
            analyzer: deps.analyzer.clone(),
            stage_timeout: deps.stage_timeout,
        }
    }

    /// Run both stages for a job, driving it to a terminal state.
    ///
    /// Returns `Err` only when the job's state could not be written at all
    /// (the job is then unobservable); capability failures end in `Ok` with
    /// the job in the `error` state.
    pub async fn process(&self, item: WorkItem) -> Result<()> {
        let job_id = item.job_id;

        self.checkpoint(
            job_id,
            JobUpdate {
                status: Some(JobStatus::Transcribing),
                progress: Some(0),
                ..Default::default()
            },
        )
        .await?;

        let transcribe_result =
            match timeout(self.stage_timeout, self.transcriber.transcribe(&item.audio_path)).await
            {
                Ok(result) => result,
                Err(_) => Err(IngestError::Timeout(self.stage_timeout)),
            };

        // The transient input is deleted exactly once, success or failure,
        // as soon as the transcribe call returns.
        self.remove_input(&item.audio_path).await;

        let transcript = match transcribe_result {
            Ok(transcript) => transcript,
            Err(e) => {
                warn!(job_id = %job_id, error = %e, "transcription stage failed");
                return self.fail(job_id, e.to_string()).await;
            }
        };

        // The transcript must be durably stored before analysis begins; a
        // status read never observes "analyzing" without it.
        self.checkpoint(
            job_id,
            JobUpdate {
                status: Some(JobStatus::Analyzing),
                progress: Some(50),
                transcript: Some(transcript.clone()),
                ..Default::default()
            },
        )
        .await?;

        let analysis = match timeout(self.stage_timeout, self.analyzer.analyze(&transcript.text))
            .await
        {
            Ok(Ok(analysis)) => analysis,
            Ok(Err(e)) => {
                warn!(job_id = %job_id, error = %e, "analysis stage failed");
                return self.fail(job_id, e.to_string()).await;
            }
            Err(_) => {
                let e = AnalysisError::Timeout(self.stage_timeout);
                warn!(job_id = %job_id, error = %e, "analysis stage failed");
                return self.fail(job_id, e.to_string()).await;
            }
        };

        self.checkpoint(
            job_id,
            JobUpdate {
                status: Some(JobStatus::Completed),
                progress: Some(100),
                analysis: Some(analysis),
                completed_at: Some(Utc::now()),
                ..Default::default()
            },
        )
        .await?;

        info!(job_id = %job_id, "job completed");
        Ok(())
    }

    /// Write a state transition, treating a storage failure as fatal to the
    /// job: the client could never learn the true outcome otherwise.
    async fn checkpoint(&self, job_id: Uuid, update: JobUpdate) -> Result<()> {
        if let Err(e) = self.store.update(job_id, update).await {
            error!(job_id = %job_id, error = %e, "failed to write job state, aborting pipeline");
            let _ = self.fail(job_id, format!("internal error: {e}")).await;
            return Err(e.into());
        }
        Ok(())
    }

    /// Write the terminal `error` state once.
    async fn fail(&self, job_id: Uuid, message: String) -> Result<()> {
        let update = JobUpdate {
            status: Some(JobStatus::Error),
            progress: Some(0),
            error_message: Some(message),
            completed_at: Some(Utc::now()),
            ..Default::default()
        };

        if let Err(e) = self.store.update(job_id, update).await {
            error!(job_id = %job_id, error = %e, "failed to record job error state");
            return Err(e.into());
        }
        Ok(())
    }

    async fn remove_input(&self, path: &Path) {
        if let Err(e) = tokio::fs::remove_file(path).await {
            warn!(path = %path.display(), error = %e, "failed to delete transient audio input");
        }
    }
}

#[async_trait]
impl WorkHandler for TranscriptionPipeline {
    async fn handle(&self, item: WorkItem) -> Result<()> {
        self.process(item).await
    }
}
