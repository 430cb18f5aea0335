//! Background status polling.
//!
//! One poll cycle is one awaited status request; the next request is only
//! issued after the previous response (and the fixed interval) has elapsed,
//! so requests never overlap regardless of server latency. On a `completed`
//! status the poller fetches the transcript and analysis exactly once and
//! stops; on `error` it stops with the job's message; a transport failure
//! stops it with the error. The returned handle owns a cancellation token,
//! so a caller that loses interest can stop the loop without any shared
//! timer state.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

use crate::api::JobsApi;
use crate::error::{ApiError, Result};
use crate::types::{JobStatus, SermonAnalysis, Transcript};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// How a polling session ended.
#[derive(Debug)]
pub enum PollOutcome {
    /// The job completed; both artifacts were fetched.
    Completed {
        transcript: Transcript,
        analysis: SermonAnalysis,
    },
    /// The job ended in the `error` state.
    Failed { message: String },
    /// The caller cancelled before the job reached a terminal state.
    Cancelled,
}

/// Handle to a running polling session.
pub struct PollHandle {
    cancel: CancellationToken,
    task: JoinHandle<Result<PollOutcome>>,
}

impl PollHandle {
    /// Stop the polling loop. The session resolves to
    /// [`PollOutcome::Cancelled`] at its next await point.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait for the session to finish.
    pub async fn wait(self) -> Result<PollOutcome> {
        self.task.await.map_err(|_| ApiError::Interrupted)?
    }
}

/// Polls a job's status until it reaches a terminal state.
pub struct StatusPoller {
    api: Arc<dyn JobsApi>,
    interval: Duration,
}

impl StatusPoller {
    pub fn new(api: Arc<dyn JobsApi>) -> Self {
        Self {
            api,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the poll interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Start polling the given job in the background.
    pub fn spawn(&self, job_id: Uuid) -> PollHandle {
        let cancel = CancellationToken::new();
        let task = tokio::spawn(poll_loop(
            self.api.clone(),
            job_id,
            self.interval,
            cancel.clone(),
        ));
        PollHandle { cancel, task }
    }
}

async fn poll_loop(
    api: Arc<dyn JobsApi>,
    job_id: Uuid,
    interval: Duration,
    cancel: CancellationToken,
) -> Result<PollOutcome> {
    loop {
        let status = tokio::select! {
            _ = cancel.cancelled() => return Ok(PollOutcome::Cancelled),
            status = api.status(job_id) => status?,
        };

        debug!(%job_id, status = ?status.status, progress = status.progress, "poll");

        match status.status {
            JobStatus::Completed => {
                let transcript = api.result(job_id).await?.transcript;
                let analysis = api.analysis(job_id).await?.analysis;
                return Ok(PollOutcome::Completed {
                    transcript,
                    analysis,
                });
            }
            JobStatus::Error => {
                return Ok(PollOutcome::Failed {
                    message: status
                        .error
                        .unwrap_or_else(|| "job failed without a message".to_string()),
                });
            }
            JobStatus::Pending | JobStatus::Transcribing | JobStatus::Analyzing => {}
        }

        tokio::select! {
            _ = cancel.cancelled() => return Ok(PollOutcome::Cancelled),
            _ = tokio::time::sleep(interval) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::types::{AnalysisResponse, ResultResponse, StatusResponse};

    struct ScriptedApi {
        statuses: Mutex<VecDeque<Result<StatusResponse>>>,
        status_calls: AtomicUsize,
        result_calls: AtomicUsize,
        analysis_calls: AtomicUsize,
    }

    impl ScriptedApi {
        fn new(statuses: Vec<Result<StatusResponse>>) -> Arc<Self> {
            Arc::new(Self {
                statuses: Mutex::new(statuses.into()),
                status_calls: AtomicUsize::new(0),
                result_calls: AtomicUsize::new(0),
                analysis_calls: AtomicUsize::new(0),
            })
        }

        fn status_of(status: JobStatus, progress: u8) -> Result<StatusResponse> {
            Ok(StatusResponse {
                status,
                progress,
                error: None,
            })
        }
    }

    #[async_trait]
    impl JobsApi for ScriptedApi {
        async fn submit(&self, _file_name: &str, _audio: Vec<u8>) -> Result<Uuid> {
            unreachable!("poller never submits")
        }

        async fn status(&self, _job_id: Uuid) -> Result<StatusResponse> {
            self.status_calls.fetch_add(1, Ordering::SeqCst);
            let mut statuses = self.statuses.lock().unwrap();
            statuses
                .pop_front()
                // Keep returning the last scripted shape if polled past the script
                .unwrap_or_else(|| Self::status_of(JobStatus::Pending, 0))
        }

        async fn result(&self, _job_id: Uuid) -> Result<ResultResponse> {
            self.result_calls.fetch_add(1, Ordering::SeqCst);
            Ok(ResultResponse {
                transcript: Transcript {
                    text: "grace and peace".to_string(),
                    segments: vec![],
                },
            })
        }

        async fn analysis(&self, _job_id: Uuid) -> Result<AnalysisResponse> {
            self.analysis_calls.fetch_add(1, Ordering::SeqCst);
            Ok(AnalysisResponse {
                analysis: SermonAnalysis {
                    summary: "A sermon on grace".to_string(),
                    key_points: vec![],
                    biblical_references: vec![],
                    theological_themes: vec![],
                    application_points: vec![],
                    suggested_resources: vec![],
                },
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn polls_until_completed_then_fetches_artifacts_once() {
        let api = ScriptedApi::new(vec![
            ScriptedApi::status_of(JobStatus::Pending, 0),
            ScriptedApi::status_of(JobStatus::Transcribing, 0),
            ScriptedApi::status_of(JobStatus::Analyzing, 50),
            ScriptedApi::status_of(JobStatus::Completed, 100),
        ]);

        let handle = StatusPoller::new(api.clone()).spawn(Uuid::new_v4());
        let outcome = handle.wait().await.unwrap();

        match outcome {
            PollOutcome::Completed {
                transcript,
                analysis,
            } => {
                assert_eq!(transcript.text, "grace and peace");
                assert_eq!(analysis.summary, "A sermon on grace");
            }
            other => panic!("expected completion, got {other:?}"),
        }

        // One status request per poll cycle, then one fetch per artifact
        assert_eq!(api.status_calls.load(Ordering::SeqCst), 4);
        assert_eq!(api.result_calls.load(Ordering::SeqCst), 1);
        assert_eq!(api.analysis_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stops_on_error_status_without_fetching_artifacts() {
        let api = ScriptedApi::new(vec![
            ScriptedApi::status_of(JobStatus::Transcribing, 0),
            Ok(StatusResponse {
                status: JobStatus::Error,
                progress: 0,
                error: Some("transcription failed: bad audio".to_string()),
            }),
        ]);

        let handle = StatusPoller::new(api.clone()).spawn(Uuid::new_v4());
        let outcome = handle.wait().await.unwrap();

        match outcome {
            PollOutcome::Failed { message } => {
                assert!(message.contains("bad audio"));
            }
            other => panic!("expected failure, got {other:?}"),
        }

        assert_eq!(api.result_calls.load(Ordering::SeqCst), 0);
        assert_eq!(api.analysis_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn transport_failure_stops_polling_with_the_error() {
        let api = ScriptedApi::new(vec![
            ScriptedApi::status_of(JobStatus::Pending, 0),
            Err(ApiError::Api {
                status: 500,
                message: "Internal server error".to_string(),
            }),
        ]);

        let handle = StatusPoller::new(api.clone()).spawn(Uuid::new_v4());
        let result = handle.wait().await;

        assert!(matches!(result, Err(ApiError::Api { status: 500, .. })));
        // The loop did not continue past the failure
        assert_eq!(api.status_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_resolves_the_session() {
        // Never reaches a terminal state
        let api = ScriptedApi::new(vec![]);

        let handle = StatusPoller::new(api).spawn(Uuid::new_v4());
        handle.cancel();

        let outcome = handle.wait().await.unwrap();
        assert!(matches!(outcome, PollOutcome::Cancelled));
    }
}
