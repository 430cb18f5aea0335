//! Shared test doubles for the integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use server_core::domains::transcription::models::{
    ApplicationPoint, BiblicalReference, ResourceKind, SermonAnalysis, SuggestedResource,
    TheologicalTheme, Transcript,
};
use server_core::kernel::jobs::{
    InMemoryJobStore, Job, JobQueue, JobStatus, JobStore, JobUpdate, StoreError, WorkItem,
};
use server_core::kernel::{
    AnalysisError, BaseAnalyzer, BaseTranscriber, IngestError, ServerDeps,
};

pub fn sample_analysis() -> SermonAnalysis {
    SermonAnalysis {
        summary: "A sermon on grace".to_string(),
        key_points: vec!["Grace is unearned".to_string()],
        biblical_references: vec![BiblicalReference {
            reference: "Ephesians 2:8".to_string(),
            context: "Opening text".to_string(),
            relevance: "Defines grace".to_string(),
        }],
        theological_themes: vec![TheologicalTheme {
            theme: "Grace".to_string(),
            explanation: "Unmerited favor".to_string(),
            scriptural_basis: vec!["Romans 5:8".to_string()],
        }],
        application_points: vec![ApplicationPoint {
            point: "Extend grace".to_string(),
            practical_steps: vec!["Forgive a grudge".to_string()],
            target_audience: "Everyone".to_string(),
        }],
        suggested_resources: vec![SuggestedResource {
            title: "What's So Amazing About Grace?".to_string(),
            kind: ResourceKind::Book,
            description: "Popular-level treatment".to_string(),
            url: None,
        }],
    }
}

// =============================================================================
// Capability stubs
// =============================================================================

pub struct StubTranscriber {
    response: Result<Transcript, String>,
    delay: Option<Duration>,
    pub calls: AtomicUsize,
}

impl StubTranscriber {
    pub fn ok(text: &str) -> Self {
        Self {
            response: Ok(Transcript::from_text(text)),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn err(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BaseTranscriber for StubTranscriber {
    async fn transcribe(&self, _audio_path: &Path) -> Result<Transcript, IngestError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.response.clone().map_err(IngestError::Provider)
    }
}

pub struct StubAnalyzer {
    response: Result<SermonAnalysis, String>,
    delay: Option<Duration>,
    pub calls: AtomicUsize,
}

impl StubAnalyzer {
    pub fn ok() -> Self {
        Self {
            response: Ok(sample_analysis()),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn err(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BaseAnalyzer for StubAnalyzer {
    async fn analyze(&self, _transcript_text: &str) -> Result<SermonAnalysis, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.response.clone().map_err(AnalysisError::Provider)
    }
}

// =============================================================================
// Store wrapper recording every transition
// =============================================================================

/// Wraps the in-memory store and records the (status, progress) of each
/// successful update, in write order.
pub struct RecordingStore {
    inner: InMemoryJobStore,
    pub transitions: Mutex<Vec<(JobStatus, u8)>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self {
            inner: InMemoryJobStore::new(),
            transitions: Mutex::new(Vec::new()),
        }
    }

    pub fn transitions(&self) -> Vec<(JobStatus, u8)> {
        self.transitions.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobStore for RecordingStore {
    async fn create(&self) -> Result<Job, StoreError> {
        self.inner.create().await
    }

    async fn get(&self, id: Uuid) -> Result<Job, StoreError> {
        self.inner.get(id).await
    }

    async fn update(&self, id: Uuid, update: JobUpdate) -> Result<Job, StoreError> {
        let job = self.inner.update(id, update).await?;
        self.transitions
            .lock()
            .unwrap()
            .push((job.status, job.progress));
        Ok(job)
    }
}

// =============================================================================
// Wiring helpers
// =============================================================================

pub struct DiscardQueue;

#[async_trait]
impl JobQueue for DiscardQueue {
    async fn enqueue(&self, _item: WorkItem) -> anyhow::Result<()> {
        Ok(())
    }
}

pub fn make_deps(
    store: Arc<dyn JobStore>,
    transcriber: Arc<dyn BaseTranscriber>,
    analyzer: Arc<dyn BaseAnalyzer>,
    job_queue: Arc<dyn JobQueue>,
    upload_dir: &Path,
    stage_timeout: Duration,
) -> Arc<ServerDeps> {
    Arc::new(ServerDeps::new(
        store,
        transcriber,
        analyzer,
        job_queue,
        upload_dir.to_path_buf(),
        stage_timeout,
    ))
}

/// Create a pending job plus an input file on disk, returning the work item
/// the queue would have carried.
pub async fn seed_job(store: &dyn JobStore, upload_dir: &Path) -> WorkItem {
    let job = store.create().await.unwrap();
    let audio_path = upload_dir.join(job.id.to_string());
    tokio::fs::write(&audio_path, b"fake audio bytes")
        .await
        .unwrap();
    WorkItem {
        job_id: job.id,
        audio_path,
    }
}
