//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use openai_client::OpenAIClient;

use crate::config::Config;
use crate::domains::transcription::{
    GptAnalyzer, SubmissionService, TranscriptionPipeline, WhisperTranscriber,
};
use crate::kernel::jobs::{ChannelJobQueue, InMemoryJobStore, JobWorker};
use crate::kernel::ServerDeps;
use crate::server::routes::{analysis_handler, health_handler, result_handler, status_handler, submit_handler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
    pub submission: Arc<SubmissionService>,
}

/// Build the Axum router over an already-wired application state.
///
/// Split out from [`build_app`] so tests can mount the routes over stubbed
/// capabilities without touching the network.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/jobs", post(submit_handler))
        .route("/jobs/:id/status", get(status_handler))
        .route("/jobs/:id/result", get(result_handler))
        .route("/jobs/:id/analysis", get(analysis_handler))
        .route("/health", get(health_handler))
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Wire the full application: OpenAI-backed capabilities, in-memory job
/// store, channel queue, and the background worker that drains it.
///
/// Returns the router plus a cancellation token that stops the worker; the
/// worker finishes in-flight jobs before exiting.
pub fn build_app(config: &Config) -> (Router, CancellationToken) {
    let openai_client = Arc::new(OpenAIClient::new(config.openai_api_key.clone()));

    let store = Arc::new(InMemoryJobStore::new());
    let (job_queue, work_rx) = ChannelJobQueue::unbounded();

    let deps = Arc::new(ServerDeps::new(
        store,
        Arc::new(WhisperTranscriber::new(openai_client.clone())),
        Arc::new(GptAnalyzer::new(openai_client)),
        Arc::new(job_queue),
        config.upload_dir.clone(),
        config.stage_timeout(),
    ));

    let pipeline = Arc::new(TranscriptionPipeline::new(&deps));
    let worker = JobWorker::new(work_rx, pipeline);

    let shutdown = CancellationToken::new();
    let worker_shutdown = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = worker.run(worker_shutdown).await {
            tracing::error!(error = %e, "job worker exited with error");
        }
    });

    let state = AppState {
        submission: Arc::new(SubmissionService::new(&deps)),
        deps,
    };

    (build_router(state), shutdown)
}
