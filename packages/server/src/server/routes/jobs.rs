//! Job endpoints: submission, status polling, and artifact retrieval.

use axum::extract::{Extension, Multipart, Path};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::domains::transcription::models::{SermonAnalysis, Transcript};
use crate::kernel::jobs::JobStatus;
use crate::server::app::AppState;
use crate::server::error::ApiError;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub job_id: Uuid,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: JobStatus,
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct ResultResponse {
    pub transcript: Transcript,
}

#[derive(Serialize)]
pub struct AnalysisResponse {
    pub analysis: SermonAnalysis,
}

/// POST /jobs - accept a multipart audio upload and start a job.
///
/// Responds 201 with the job id as soon as the input is persisted and the
/// work item is enqueued; processing happens in the background.
pub async fn submit_handler(
    Extension(state): Extension<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<SubmitResponse>), ApiError> {
    let mut audio: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidInput(format!("malformed multipart body: {e}")))?
    {
        if field.name() == Some("audio") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::InvalidInput(format!("failed to read audio field: {e}")))?;
            audio = Some(bytes.to_vec());
        }
    }

    let audio = audio.ok_or_else(|| ApiError::InvalidInput("No audio file provided".to_string()))?;

    let job_id = state.submission.submit(&audio).await?;

    Ok((StatusCode::CREATED, Json(SubmitResponse { job_id })))
}

/// GET /jobs/:id/status - current status, progress, and error message if any.
pub async fn status_handler(
    Extension(state): Extension<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<StatusResponse>, ApiError> {
    let job = state.deps.store.get(job_id).await?;

    Ok(Json(StatusResponse {
        status: job.status,
        progress: job.progress,
        error: job.error_message,
    }))
}

/// GET /jobs/:id/result - the transcript, available only once completed.
pub async fn result_handler(
    Extension(state): Extension<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<ResultResponse>, ApiError> {
    let job = state.deps.store.get(job_id).await?;

    if job.status != JobStatus::Completed {
        return Err(ApiError::NotFound);
    }

    let transcript = job.transcript.ok_or(ApiError::NotFound)?;
    Ok(Json(ResultResponse { transcript }))
}

/// GET /jobs/:id/analysis - the structured analysis, available only once
/// completed.
pub async fn analysis_handler(
    Extension(state): Extension<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let job = state.deps.store.get(job_id).await?;

    if job.status != JobStatus::Completed {
        return Err(ApiError::NotFound);
    }

    let analysis = job.analysis.ok_or(ApiError::NotFound)?;
    Ok(Json(AnalysisResponse { analysis }))
}
