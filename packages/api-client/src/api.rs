//! HTTP access to the transcription API.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::types::{AnalysisResponse, ResultResponse, StatusResponse, SubmitResponse};

/// The job endpoints, as a trait so the poller can be exercised against a
/// stub without a running server.
#[async_trait]
pub trait JobsApi: Send + Sync {
    /// Upload an audio file; returns the new job's id.
    async fn submit(&self, file_name: &str, audio: Vec<u8>) -> Result<Uuid>;

    /// Fetch the job's current status and progress.
    async fn status(&self, job_id: Uuid) -> Result<StatusResponse>;

    /// Fetch the transcript of a completed job.
    async fn result(&self, job_id: Uuid) -> Result<ResultResponse>;

    /// Fetch the analysis of a completed job.
    async fn analysis(&self, job_id: Uuid) -> Result<AnalysisResponse>;
}

/// Reqwest-backed implementation of [`JobsApi`].
pub struct HttpJobsApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpJobsApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            // The server wraps errors as {"error": "..."}; fall back to the
            // raw body when it doesn't parse
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v["error"].as_str().map(str::to_string))
                .unwrap_or(body);
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

#[async_trait]
impl JobsApi for HttpJobsApi {
    async fn submit(&self, file_name: &str, audio: Vec<u8>) -> Result<Uuid> {
        let part = reqwest::multipart::Part::bytes(audio).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("audio", part);

        let resp = self
            .client
            .post(format!("{}/jobs", self.base_url))
            .multipart(form)
            .send()
            .await?;

        let submitted: SubmitResponse = Self::handle_response(resp).await?;
        Ok(submitted.job_id)
    }

    async fn status(&self, job_id: Uuid) -> Result<StatusResponse> {
        let resp = self
            .client
            .get(format!("{}/jobs/{}/status", self.base_url, job_id))
            .send()
            .await?;
        Self::handle_response(resp).await
    }

    async fn result(&self, job_id: Uuid) -> Result<ResultResponse> {
        let resp = self
            .client
            .get(format!("{}/jobs/{}/result", self.base_url, job_id))
            .send()
            .await?;
        Self::handle_response(resp).await
    }

    async fn analysis(&self, job_id: Uuid) -> Result<AnalysisResponse> {
        let resp = self
            .client
            .get(format!("{}/jobs/{}/analysis", self.base_url, job_id))
            .send()
            .await?;
        Self::handle_response(resp).await
    }
}
