//! Wire types for the transcription API. JSON is camelCase on the wire.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of a successful job submission.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub job_id: Uuid,
}

/// Job lifecycle states as reported by the status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Transcribing,
    Analyzing,
    Completed,
    Error,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Error)
    }
}

/// One status poll response.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub status: JobStatus,
    pub progress: u8,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResultResponse {
    pub transcript: Transcript,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisResponse {
    pub analysis: SermonAnalysis,
}

/// Transcript text plus timed segments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
    #[serde(default)]
    pub segments: Vec<TranscriptSegment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Structured thematic analysis of the sermon.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SermonAnalysis {
    pub summary: String,
    pub key_points: Vec<String>,
    pub biblical_references: Vec<BiblicalReference>,
    pub theological_themes: Vec<TheologicalTheme>,
    pub application_points: Vec<ApplicationPoint>,
    pub suggested_resources: Vec<SuggestedResource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiblicalReference {
    pub reference: String,
    pub context: String,
    pub relevance: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TheologicalTheme {
    pub theme: String,
    pub explanation: String,
    pub scriptural_basis: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPoint {
    pub point: String,
    pub practical_steps: Vec<String>,
    pub target_audience: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedResource {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    #[serde(default)]
    pub url: Option<String>,
}
