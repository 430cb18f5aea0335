//! Job model for background audio processing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;
use uuid::Uuid;

use crate::domains::transcription::models::{SermonAnalysis, Transcript};

// ============================================================================
// Enums
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Pending,
    Transcribing,
    Analyzing,
    Completed,
    Error,
}

impl JobStatus {
    /// Whether this status is terminal (no further transitions occur).
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Error)
    }
}

// ============================================================================
// Job Model
// ============================================================================

/// One submitted audio-to-analysis request and its tracked state.
///
/// Created at `pending`/progress 0 by the submission service; mutated only by
/// the pipeline during stage execution. Progress values are discrete
/// checkpoints (0, 50, 100), reset to 0 on error.
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct Job {
    #[builder(default = Uuid::new_v4())]
    pub id: Uuid,

    // State
    #[builder(default)]
    pub status: JobStatus,
    #[builder(default = 0)]
    pub progress: u8,

    // Stage outputs
    #[builder(default, setter(strip_option))]
    pub transcript: Option<Transcript>,
    #[builder(default, setter(strip_option))]
    pub analysis: Option<SermonAnalysis>,

    // Error tracking
    #[builder(default, setter(strip_option))]
    pub error_message: Option<String>,

    // Timestamps
    #[builder(default = Utc::now())]
    pub created_at: DateTime<Utc>,
    #[builder(default = Utc::now())]
    pub updated_at: DateTime<Utc>,
    #[builder(default, setter(strip_option))]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Create a new job at `pending`/progress 0.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Merge a partial update into this record and refresh `updated_at`.
    ///
    /// Unset fields keep their current value (last-write-wins per field set).
    pub fn apply(&mut self, update: JobUpdate) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(progress) = update.progress {
            self.progress = progress;
        }
        if let Some(transcript) = update.transcript {
            self.transcript = Some(transcript);
        }
        if let Some(analysis) = update.analysis {
            self.analysis = Some(analysis);
        }
        if let Some(error_message) = update.error_message {
            self.error_message = Some(error_message);
        }
        if let Some(completed_at) = update.completed_at {
            self.completed_at = Some(completed_at);
        }
        self.updated_at = Utc::now();
    }
}

impl Default for Job {
    fn default() -> Self {
        Self::new()
    }
}

/// Partial field set merged into a job record by [`Job::apply`].
#[derive(Debug, Clone, Default)]
pub struct JobUpdate {
    pub status: Option<JobStatus>,
    pub progress: Option<u8>,
    pub transcript: Option<Transcript>,
    pub analysis: Option<SermonAnalysis>,
    pub error_message: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
}
