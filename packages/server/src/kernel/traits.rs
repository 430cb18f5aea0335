// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (the pipeline's state machine) lives in the transcription
// domain and consumes these capabilities through `ServerDeps`.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domains::transcription::models::{SermonAnalysis, Transcript};

// =============================================================================
// Transcriber Trait (Infrastructure - speech-to-text capability)
// =============================================================================

/// Failure of the transcription capability. Terminal for the owning job.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The provider rejected or failed to process the audio
    #[error("transcription failed: {0}")]
    Provider(String),

    /// The audio input could not be read from disk
    #[error("could not read audio input: {0}")]
    Io(#[from] std::io::Error),

    /// The capability call exceeded the configured ceiling
    #[error("transcription timed out after {0:?}")]
    Timeout(Duration),
}

#[async_trait]
pub trait BaseTranscriber: Send + Sync {
    /// Transcribe the audio file at `audio_path` into text plus timed segments.
    ///
    /// The caller retains ownership of the file; implementations must not
    /// delete it (cleanup is the pipeline's responsibility).
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcript, IngestError>;
}

// =============================================================================
// Analyzer Trait (Infrastructure - LLM analysis capability)
// =============================================================================

/// Failure of the analysis capability. Terminal for the owning job.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The provider rejected the request or returned a transport-level error
    #[error("analysis failed: {0}")]
    Provider(String),

    /// The model replied but the output did not match the expected shape
    #[error("malformed analysis output: {0}")]
    Malformed(String),

    /// The capability call exceeded the configured ceiling
    #[error("analysis timed out after {0:?}")]
    Timeout(Duration),
}

#[async_trait]
pub trait BaseAnalyzer: Send + Sync {
    /// Produce a structured thematic analysis of the transcript text.
    async fn analyze(&self, transcript_text: &str) -> Result<SermonAnalysis, AnalysisError>;
}
