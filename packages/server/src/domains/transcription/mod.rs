//! Transcription domain - the audio-to-analysis pipeline.
//!
//! A submitted recording flows through two strictly sequential stages:
//! speech-to-text ([`crate::kernel::BaseTranscriber`]), then structured
//! thematic analysis ([`crate::kernel::BaseAnalyzer`]). The pipeline drives
//! the job state machine (`pending → transcribing → analyzing → completed`,
//! with `error` reachable from either working stage) and checkpoints every
//! transition to the job store before the next capability call begins.

pub mod models;
pub mod openai;
pub mod pipeline;
pub mod submission;

pub use models::{SermonAnalysis, Transcript, TranscriptSegment};
pub use openai::{GptAnalyzer, WhisperTranscriber};
pub use pipeline::TranscriptionPipeline;
pub use submission::{SubmissionService, SubmitError};
