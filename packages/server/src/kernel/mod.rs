//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod jobs;
pub mod traits;

/// Whisper — speech-to-text model used for the transcription stage.
pub const WHISPER_1: &str = "whisper-1";

/// GPT-4 — model used for structured sermon analysis.
pub const GPT_4: &str = "gpt-4";

pub use deps::ServerDeps;
pub use traits::{AnalysisError, BaseAnalyzer, BaseTranscriber, IngestError};
