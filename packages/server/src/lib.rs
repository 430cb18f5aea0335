// Sermonlens - API Core
//
// This crate provides the backend for asynchronous sermon transcription and
// analysis: a job submission endpoint, a two-stage background pipeline
// (speech-to-text, then LLM analysis), and status/result endpoints for
// client-side polling.

pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
