//! Client for the sermon transcription API.
//!
//! Submit an audio file, poll job status in the background, and fetch the
//! transcript and analysis once the job completes.
//!
//! # Example
//!
//! ```rust,ignore
//! use api_client::{HttpJobsApi, JobsApi, PollOutcome, StatusPoller};
//! use std::sync::Arc;
//!
//! let api = Arc::new(HttpJobsApi::new("http://localhost:3000"));
//! let job_id = api.submit("sermon.mp3", audio_bytes).await?;
//!
//! let handle = StatusPoller::new(api).spawn(job_id);
//! match handle.wait().await? {
//!     PollOutcome::Completed { transcript, .. } => println!("{}", transcript.text),
//!     PollOutcome::Failed { message } => eprintln!("job failed: {message}"),
//!     PollOutcome::Cancelled => {}
//! }
//! ```

pub mod api;
pub mod error;
pub mod poller;
pub mod types;

pub use api::{HttpJobsApi, JobsApi};
pub use error::{ApiError, Result};
pub use poller::{PollHandle, PollOutcome, StatusPoller, DEFAULT_POLL_INTERVAL};
pub use types::{JobStatus, SermonAnalysis, StatusResponse, Transcript};
