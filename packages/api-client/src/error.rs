use thiserror::Error;

/// Client-side API failures.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connection refused, DNS, timeout)
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The response body did not match the expected shape
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// The background polling task stopped without producing an outcome
    #[error("polling task terminated unexpectedly")]
    Interrupted,
}

pub type Result<T> = std::result::Result<T, ApiError>;
