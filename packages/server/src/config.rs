use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub openai_api_key: String,
    /// Directory for transient audio uploads (deleted after transcription)
    pub upload_dir: PathBuf,
    /// Ceiling for each capability call (transcribe, analyze)
    pub stage_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            openai_api_key: env::var("OPENAI_API_KEY")
                .context("OPENAI_API_KEY must be set")?,
            upload_dir: env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "uploads".to_string())
                .into(),
            stage_timeout_secs: env::var("STAGE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "120".to_string())
                .parse()
                .context("STAGE_TIMEOUT_SECS must be a valid number")?,
        })
    }

    /// Per-stage capability call timeout as a `Duration`.
    pub fn stage_timeout(&self) -> Duration {
        Duration::from_secs(self.stage_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_timeout_converts_seconds() {
        let config = Config {
            port: 3000,
            openai_api_key: "sk-test".to_string(),
            upload_dir: "uploads".into(),
            stage_timeout_secs: 90,
        };

        assert_eq!(config.stage_timeout(), Duration::from_secs(90));
    }
}
