//! Pure OpenAI REST API client
//!
//! A clean, minimal client for the OpenAI API with no domain-specific logic.
//! Supports chat completions, JSON-object responses, typed extraction, and
//! Whisper audio transcription.
//!
//! # Example
//!
//! ```rust,ignore
//! use openai_client::{OpenAIClient, ChatRequest, Message};
//!
//! let client = OpenAIClient::from_env()?;
//!
//! // Chat completion
//! let response = client.chat_completion(ChatRequest {
//!     model: "gpt-4".into(),
//!     messages: vec![Message::user("Hello!")],
//!     ..Default::default()
//! }).await?;
//!
//! // Audio transcription
//! let transcription = client.transcribe_audio("sermon.mp3", bytes, "whisper-1").await?;
//! ```
//!
//! # Typed JSON Extraction
//!
//! ```rust,ignore
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Outline {
//!     title: String,
//!     points: Vec<String>,
//! }
//!
//! // The prompt must describe the expected JSON shape; the json_object
//! // response format guarantees syntactically valid JSON back.
//! let outline: Outline = client.extract("gpt-4", prompt).await?;
//! ```

pub mod error;
pub mod types;

pub use error::{OpenAIError, Result};
pub use types::*;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Pure OpenAI API client.
#[derive(Clone)]
pub struct OpenAIClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAIClient {
    /// Create a new OpenAI client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    /// Create from environment variable `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| OpenAIError::Config("OPENAI_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Chat completion.
    ///
    /// Send messages to the chat completion API and get a response.
    pub async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "OpenAI request failed");
                OpenAIError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "OpenAI API error");
            return Err(OpenAIError::Api(format!("OpenAI API error: {}", error_text)));
        }

        let chat_response: types::ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| OpenAIError::Parse(e.to_string()))?;

        let usage = chat_response.usage;
        let content = chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| OpenAIError::Api("No response from OpenAI".into()))?;

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis() as u64,
            "OpenAI chat completion"
        );

        Ok(ChatResponse { content, usage })
    }

    /// Chat completion constrained to a valid JSON object.
    ///
    /// Returns the raw JSON string; parse with `serde_json` in calling code,
    /// or use [`extract`](Self::extract) for typed results.
    pub async fn chat_completion_json(&self, request: ChatRequest) -> Result<String> {
        let response = self.chat_completion(request.json_object()).await?;
        Ok(response.content)
    }

    /// Typed JSON extraction.
    ///
    /// Runs the prompt under the `json_object` response format and
    /// deserializes the reply into `T`. The prompt itself must describe the
    /// expected shape; a reply that does not match it is a `Parse` error.
    pub async fn extract<T: DeserializeOwned>(&self, model: &str, prompt: &str) -> Result<T> {
        let request = ChatRequest::new(model).message(Message::user(prompt));
        let json_str = self.chat_completion_json(request).await?;

        serde_json::from_str(&json_str)
            .map_err(|e| OpenAIError::Parse(format!("Failed to deserialize response: {}", e)))
    }

    /// Transcribe an audio file with the audio transcriptions API.
    ///
    /// Uploads the bytes as a multipart form and requests `verbose_json` so
    /// the response carries timed segments alongside the full text.
    pub async fn transcribe_audio(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        model: &str,
    ) -> Result<Transcription> {
        let start = std::time::Instant::now();

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/octet-stream")
            .map_err(|e| OpenAIError::Config(format!("Invalid upload part: {}", e)))?;

        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", model.to_string())
            .text("response_format", "verbose_json");

        let response = self
            .http_client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "OpenAI transcription request failed");
                OpenAIError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "OpenAI transcription error");
            return Err(OpenAIError::Api(format!(
                "OpenAI transcription error: {}",
                error_text
            )));
        }

        let transcription: Transcription = response
            .json()
            .await
            .map_err(|e| OpenAIError::Parse(e.to_string()))?;

        debug!(
            model = %model,
            duration_ms = start.elapsed().as_millis() as u64,
            segments = transcription.segments.len(),
            "OpenAI audio transcription"
        );

        Ok(transcription)
    }
}
