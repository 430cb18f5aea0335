//! OpenAI-backed capability implementations.
//!
//! `WhisperTranscriber` and `GptAnalyzer` adapt the generic `openai-client`
//! to the kernel's capability traits. No pipeline logic lives here.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use openai_client::{OpenAIClient, OpenAIError};
use tracing::debug;

use super::models::{SermonAnalysis, Transcript};
use crate::kernel::{AnalysisError, BaseTranscriber, BaseAnalyzer, IngestError, GPT_4, WHISPER_1};

// =============================================================================
// WhisperTranscriber
// =============================================================================

/// Speech-to-text via the OpenAI audio transcriptions API.
pub struct WhisperTranscriber {
    client: Arc<OpenAIClient>,
    model: String,
}

impl WhisperTranscriber {
    pub fn new(client: Arc<OpenAIClient>) -> Self {
        Self {
            client,
            model: WHISPER_1.to_string(),
        }
    }

    /// Override the transcription model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl BaseTranscriber for WhisperTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcript, IngestError> {
        let bytes = tokio::fs::read(audio_path).await?;

        let file_name = audio_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());

        debug!(path = %audio_path.display(), bytes = bytes.len(), "uploading audio for transcription");

        let transcription = self
            .client
            .transcribe_audio(&file_name, bytes, &self.model)
            .await
            .map_err(|e| IngestError::Provider(e.to_string()))?;

        Ok(transcription.into())
    }
}

// =============================================================================
// GptAnalyzer
// =============================================================================

/// Structured sermon analysis via a GPT chat completion in JSON-object mode.
pub struct GptAnalyzer {
    client: Arc<OpenAIClient>,
    model: String,
}

impl GptAnalyzer {
    pub fn new(client: Arc<OpenAIClient>) -> Self {
        Self {
            client,
            model: GPT_4.to_string(),
        }
    }

    /// Override the analysis model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn build_prompt(transcript_text: &str) -> String {
        format!(
            r#"Analyze this sermon transcript and provide a structured analysis in the following JSON format:

{{
  "summary": "Brief overview of the sermon",
  "keyPoints": ["Main point 1", "Main point 2", ...],
  "biblicalReferences": [
    {{
      "reference": "Book Chapter:Verse",
      "context": "How it's used in the sermon",
      "relevance": "Why it's significant"
    }}
  ],
  "theologicalThemes": [
    {{
      "theme": "Theme name",
      "explanation": "Theme explanation",
      "scripturalBasis": ["Supporting scripture 1", "Supporting scripture 2"]
    }}
  ],
  "applicationPoints": [
    {{
      "point": "Application point",
      "practicalSteps": ["Step 1", "Step 2"],
      "targetAudience": "Who this applies to"
    }}
  ],
  "suggestedResources": [
    {{
      "title": "Resource name",
      "type": "book|article|scripture|commentary",
      "description": "Brief description",
      "url": "Optional URL"
    }}
  ]
}}

Transcript: {transcript_text}"#
        )
    }
}

#[async_trait]
impl BaseAnalyzer for GptAnalyzer {
    async fn analyze(&self, transcript_text: &str) -> Result<SermonAnalysis, AnalysisError> {
        let prompt = Self::build_prompt(transcript_text);

        self.client
            .extract::<SermonAnalysis>(&self.model, &prompt)
            .await
            .map_err(|e| match e {
                // Valid JSON that doesn't match the expected shape
                OpenAIError::Parse(msg) => AnalysisError::Malformed(msg),
                other => AnalysisError::Provider(other.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_the_transcript() {
        let prompt = GptAnalyzer::build_prompt("grace and peace to you");

        assert!(prompt.contains("Transcript: grace and peace to you"));
        assert!(prompt.contains("\"keyPoints\""));
        assert!(prompt.contains("\"suggestedResources\""));
    }
}
