//! Transcription domain models.
//!
//! Wire JSON is camelCase to match the client-facing API contract.

use serde::{Deserialize, Serialize};

// =============================================================================
// Transcript (speech-to-text output)
// =============================================================================

/// Structured transcription result: full text plus timed segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
    #[serde(default)]
    pub segments: Vec<TranscriptSegment>,
}

impl Transcript {
    /// Transcript with text only (providers without segment timing).
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            segments: Vec::new(),
        }
    }
}

/// One timed segment of the transcript, offsets in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl From<openai_client::Transcription> for Transcript {
    fn from(transcription: openai_client::Transcription) -> Self {
        Self {
            text: transcription.text,
            segments: transcription
                .segments
                .into_iter()
                .map(|s| TranscriptSegment {
                    start: s.start,
                    end: s.end,
                    text: s.text,
                })
                .collect(),
        }
    }
}

// =============================================================================
// Sermon Analysis (LLM output)
// =============================================================================

/// Structured thematic analysis of a sermon transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SermonAnalysis {
    /// Brief overview of the sermon
    pub summary: String,

    /// Main points, in order of appearance
    pub key_points: Vec<String>,

    pub biblical_references: Vec<BiblicalReference>,
    pub theological_themes: Vec<TheologicalTheme>,
    pub application_points: Vec<ApplicationPoint>,
    pub suggested_resources: Vec<SuggestedResource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiblicalReference {
    /// e.g. "John 3:16"
    pub reference: String,
    /// How it's used in the sermon
    pub context: String,
    /// Why it's significant
    pub relevance: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TheologicalTheme {
    pub theme: String,
    pub explanation: String,
    pub scriptural_basis: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPoint {
    pub point: String,
    pub practical_steps: Vec<String>,
    pub target_audience: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedResource {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Book,
    Article,
    Scripture,
    Commentary,
}
