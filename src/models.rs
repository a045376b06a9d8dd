// src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Workflow status flag. Exactly one value is active at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisStatus {
    Idle,
    Uploading,
    Analyzing,
    Complete,
    Error,
}

/// One accepted upload, owned by the workflow controller for the lifetime of
/// a single analysis attempt. Dropped (preview token released) on reset or
/// replacement.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub data: Vec<u8>,
    pub mime_type: String,
    pub size: usize,
    pub preview_token: Uuid,
    pub uploaded_at: DateTime<Utc>,
}

impl UploadedImage {
    pub fn new(data: Vec<u8>, mime_type: String) -> Self {
        let size = data.len();
        Self {
            data,
            mime_type,
            size,
            preview_token: Uuid::new_v4(),
            uploaded_at: Utc::now(),
        }
    }
}

/// Categorical classification returned by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    LikelyReal,
    LikelyAi,
    Uncertain,
}

/// The four per-category forensic notes. All fields are required by the
/// response schema; a reply missing any of them fails to parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForensicDetails {
    pub lighting: String,
    pub anatomy: String,
    pub textures: String,
    pub background: String,
}

/// Parsed, schema-conformant reply from the remote model.
///
/// `verdict` and `is_ai_generated` usually agree, but the model is free to
/// return inconsistent combinations; nothing downstream may assume they
/// correlate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub is_ai_generated: bool,
    /// Certainty in the verdict, 0 to 100. Range-checked at the parse
    /// boundary, not assumed afterwards.
    pub confidence_score: f64,
    pub verdict: Verdict,
    pub forensic_details: ForensicDetails,
    /// Insertion order is display order. May be empty.
    pub key_indicators: Vec<String>,
    pub reasoning: String,
}

/// Flat status projection served to the frontend while an attempt runs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub status: AnalysisStatus,
    pub error: Option<String>,
    pub preview_url: Option<String>,
}
