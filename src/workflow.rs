// src/workflow.rs
use crate::errors::{ANALYSIS_FAILURE_MESSAGE, READ_FAILURE_MESSAGE, VeritasError};
use crate::models::{AnalysisResult, AnalysisStatus, StatusSnapshot, UploadedImage};
use chrono::Utc;
use log::{debug, info};
use uuid::Uuid;

/// Identifies one accepted submission. Both a new submission and a reset
/// advance the counter, so a completion carrying an old id can always be
/// recognized as stale and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptId(u64);

/// The single piece of meaningful application state: the status flag, the
/// upload, the result, and the last error, with exactly one status active at
/// a time.
///
/// Invariants: the result is present iff status is `Complete`; the error
/// message is present iff status is `Error`. A submission while a prior
/// attempt is `Uploading`/`Analyzing` is rejected rather than superseding it;
/// the drop surface is expected to be disabled while an attempt runs, so the
/// rejection only defends against racing clients.
pub struct WorkflowController {
    status: AnalysisStatus,
    image: Option<UploadedImage>,
    result: Option<AnalysisResult>,
    error: Option<String>,
    attempt: u64,
}

impl WorkflowController {
    pub fn new() -> Self {
        Self {
            status: AnalysisStatus::Idle,
            image: None,
            result: None,
            error: None,
            attempt: 0,
        }
    }

    pub fn status(&self) -> AnalysisStatus {
        self.status
    }

    pub fn image(&self) -> Option<&UploadedImage> {
        self.image.as_ref()
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Accepts a validated upload and enters `Uploading`. Allowed from `Idle`
    /// and `Error` (clearing the previous error); a completed report must be
    /// explicitly reset before the next submission.
    pub fn begin(&mut self, image: UploadedImage) -> Result<AttemptId, VeritasError> {
        match self.status {
            AnalysisStatus::Uploading | AnalysisStatus::Analyzing => {
                return Err(VeritasError::AttemptInProgress);
            }
            AnalysisStatus::Complete => return Err(VeritasError::AwaitingReset),
            AnalysisStatus::Idle | AnalysisStatus::Error => {}
        }

        self.attempt += 1;
        self.error = None;
        self.result = None;
        info!(
            "attempt {}: accepted {} upload ({} bytes)",
            self.attempt, image.mime_type, image.size
        );
        self.image = Some(image);
        self.status = AnalysisStatus::Uploading;
        Ok(AttemptId(self.attempt))
    }

    /// Encoder finished; the remote call is about to be issued. Returns
    /// `false` if the attempt is no longer current.
    pub fn mark_analyzing(&mut self, attempt: AttemptId) -> bool {
        if attempt.0 != self.attempt || self.status != AnalysisStatus::Uploading {
            debug!("dropping stale ANALYZING transition for attempt {}", attempt.0);
            return false;
        }
        self.status = AnalysisStatus::Analyzing;
        true
    }

    /// The encoder could not read the upload.
    pub fn fail_read(&mut self, attempt: AttemptId) -> bool {
        if attempt.0 != self.attempt || self.status != AnalysisStatus::Uploading {
            debug!("dropping stale read failure for attempt {}", attempt.0);
            return false;
        }
        self.error = Some(READ_FAILURE_MESSAGE.to_string());
        self.status = AnalysisStatus::Error;
        true
    }

    /// Stores a successful analysis. A stale completion (the attempt was
    /// reset while the request was in flight) is dropped without touching
    /// the newer state.
    pub fn complete(&mut self, attempt: AttemptId, result: AnalysisResult) -> bool {
        if attempt.0 != self.attempt || self.status != AnalysisStatus::Analyzing {
            debug!("dropping stale completion for attempt {}", attempt.0);
            return false;
        }
        if let Some(image) = &self.image {
            let elapsed = (Utc::now() - image.uploaded_at).num_milliseconds();
            info!("attempt {}: analysis complete {} ms after upload", self.attempt, elapsed);
        }
        self.result = Some(result);
        self.status = AnalysisStatus::Complete;
        true
    }

    /// The remote call failed or returned non-conforming data. Only the
    /// fixed generic message is stored; the cause was already logged.
    pub fn fail_analysis(&mut self, attempt: AttemptId) -> bool {
        if attempt.0 != self.attempt || self.status != AnalysisStatus::Analyzing {
            debug!("dropping stale analysis failure for attempt {}", attempt.0);
            return false;
        }
        self.error = Some(ANALYSIS_FAILURE_MESSAGE.to_string());
        self.status = AnalysisStatus::Error;
        true
    }

    /// Returns to `Idle`, releasing the preview handle and discarding any
    /// result or error. Idempotent; an in-flight attempt becomes stale.
    pub fn reset(&mut self) {
        self.attempt += 1;
        self.image = None;
        self.result = None;
        self.error = None;
        self.status = AnalysisStatus::Idle;
    }

    /// Resolves a preview token to the upload's bytes. Tokens from a reset
    /// or replaced attempt resolve to nothing.
    pub fn preview(&self, token: &Uuid) -> Option<(&str, &[u8])> {
        self.image
            .as_ref()
            .filter(|image| image.preview_token == *token)
            .map(|image| (image.mime_type.as_str(), image.data.as_slice()))
    }

    pub fn preview_url(&self) -> Option<String> {
        self.image
            .as_ref()
            .map(|image| format!("/api/v1/preview/{}", image.preview_token))
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            status: self.status,
            error: self.error.clone(),
            preview_url: self.preview_url(),
        }
    }
}

impl Default for WorkflowController {
    fn default() -> Self {
        Self::new()
    }
}
