// src/errors.rs
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Fixed user-facing message for a file that could not be read or decoded.
pub const READ_FAILURE_MESSAGE: &str = "Failed to read the file.";

/// Fixed user-facing message for any remote analysis failure. The underlying
/// cause is logged, never sent to the client.
pub const ANALYSIS_FAILURE_MESSAGE: &str =
    "Failed to analyze the image. Please try again or use a different file.";

#[derive(Error, Debug)]
pub enum VeritasError {
    /// Upload rejected before any state transition. Carries the user-facing
    /// reason text.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The file's bytes could not be decoded as an image.
    #[error("File read error: {0}")]
    ReadFailure(String),

    /// Remote call failed, returned nothing, or returned non-conforming data.
    #[error("Analysis error: {0}")]
    Analysis(String),

    #[error("An analysis is already in progress")]
    AttemptInProgress,

    #[error("A completed analysis is awaiting reset")]
    AwaitingReset,

    #[error("The analysis attempt was reset before it finished")]
    AttemptSuperseded,

    #[error("Not found: {0}")]
    NotFound(String),
}

impl ResponseError for VeritasError {
    fn error_response(&self) -> HttpResponse {
        match self {
            VeritasError::Validation(message) => {
                HttpResponse::BadRequest().json(serde_json::json!({
                    "error": "Validation error",
                    "kind": "validation",
                    "message": message
                }))
            }
            VeritasError::ReadFailure(_) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Read failure",
                "kind": "read",
                "message": READ_FAILURE_MESSAGE
            })),
            VeritasError::Analysis(_) => {
                HttpResponse::ServiceUnavailable().json(serde_json::json!({
                    "error": "AI service error",
                    "kind": "analysis",
                    "message": ANALYSIS_FAILURE_MESSAGE
                }))
            }
            VeritasError::AttemptInProgress
            | VeritasError::AwaitingReset
            | VeritasError::AttemptSuperseded => {
                HttpResponse::Conflict().json(serde_json::json!({
                    "error": "Conflict",
                    "kind": "conflict",
                    "message": self.to_string()
                }))
            }
            VeritasError::NotFound(what) => HttpResponse::NotFound().json(serde_json::json!({
                "error": "Not found",
                "kind": "not_found",
                "message": what
            })),
        }
    }
}
