// src/services/validation.rs
use crate::errors::VeritasError;

/// Largest accepted upload: 10 MiB.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub const UNSUPPORTED_TYPE_MESSAGE: &str = "Only image files (JPG, PNG, WEBP) are supported.";
pub const FILE_TOO_LARGE_MESSAGE: &str = "File size exceeds 10MB limit.";

/// Why a candidate upload was turned away. Rejections are local to the upload
/// surface and never move the workflow out of its current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    UnsupportedType,
    FileTooLarge,
}

impl RejectReason {
    pub fn message(self) -> &'static str {
        match self {
            RejectReason::UnsupportedType => UNSUPPORTED_TYPE_MESSAGE,
            RejectReason::FileTooLarge => FILE_TOO_LARGE_MESSAGE,
        }
    }
}

impl From<RejectReason> for VeritasError {
    fn from(reason: RejectReason) -> Self {
        VeritasError::Validation(reason.message().to_string())
    }
}

/// Checks a candidate's MIME type and byte size before acceptance. Pure; the
/// MIME check runs first.
pub fn validate_candidate(mime_type: &str, size: usize) -> Result<(), RejectReason> {
    if !mime_type.starts_with("image/") {
        return Err(RejectReason::UnsupportedType);
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(RejectReason::FileTooLarge);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_image_within_limit() {
        assert_eq!(validate_candidate("image/jpeg", 2 * 1024 * 1024), Ok(()));
        assert_eq!(validate_candidate("image/webp", 1), Ok(()));
    }

    #[test]
    fn accepts_exactly_at_the_ceiling() {
        assert_eq!(validate_candidate("image/png", MAX_UPLOAD_BYTES), Ok(()));
    }

    #[test]
    fn rejects_non_image_mime() {
        for mime in ["application/pdf", "text/plain", "video/mp4", ""] {
            assert_eq!(
                validate_candidate(mime, 1024),
                Err(RejectReason::UnsupportedType),
                "{mime} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_oversized_file() {
        assert_eq!(
            validate_candidate("image/png", MAX_UPLOAD_BYTES + 1),
            Err(RejectReason::FileTooLarge)
        );
        assert_eq!(
            validate_candidate("image/png", 15 * 1024 * 1024),
            Err(RejectReason::FileTooLarge)
        );
    }

    #[test]
    fn mime_check_wins_over_size_check() {
        assert_eq!(
            validate_candidate("application/zip", MAX_UPLOAD_BYTES + 1),
            Err(RejectReason::UnsupportedType)
        );
    }

    #[test]
    fn reject_reasons_map_to_user_messages() {
        assert_eq!(RejectReason::UnsupportedType.message(), UNSUPPORTED_TYPE_MESSAGE);
        assert_eq!(RejectReason::FileTooLarge.message(), FILE_TOO_LARGE_MESSAGE);
    }
}
