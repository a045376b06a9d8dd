// src/services/mod.rs
pub mod analysis;
pub mod encoder;
pub mod validation;

pub use analysis::{ForensicAnalyzer, GeminiAnalyzer, PromptProfile};
pub use encoder::{EncodedImage, ImageEncoder, strip_data_uri_prefix};
pub use validation::{MAX_UPLOAD_BYTES, RejectReason, validate_candidate};
