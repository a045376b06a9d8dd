//! Shared helpers for endpoint tests.
#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use veritas_lens::errors::VeritasError;
use veritas_lens::models::{AnalysisResult, ForensicDetails, Verdict};
use veritas_lens::services::ForensicAnalyzer;

pub const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

/// Canned analyzer standing in for the remote model.
pub struct StubAnalyzer {
    outcome: Result<AnalysisResult, String>,
    calls: AtomicUsize,
}

impl StubAnalyzer {
    pub fn succeeding(result: AnalysisResult) -> Arc<Self> {
        Arc::new(Self {
            outcome: Ok(result),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(cause: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Err(cause.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ForensicAnalyzer for StubAnalyzer {
    async fn analyze(
        &self,
        _base64_payload: &str,
        _mime_type: &str,
    ) -> Result<AnalysisResult, VeritasError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone().map_err(VeritasError::Analysis)
    }
}

pub fn sample_result() -> AnalysisResult {
    AnalysisResult {
        is_ai_generated: true,
        confidence_score: 83.0,
        verdict: Verdict::LikelyAi,
        forensic_details: ForensicDetails {
            lighting: "Key light and shadow direction disagree.".to_string(),
            anatomy: "Left hand carries six fingers.".to_string(),
            textures: "Skin shows the typical waxy diffusion sheen.".to_string(),
            background: "Fence posts merge at irregular intervals.".to_string(),
        },
        key_indicators: vec![
            "Extra finger on the left hand".to_string(),
            "Gibberish storefront text".to_string(),
        ],
        reasoning: "Several classic diffusion artifacts dominate the frame.".to_string(),
    }
}

pub fn real_verdict_result(confidence_score: f64) -> AnalysisResult {
    AnalysisResult {
        is_ai_generated: false,
        confidence_score,
        verdict: Verdict::LikelyReal,
        forensic_details: ForensicDetails {
            lighting: "Single coherent key light.".to_string(),
            anatomy: "Hands and eyes are structurally sound.".to_string(),
            textures: "Natural film grain throughout.".to_string(),
            background: "Depth of field falls off plausibly.".to_string(),
        },
        key_indicators: vec!["Consistent sensor noise".to_string()],
        reasoning: "Nothing in the frame suggests synthesis.".to_string(),
    }
}

pub fn png_bytes() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(8, 8, image::Rgb([30, 144, 255]));
    let mut out = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

pub fn jpeg_bytes() -> Vec<u8> {
    let img = image::RgbImage::from_fn(64, 64, |x, y| {
        image::Rgb([(x * 4) as u8, (y * 4) as u8, 128])
    });
    let mut out = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Jpeg)
        .unwrap();
    out
}

/// Builds a single-file multipart body plus its content-type header value.
pub fn multipart_body(filename: &str, content_type: &str, data: &[u8]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}
