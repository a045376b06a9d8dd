// src/report.rs
use crate::models::{AnalysisResult, Verdict};
use chrono::{DateTime, Utc};
use serde::Serialize;

const AI_COLOR: &str = "#ef4444";
const REAL_COLOR: &str = "#10b981";
const UNCERTAIN_COLOR: &str = "#f59e0b";

/// Dashboard payload rendered from a completed result. Pure projection; no
/// network access and no controller mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForensicReport {
    pub verdict: Verdict,
    pub badge: VerdictBadge,
    pub gauge: GaugeView,
    pub confidence_score: f64,
    pub summary: String,
    pub categories: Vec<CategoryCard>,
    pub key_indicators: Vec<String>,
    pub preview_url: Option<String>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerdictBadge {
    pub label: &'static str,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GaugeView {
    pub percent: f64,
    pub label: &'static str,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCard {
    pub title: &'static str,
    pub content: String,
}

pub fn verdict_color(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::LikelyAi => AI_COLOR,
        Verdict::LikelyReal => REAL_COLOR,
        Verdict::Uncertain => UNCERTAIN_COLOR,
    }
}

fn badge_label(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::LikelyAi => "LIKELY AI",
        Verdict::LikelyReal => "LIKELY REAL",
        Verdict::Uncertain => "UNCERTAIN",
    }
}

/// The gauge shows the likelihood of the asserted class: the raw confidence
/// when the model says AI, its complement when it says real.
pub fn gauge_view(result: &AnalysisResult) -> GaugeView {
    let (percent, label) = if result.is_ai_generated {
        (result.confidence_score, "Likelihood of AI")
    } else {
        (100.0 - result.confidence_score, "Likelihood of Real")
    };

    GaugeView {
        percent,
        label,
        color: verdict_color(result.verdict),
    }
}

pub fn render_report(result: &AnalysisResult, preview_url: Option<String>) -> ForensicReport {
    ForensicReport {
        verdict: result.verdict,
        badge: VerdictBadge {
            label: badge_label(result.verdict),
            color: verdict_color(result.verdict),
        },
        gauge: gauge_view(result),
        confidence_score: result.confidence_score,
        summary: result.reasoning.clone(),
        categories: vec![
            CategoryCard {
                title: "Lighting & Shadows",
                content: result.forensic_details.lighting.clone(),
            },
            CategoryCard {
                title: "Anatomy & Structure",
                content: result.forensic_details.anatomy.clone(),
            },
            CategoryCard {
                title: "Texture Analysis",
                content: result.forensic_details.textures.clone(),
            },
            CategoryCard {
                title: "Background Coherence",
                content: result.forensic_details.background.clone(),
            },
        ],
        key_indicators: result.key_indicators.clone(),
        preview_url,
        generated_at: Utc::now(),
    }
}
