// src/services/analysis.rs
use crate::errors::VeritasError;
use crate::models::AnalysisResult;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{Value, json};

pub const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";

const FORENSIC_INSTRUCTION_V1: &str = r#"Act as a forensic image analyst expert in detecting generative adversarial networks (GANs) and diffusion model artifacts.

Analyze the attached image meticulously. Look for the following common AI generation indicators:
1. Inconsistent lighting or shadows that don't match the light source.
2. Anatomical errors (extra fingers, asymmetrical eyes, weird teeth, blending limbs).
3. "Plastic" or over-smoothed skin textures.
4. Incoherent background details or impossible geometry.
5. Text or glyphs that are gibberish.
6. Earrings or accessories that don't match or blend into skin.

If the image looks perfectly natural with film grain, consistent noise, and logical physics, classify it as Real.

Provide your output in strict JSON format based on the schema."#;

/// Versioned instruction/model/temperature bundle. The workflow never sees
/// any of this; swapping the remote provider means swapping the profile and
/// the [`ForensicAnalyzer`] implementation.
#[derive(Debug, Clone)]
pub struct PromptProfile {
    pub version: &'static str,
    pub model: String,
    pub instruction: &'static str,
    /// Low temperature keeps run-to-run verdict variance down. It does not
    /// make the model deterministic.
    pub temperature: f64,
}

impl PromptProfile {
    pub fn forensic_v1(model: Option<String>) -> Self {
        Self {
            version: "forensic-v1",
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            instruction: FORENSIC_INSTRUCTION_V1,
            temperature: 0.2,
        }
    }
}

/// Seam between the workflow and the remote model. Single attempt, no retry,
/// no caching; latency and timeouts are whatever the transport exhibits.
#[async_trait]
pub trait ForensicAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        base64_payload: &str,
        mime_type: &str,
    ) -> Result<AnalysisResult, VeritasError>;
}

pub struct GeminiAnalyzer {
    api_key: String,
    profile: PromptProfile,
    endpoint: String,
    client: Client,
}

impl GeminiAnalyzer {
    pub fn new(api_key: String, profile: PromptProfile) -> Self {
        Self {
            api_key,
            profile,
            endpoint: GEMINI_ENDPOINT.to_string(),
            client: Client::new(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn request_body(&self, base64_payload: &str, mime_type: &str) -> Value {
        json!({
            "contents": [{
                "parts": [
                    {
                        "inlineData": {
                            "mimeType": mime_type,
                            "data": base64_payload
                        }
                    },
                    {
                        "text": self.profile.instruction
                    }
                ]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema(),
                "temperature": self.profile.temperature
            }
        })
    }
}

#[async_trait]
impl ForensicAnalyzer for GeminiAnalyzer {
    async fn analyze(
        &self,
        base64_payload: &str,
        mime_type: &str,
    ) -> Result<AnalysisResult, VeritasError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.endpoint, self.profile.model
        );
        debug!(
            "dispatching {} payload to {} (profile {})",
            mime_type, self.profile.model, self.profile.version
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&self.request_body(base64_payload, mime_type))
            .send()
            .await
            .map_err(|e| VeritasError::Analysis(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(VeritasError::Analysis(format!(
                "Gemini error ({}): {}",
                status, error_text
            )));
        }

        let result: Value = response
            .json()
            .await
            .map_err(|e| VeritasError::Analysis(format!("Failed to parse Gemini response: {}", e)))?;

        let text = result["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| VeritasError::Analysis("No text in Gemini response".to_string()))?;

        parse_analysis_text(text)
    }
}

/// Parses the model's structured reply. Absent or empty text, malformed
/// JSON, and out-of-range scores all collapse into one analysis failure; the
/// caller never distinguishes them.
pub fn parse_analysis_text(text: &str) -> Result<AnalysisResult, VeritasError> {
    if text.trim().is_empty() {
        return Err(VeritasError::Analysis(
            "Empty text in Gemini response".to_string(),
        ));
    }

    let parsed: AnalysisResult = serde_json::from_str(text)
        .map_err(|e| VeritasError::Analysis(format!("Non-conforming analysis JSON: {}", e)))?;

    if !(0.0..=100.0).contains(&parsed.confidence_score) {
        return Err(VeritasError::Analysis(format!(
            "Confidence score {} outside [0, 100]",
            parsed.confidence_score
        )));
    }

    Ok(parsed)
}

/// Structured-output schema constraining the reply to the
/// [`AnalysisResult`] shape.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "isAiGenerated": {
                "type": "BOOLEAN",
                "description": "True if the image is likely AI generated, false otherwise."
            },
            "confidenceScore": {
                "type": "NUMBER",
                "description": "A score from 0 to 100 indicating confidence in the verdict. 100 is absolute certainty."
            },
            "verdict": {
                "type": "STRING",
                "enum": ["LIKELY_REAL", "LIKELY_AI", "UNCERTAIN"],
                "description": "The final categorical verdict."
            },
            "forensicDetails": {
                "type": "OBJECT",
                "properties": {
                    "lighting": {
                        "type": "STRING",
                        "description": "Analysis of light sources, shadows, and reflections."
                    },
                    "anatomy": {
                        "type": "STRING",
                        "description": "Analysis of human anatomy (hands, eyes, teeth) or object structure."
                    },
                    "textures": {
                        "type": "STRING",
                        "description": "Analysis of skin texture, fabric details, and surface noise."
                    },
                    "background": {
                        "type": "STRING",
                        "description": "Analysis of depth of field, background logic, and coherence."
                    }
                },
                "required": ["lighting", "anatomy", "textures", "background"]
            },
            "keyIndicators": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "A list of specific visual artifacts or lack thereof found in the image."
            },
            "reasoning": {
                "type": "STRING",
                "description": "A summary paragraph explaining the logic behind the score."
            }
        },
        "required": [
            "isAiGenerated",
            "confidenceScore",
            "verdict",
            "forensicDetails",
            "keyIndicators",
            "reasoning"
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Verdict;

    fn conforming_reply() -> String {
        r#"{
            "isAiGenerated": true,
            "confidenceScore": 91.5,
            "verdict": "LIKELY_AI",
            "forensicDetails": {
                "lighting": "Two inconsistent key lights.",
                "anatomy": "Fused knuckles on the right hand.",
                "textures": "Uniform plastic sheen on skin.",
                "background": "Bookshelf rows merge into each other."
            },
            "keyIndicators": ["fused knuckles", "melted shelf line"],
            "reasoning": "Several classic diffusion tells."
        }"#
        .to_string()
    }

    #[test]
    fn parses_conforming_reply_verbatim() {
        let result = parse_analysis_text(&conforming_reply()).unwrap();
        assert_eq!(result.verdict, Verdict::LikelyAi);
        assert_eq!(result.confidence_score, 91.5);
        assert_eq!(result.key_indicators.len(), 2);
        assert_eq!(result.forensic_details.background, "Bookshelf rows merge into each other.");
    }

    #[test]
    fn empty_text_is_an_analysis_failure() {
        assert!(matches!(
            parse_analysis_text("   "),
            Err(VeritasError::Analysis(_))
        ));
    }

    #[test]
    fn malformed_json_is_an_analysis_failure() {
        assert!(matches!(
            parse_analysis_text("{ not json"),
            Err(VeritasError::Analysis(_))
        ));
    }

    #[test]
    fn unknown_verdict_is_an_analysis_failure() {
        let reply = conforming_reply().replace("LIKELY_AI", "PROBABLY_AI");
        assert!(matches!(
            parse_analysis_text(&reply),
            Err(VeritasError::Analysis(_))
        ));
    }

    #[test]
    fn out_of_range_score_is_an_analysis_failure() {
        for score in ["150", "-3"] {
            let reply = conforming_reply().replace("91.5", score);
            assert!(
                matches!(parse_analysis_text(&reply), Err(VeritasError::Analysis(_))),
                "score {score} should be rejected"
            );
        }
    }

    #[test]
    fn boundary_scores_are_accepted() {
        for score in ["0", "100"] {
            let reply = conforming_reply().replace("91.5", score);
            assert!(parse_analysis_text(&reply).is_ok(), "score {score} should pass");
        }
    }

    #[test]
    fn request_body_carries_payload_schema_and_low_temperature() {
        let analyzer = GeminiAnalyzer::new(
            "test-key".to_string(),
            PromptProfile::forensic_v1(None),
        );
        let body = analyzer.request_body("QUJD", "image/png");

        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["data"], "QUJD");
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
        assert!(
            parts[1]["text"].as_str().unwrap().contains("forensic image analyst"),
            "instruction text should ride along"
        );

        let config = &body["generationConfig"];
        assert_eq!(config["responseMimeType"], "application/json");
        assert_eq!(config["temperature"], 0.2);
        assert_eq!(config["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn schema_requires_every_result_field() {
        let schema = response_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        for field in [
            "isAiGenerated",
            "confidenceScore",
            "verdict",
            "forensicDetails",
            "keyIndicators",
            "reasoning",
        ] {
            assert!(required.contains(&field), "{field} missing from schema");
        }

        let details_required = &schema["properties"]["forensicDetails"]["required"];
        assert_eq!(details_required.as_array().unwrap().len(), 4);
    }
}
