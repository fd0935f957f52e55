//! Generation Orchestrator: the two user-facing operations.
//!
//! Flow (both operations): validate → AI gateway → normalizer → typed result.
//! Any gateway or normalization failure is logged and replaced by the
//! deterministic fallback, so the only error a caller can see is a
//! validation error on the required input.
//!
//! Nothing here persists; saving a result is a later, separate call against
//! the record store.

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::generation::fallback;
use crate::generation::models::{AnalysisResult, GenerationRequest};
use crate::generation::normalizer::{normalize, NormalizeError};
use crate::generation::prompts::{
    analysis_system_prompt, build_analysis_message, build_generation_message,
    generation_system_prompt,
};
use crate::llm_client::{
    AiGateway, ChatRequest, GatewayError, ANALYSIS_TEMPERATURE, GENERATION_TEMPERATURE,
};

/// Top-level key a generation reply must carry to be accepted.
const GENERATED_JD_KEY: &str = "generatedJD";
/// Top-level key an analysis reply must carry to be accepted.
const OVERALL_SCORE_KEY: &str = "overallScore";

/// Raw replies are logged truncated to this many characters.
const REPLY_PREVIEW_CHARS: usize = 200;

/// What one AI round trip produced.
#[derive(Debug)]
pub enum AiOutcome<T> {
    Ok(T),
    ParseFailed(NormalizeError),
    GatewayFailed(GatewayError),
}

impl<T> AiOutcome<T> {
    /// Returns the AI value, or logs the failure and builds the fallback.
    fn or_fallback(self, operation: &str, fallback: impl FnOnce() -> T) -> T {
        match self {
            AiOutcome::Ok(value) => {
                info!("{operation}: accepted AI result");
                value
            }
            AiOutcome::ParseFailed(e) => {
                warn!("{operation}: AI reply unusable ({e}), using fallback");
                fallback()
            }
            AiOutcome::GatewayFailed(e) => {
                warn!("{operation}: AI gateway failed ({e}), using fallback");
                fallback()
            }
        }
    }
}

/// One gateway call followed by normalization into `T`.
async fn request_typed<T: DeserializeOwned>(
    gateway: &dyn AiGateway,
    request: ChatRequest<'_>,
    required_key: &'static str,
) -> AiOutcome<T> {
    let raw = match gateway.chat(request).await {
        Ok(raw) => raw,
        Err(e) => return AiOutcome::GatewayFailed(e),
    };

    debug!(
        "Raw AI response: {}",
        raw.chars().take(REPLY_PREVIEW_CHARS).collect::<String>()
    );

    match normalize(&raw, required_key) {
        Ok(value) => AiOutcome::Ok(value),
        Err(e) => AiOutcome::ParseFailed(e),
    }
}

/// Generates a job description from minimal form fields.
///
/// Fails only when `job_title` is blank. The returned result always carries
/// a `generated_jd`.
pub async fn generate_from_fields(
    gateway: &dyn AiGateway,
    request: &GenerationRequest,
) -> Result<AnalysisResult, AppError> {
    if request.job_title.trim().is_empty() {
        return Err(AppError::Validation("Job title is required".to_string()));
    }

    info!("Generating JD for: {}", request.job_title);

    let system = generation_system_prompt();
    let message = build_generation_message(request);
    let outcome = request_typed::<AnalysisResult>(
        gateway,
        ChatRequest::new(&message, &system, GENERATION_TEMPERATURE),
        GENERATED_JD_KEY,
    )
    .await;

    let outcome = match outcome {
        AiOutcome::Ok(result) if result.generated_jd.is_none() => {
            AiOutcome::ParseFailed(NormalizeError::MissingKey(GENERATED_JD_KEY))
        }
        other => other,
    };

    Ok(outcome.or_fallback("generate", || fallback::generation_result(request)))
}

/// Scores an existing job description.
///
/// Fails only when `jd_text` is blank; no gateway call is made in that case.
pub async fn analyze_text(gateway: &dyn AiGateway, jd_text: &str) -> Result<AnalysisResult, AppError> {
    if jd_text.trim().is_empty() {
        return Err(AppError::Validation(
            "Job description text is required".to_string(),
        ));
    }

    info!("Analyzing JD ({} chars)", jd_text.chars().count());

    let system = analysis_system_prompt();
    let message = build_analysis_message(jd_text);
    let outcome = request_typed::<AnalysisResult>(
        gateway,
        ChatRequest::new(&message, &system, ANALYSIS_TEMPERATURE),
        OVERALL_SCORE_KEY,
    )
    .await;

    Ok(outcome.or_fallback("analyze", || fallback::analysis_result(jd_text)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use crate::generation::models::CATEGORY_NAMES;

    /// Returns a fixed reply (or error) and records each call.
    struct StubGateway {
        reply: Option<String>,
        calls: AtomicUsize,
        temperatures: Mutex<Vec<f32>>,
    }

    impl StubGateway {
        fn replying(reply: impl Into<String>) -> Self {
            Self {
                reply: Some(reply.into()),
                calls: AtomicUsize::new(0),
                temperatures: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: None,
                calls: AtomicUsize::new(0),
                temperatures: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AiGateway for StubGateway {
        async fn chat(&self, request: ChatRequest<'_>) -> Result<String, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.temperatures.lock().unwrap().push(request.temperature);
            self.reply.clone().ok_or(GatewayError::Api {
                status: 503,
                message: "upstream unavailable".to_string(),
            })
        }
    }

    fn assert_complete_shape(result: &AnalysisResult) {
        let value = serde_json::to_value(result).unwrap();
        let scores = value["categoryScores"].as_object().unwrap();
        assert_eq!(scores.len(), 10);
        for name in CATEGORY_NAMES {
            assert!(scores.contains_key(name), "missing category {name}");
        }
        for bucket in ["critical", "recommended", "niceToHave"] {
            assert!(value["suggestions"][bucket].is_array(), "missing bucket {bucket}");
        }
    }

    fn assert_complete_jd(result: &AnalysisResult) {
        let jd = serde_json::to_value(result.generated_jd.as_ref().unwrap()).unwrap();
        for key in [
            "title",
            "summary",
            "responsibilities",
            "minimumQualifications",
            "preferredQualifications",
            "workingConditions",
            "benefits",
        ] {
            assert!(jd.get(key).is_some(), "generatedJD missing {key}");
        }
    }

    fn request(title: &str) -> GenerationRequest {
        GenerationRequest {
            job_title: title.to_string(),
            ..Default::default()
        }
    }

    fn ai_generation_reply() -> Value {
        json!({
            "generatedJD": {
                "title": "Head Barista",
                "summary": "Lead our espresso bar.",
                "responsibilities": ["Train baristas", "Dial in grinders"],
                "minimumQualifications": ["2 years cafe experience"],
                "preferredQualifications": [],
                "workingConditions": "On-site, weekends",
                "benefits": "Free coffee"
            },
            "overallScore": 88,
            "categoryScores": {"jobTitle": 9, "roleSummary": 8}
        })
    }

    #[tokio::test]
    async fn test_generate_accepts_fenced_ai_reply() {
        let reply = format!("Here you go:\n```json\n{}\n```", ai_generation_reply());
        let gateway = StubGateway::replying(reply);

        let result = generate_from_fields(&gateway, &request("Barista")).await.unwrap();

        assert_eq!(result.overall_score, 88);
        let jd = result.generated_jd.as_ref().unwrap();
        assert_eq!(jd.title, "Head Barista");
        assert!(jd.preferred_qualifications.is_empty());
        assert_complete_shape(&result);
        assert_complete_jd(&result);
        assert_eq!(*gateway.temperatures.lock().unwrap(), vec![GENERATION_TEMPERATURE]);
    }

    #[tokio::test]
    async fn test_generate_falls_back_when_generated_jd_missing() {
        let gateway = StubGateway::replying(r#"{"overallScore": 90}"#);

        let result = generate_from_fields(&gateway, &request("Barista")).await.unwrap();

        assert_eq!(result.overall_score, 85);
        let jd = result.generated_jd.as_ref().unwrap();
        assert_eq!(jd.responsibilities.len(), 6);
        assert_eq!(jd.minimum_qualifications.len(), 5);
        assert_eq!(jd.preferred_qualifications.len(), 3);
    }

    #[tokio::test]
    async fn test_generate_falls_back_on_prose_reply() {
        let gateway = StubGateway::replying("Sorry, I can't produce JSON today.");
        let result = generate_from_fields(&gateway, &request("Nurse")).await.unwrap();
        assert_eq!(result.generated_jd.as_ref().unwrap().title, "Nurse");
        assert_complete_shape(&result);
    }

    #[tokio::test]
    async fn test_generate_falls_back_on_gateway_failure() {
        let gateway = StubGateway::failing();
        let result = generate_from_fields(&gateway, &request("Barista")).await.unwrap();

        assert_eq!(gateway.calls(), 1);
        assert_eq!(result, fallback::generation_result(&request("Barista")));
        assert_complete_shape(&result);
        assert_complete_jd(&result);
    }

    #[tokio::test]
    async fn test_generate_requires_job_title() {
        let gateway = StubGateway::replying(ai_generation_reply().to_string());
        let err = generate_from_fields(&gateway, &request("   ")).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_generate_shape_holds_for_many_inputs() {
        let replies = [
            None,
            Some("{}".to_string()),
            Some(r#"{"generatedJD": {}}"#.to_string()),
            Some(r#"{"generatedJD": {"title": 5}}"#.to_string()),
            Some(ai_generation_reply().to_string()),
        ];
        for reply in replies {
            let gateway = match reply {
                Some(text) => StubGateway::replying(text),
                None => StubGateway::failing(),
            };
            for title in ["Barista", "Staff Software Engineer", "Ürün Müdürü"] {
                let result = generate_from_fields(&gateway, &request(title)).await.unwrap();
                assert_complete_shape(&result);
                assert_complete_jd(&result);
            }
        }
    }

    #[tokio::test]
    async fn test_analyze_accepts_ai_reply() {
        let gateway = StubGateway::replying(
            r#"{"overallScore": 74, "suggestions": {"critical": [{"text": "Clarify title", "category": "jobTitle", "action": "fix"}]}, "summary": "Decent"}"#,
        );

        let result = analyze_text(&gateway, "Barista wanted").await.unwrap();

        assert_eq!(result.overall_score, 74);
        assert_eq!(result.suggestions.critical.len(), 1);
        assert!(result.suggestions.recommended.is_empty());
        assert_eq!(result.summary.as_deref(), Some("Decent"));
        assert_complete_shape(&result);
        assert_eq!(*gateway.temperatures.lock().unwrap(), vec![ANALYSIS_TEMPERATURE]);
    }

    #[tokio::test]
    async fn test_analyze_falls_back_on_zero_score() {
        let gateway = StubGateway::replying(r#"{"overallScore": 0}"#);
        let text = "We need a Devloper with 5 years experiance.";

        let result = analyze_text(&gateway, text).await.unwrap();

        assert_eq!(result, fallback::analysis_result(text));
    }

    #[tokio::test]
    async fn test_analyze_falls_back_on_gateway_failure() {
        let gateway = StubGateway::failing();
        let result = analyze_text(&gateway, "We need a Devloper with 5 years experiance.")
            .await
            .unwrap();

        assert_eq!(result.overall_score, 60);
        assert_eq!(result.category_scores.language_clarity, 6);
        assert_eq!(result.suggestions.critical.len(), 1);
        assert_complete_shape(&result);
    }

    #[tokio::test]
    async fn test_analyze_empty_text_is_rejected_without_calling_gateway() {
        let gateway = StubGateway::replying(r#"{"overallScore": 80}"#);

        for text in ["", "  \n\t"] {
            let err = analyze_text(&gateway, text).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_analysis_with_null_fields_is_kept() {
        let reply = json!({
            "overallScore": 78,
            "suggestions": {
                "critical": null,
                "recommended": [{"text": "State the pay range", "reasoning": null}]
            },
            "matchabilityHints": {"skillsCoverage": null},
            "summary": "Clear but thin on benefits."
        });
        let gateway = StubGateway::replying(reply.to_string());

        let result = analyze_text(&gateway, "Barista wanted").await.unwrap();

        assert_eq!(result.overall_score, 78);
        assert_eq!(result.summary.as_deref(), Some("Clear but thin on benefits."));
        assert_eq!(result.suggestions.recommended[0].text, "State the pay range");
        assert_complete_shape(&result);
    }
}
