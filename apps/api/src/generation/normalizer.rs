//! Response Normalizer: coerces a loosely formatted AI reply into a JSON object.
//!
//! Algorithm: trim, drop every ```` ```json ```` / ```` ``` ```` fence marker, take
//! the text from the first `{` to the last `}` inclusive, parse strictly.
//! No brace balancing is attempted: a stray `}` in trailing prose after the
//! real object makes the slice unparsable, and the caller falls back.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

const FENCE: &str = "```";
const FENCE_TAG: &str = "json";

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("no JSON object found in reply")]
    NoObject,

    #[error("reply is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("reply object lacks a truthy `{0}` key")]
    MissingKey(&'static str),

    #[error("reply object has the wrong shape: {0}")]
    Shape(#[source] serde_json::Error),
}

/// Extracts the single JSON object embedded in `raw`.
pub fn extract_json_object(raw: &str) -> Result<Value, NormalizeError> {
    let cleaned = strip_code_fences(raw.trim());

    let start = cleaned.find('{').ok_or(NormalizeError::NoObject)?;
    let end = cleaned.rfind('}').ok_or(NormalizeError::NoObject)?;
    if end < start {
        return Err(NormalizeError::NoObject);
    }

    serde_json::from_str(&cleaned[start..=end]).map_err(NormalizeError::InvalidJson)
}

/// Extracts the embedded object, requires `required_key` to be truthy, then
/// decodes it into `T`.
pub fn normalize<T: DeserializeOwned>(
    raw: &str,
    required_key: &'static str,
) -> Result<T, NormalizeError> {
    let object = extract_json_object(raw)?;
    if !is_truthy(object.get(required_key)) {
        return Err(NormalizeError::MissingKey(required_key));
    }
    serde_json::from_value(object).map_err(NormalizeError::Shape)
}

/// `null`, `false`, `0` and `""` are falsy; everything else, including empty
/// arrays and objects, is truthy.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// Removes every fence marker, wherever it occurs. A `json` tag directly after
/// a marker is matched case-insensitively and removed with it.
fn strip_code_fences(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find(FENCE) {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + FENCE.len()..];
        if rest
            .get(..FENCE_TAG.len())
            .is_some_and(|tag| tag.eq_ignore_ascii_case(FENCE_TAG))
        {
            rest = &rest[FENCE_TAG.len()..];
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::generation::models::AnalysisResult;

    #[test]
    fn test_plain_object() {
        let value = extract_json_object(r#"{"overallScore": 72}"#).unwrap();
        assert_eq!(value, json!({"overallScore": 72}));
    }

    #[test]
    fn test_fenced_object_with_json_tag() {
        let raw = "```json\n{\"a\": {\"b\": [1, 2]}}\n```";
        assert_eq!(extract_json_object(raw).unwrap(), json!({"a": {"b": [1, 2]}}));
    }

    #[test]
    fn test_uppercase_tag_and_surrounding_prose() {
        let raw = "Sure! Here is the analysis:\n```JSON\n{\"overallScore\": 64, \"summary\": \"ok\"}\n```\nLet me know if you need more.";
        assert_eq!(
            extract_json_object(raw).unwrap(),
            json!({"overallScore": 64, "summary": "ok"})
        );
    }

    #[test]
    fn test_untagged_fences() {
        let raw = "```\n{\"k\": \"v\"}\n```";
        assert_eq!(extract_json_object(raw).unwrap(), json!({"k": "v"}));
    }

    #[test]
    fn test_braces_inside_strings_survive() {
        let raw = r#"Result: {"text": "use {placeholders} carefully"} done"#;
        assert_eq!(
            extract_json_object(raw).unwrap(),
            json!({"text": "use {placeholders} carefully"})
        );
    }

    #[test]
    fn test_no_braces_fails() {
        assert!(matches!(
            extract_json_object("I cannot help with that."),
            Err(NormalizeError::NoObject)
        ));
    }

    #[test]
    fn test_closing_brace_before_opening_fails() {
        assert!(matches!(
            extract_json_object("} nothing here {"),
            Err(NormalizeError::NoObject)
        ));
    }

    #[test]
    fn test_stray_brace_in_trailing_prose_is_a_known_failure() {
        let raw = r#"{"overallScore": 70} (scores use the {0-10} scale}"#;
        assert!(matches!(
            extract_json_object(raw),
            Err(NormalizeError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_multibyte_text_after_fence_does_not_panic() {
        let raw = "```abé{\"x\": 1}```";
        assert_eq!(extract_json_object(raw).unwrap(), json!({"x": 1}));
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(None));
        assert!(!is_truthy(Some(&json!(null))));
        assert!(!is_truthy(Some(&json!(false))));
        assert!(!is_truthy(Some(&json!(0))));
        assert!(!is_truthy(Some(&json!(0.0))));
        assert!(!is_truthy(Some(&json!(""))));
        assert!(is_truthy(Some(&json!(1))));
        assert!(is_truthy(Some(&json!("x"))));
        assert!(is_truthy(Some(&json!({}))));
        assert!(is_truthy(Some(&json!([]))));
    }

    #[test]
    fn test_normalize_requires_key() {
        let err = normalize::<AnalysisResult>(r#"{"overallScore": 0}"#, "overallScore").unwrap_err();
        assert!(matches!(err, NormalizeError::MissingKey("overallScore")));

        let err = normalize::<AnalysisResult>(r#"{"overallScore": 80}"#, "generatedJD").unwrap_err();
        assert!(matches!(err, NormalizeError::MissingKey("generatedJD")));
    }

    #[test]
    fn test_normalize_rejects_wrong_shape() {
        let raw = r#"{"overallScore": 80, "generatedJD": "a plain string"}"#;
        assert!(matches!(
            normalize::<AnalysisResult>(raw, "generatedJD"),
            Err(NormalizeError::Shape(_))
        ));
    }

    #[test]
    fn test_normalize_decodes_typed_result() {
        let raw = "```json\n{\"overallScore\": 77, \"categoryScores\": {\"jobTitle\": 9}}\n```";
        let result: AnalysisResult = normalize(raw, "overallScore").unwrap();
        assert_eq!(result.overall_score, 77);
        assert_eq!(result.category_scores.job_title, 9);
        assert!(result.suggestions.critical.is_empty());
    }
}
