//! Request and result contract for job-description generation and analysis.
//!
//! Every container field carries a serde default, so any JSON object the AI
//! returns deserializes into a complete shape: all ten category scores and all
//! three suggestion buckets are always present, whatever the model omitted.

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Wire names of the ten category scores, in display order.
#[cfg(test)]
pub const CATEGORY_NAMES: [&str; 10] = [
    "jobTitle",
    "roleSummary",
    "reportingStructure",
    "responsibilities",
    "qualifications",
    "companyCulture",
    "benefits",
    "workingConditions",
    "languageClarity",
    "biasCompliance",
];

const MAX_OVERALL_SCORE: u8 = 100;
const MAX_CATEGORY_SCORE: u8 = 10;

// ────────────────────────────────────────────────────────────────────────────
// Requests
// ────────────────────────────────────────────────────────────────────────────

/// Smart-builder form input. Only `job_title` is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub job_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Remote / Hybrid / On-site, free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_condition: Option<String>,
    /// Full-time / Part-time / Contract / Internship, free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsibilities: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_requirement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_skills: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
}

/// Manual-entry input: an existing job description to score.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub jd_text: String,
}

/// Returns the trimmed field value, or `None` when it is absent or blank.
pub fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Results
// ────────────────────────────────────────────────────────────────────────────

/// A generated job description. Arrays may be empty but every key exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratedContent {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(deserialize_with = "null_as_default")]
    pub responsibilities: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub minimum_qualifications: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub preferred_qualifications: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub working_conditions: String,
    /// Opaque: plain text from generation, occasionally structured after edits.
    #[serde(deserialize_with = "benefits_or_empty")]
    pub benefits: Value,
}

impl Default for GeneratedContent {
    fn default() -> Self {
        Self {
            title: String::new(),
            summary: String::new(),
            responsibilities: Vec::new(),
            minimum_qualifications: Vec::new(),
            preferred_qualifications: Vec::new(),
            working_conditions: String::new(),
            benefits: Value::String(String::new()),
        }
    }
}

/// Ten fixed quality dimensions, each scored 0–10.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryScores {
    #[serde(deserialize_with = "category_score")]
    pub job_title: u8,
    #[serde(deserialize_with = "category_score")]
    pub role_summary: u8,
    #[serde(deserialize_with = "category_score")]
    pub reporting_structure: u8,
    #[serde(deserialize_with = "category_score")]
    pub responsibilities: u8,
    #[serde(deserialize_with = "category_score")]
    pub qualifications: u8,
    #[serde(deserialize_with = "category_score")]
    pub company_culture: u8,
    #[serde(deserialize_with = "category_score")]
    pub benefits: u8,
    #[serde(deserialize_with = "category_score")]
    pub working_conditions: u8,
    #[serde(deserialize_with = "category_score")]
    pub language_clarity: u8,
    #[serde(deserialize_with = "category_score")]
    pub bias_compliance: u8,
}

/// A single improvement suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Suggestion {
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,
    /// A category score name, or `"general"`.
    #[serde(deserialize_with = "category_or_general")]
    pub category: String,
    /// Free-text verb, e.g. "add" or "fix".
    #[serde(deserialize_with = "null_as_default")]
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_text: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub reasoning: String,
}

impl Default for Suggestion {
    fn default() -> Self {
        Self {
            text: String::new(),
            category: "general".to_string(),
            action: String::new(),
            current_text: None,
            suggested_text: None,
            reasoning: String::new(),
        }
    }
}

/// Suggestions grouped by priority bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Suggestions {
    #[serde(deserialize_with = "null_as_default")]
    pub critical: Vec<Suggestion>,
    #[serde(deserialize_with = "null_as_default")]
    pub recommended: Vec<Suggestion>,
    #[serde(deserialize_with = "null_as_default")]
    pub nice_to_have: Vec<Suggestion>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchabilityHints {
    #[serde(deserialize_with = "null_as_default")]
    pub title_clarity: String,
    #[serde(deserialize_with = "null_as_default")]
    pub skills_coverage: String,
    #[serde(deserialize_with = "null_as_default")]
    pub location_specificity: String,
    #[serde(deserialize_with = "null_as_default")]
    pub seniority_level: String,
}

/// Scored assessment of a job description. Identical in shape whether the AI
/// produced it or the fallback synthesizer did.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisResult {
    #[serde(deserialize_with = "overall_score")]
    pub overall_score: u8,
    #[serde(deserialize_with = "null_as_default")]
    pub category_scores: CategoryScores,
    #[serde(deserialize_with = "null_as_default")]
    pub suggestions: Suggestions,
    #[serde(deserialize_with = "null_as_default")]
    pub matchability_hints: MatchabilityHints,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Present only for the generation flow.
    #[serde(rename = "generatedJD", skip_serializing_if = "Option::is_none")]
    pub generated_jd: Option<GeneratedContent>,
}

// ────────────────────────────────────────────────────────────────────────────
// Lenient decoding
// ────────────────────────────────────────────────────────────────────────────

/// An explicit `null` decodes the same as an omitted key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn category_or_general<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(|| "general".to_string()))
}

fn benefits_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Value, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Value::String(String::new())),
        other => Ok(other),
    }
}

fn overall_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    lenient_score(deserializer, MAX_OVERALL_SCORE)
}

fn category_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    lenient_score(deserializer, MAX_CATEGORY_SCORE)
}

/// Accepts integers, floats (rounded) and numeric strings, clamped to `0..=max`.
/// `null` scores 0.
fn lenient_score<'de, D: Deserializer<'de>>(deserializer: D, max: u8) -> Result<u8, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let number = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Null => Some(0.0),
        _ => None,
    };
    match number {
        Some(n) if n.is_finite() => Ok(n.round().clamp(0.0, f64::from(max)) as u8),
        _ => Err(de::Error::custom(format!(
            "expected a numeric score, got {value}"
        ))),
    }
}
