// All AI prompt constants for the Generation module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::generation::models::{non_blank, GenerationRequest};
use crate::llm_client::prompts::with_json_only;

const PROMPT_DEFAULT_LOCATION: &str = "Location flexible";
const PROMPT_DEFAULT_WORK_TYPE: &str = "To be discussed";
const PROMPT_DEFAULT_EMPLOYMENT: &str = "Full-time";

/// System prompt template for job-description generation.
/// Lists the exact result shape the orchestrator accepts.
pub const GENERATION_SYSTEM_TEMPLATE: &str = r#"You are a professional job description writer. Create a job description. {json_only_instruction}

The JSON must have this structure:
{
  "generatedJD": {
    "title": "job title here",
    "summary": "2-3 sentences about the role",
    "responsibilities": ["task 1", "task 2", "task 3", "task 4", "task 5"],
    "minimumQualifications": ["requirement 1", "requirement 2", "requirement 3", "requirement 4"],
    "preferredQualifications": ["preferred 1", "preferred 2", "preferred 3"],
    "workingConditions": "work arrangement details",
    "benefits": "benefits description"
  },
  "overallScore": 85,
  "categoryScores": {
    "jobTitle": 9,
    "roleSummary": 8,
    "reportingStructure": 7,
    "responsibilities": 8,
    "qualifications": 8,
    "companyCulture": 7,
    "benefits": 7,
    "workingConditions": 8,
    "languageClarity": 9,
    "biasCompliance": 10
  },
  "suggestions": {
    "critical": [],
    "recommended": [{"text": "suggestion text", "category": "general", "action": "add", "suggestedText": "text to add", "reasoning": "why this helps"}],
    "niceToHave": []
  },
  "matchabilityHints": {
    "titleClarity": "good",
    "skillsCoverage": "good",
    "locationSpecificity": "good",
    "seniorityLevel": "clear"
  }
}

Make it professional and relevant for the specific job title provided."#;

/// System prompt template for scoring an existing job description.
pub const ANALYSIS_SYSTEM_TEMPLATE: &str = r#"You are an HR expert. Analyze the job description. {json_only_instruction}

Structure:
{
  "overallScore": 75,
  "categoryScores": {
    "jobTitle": 8,
    "roleSummary": 7,
    "reportingStructure": 7,
    "responsibilities": 7,
    "qualifications": 7,
    "companyCulture": 6,
    "benefits": 6,
    "workingConditions": 7,
    "languageClarity": 8,
    "biasCompliance": 9
  },
  "suggestions": {
    "critical": [{"text": "issue description", "category": "jobTitle", "action": "fix", "currentText": "current", "suggestedText": "better", "reasoning": "why"}],
    "recommended": [{"text": "improvement suggestion", "category": "responsibilities", "action": "add", "suggestedText": "what to add", "reasoning": "benefit"}],
    "niceToHave": []
  },
  "matchabilityHints": {
    "titleClarity": "good or needs_improvement",
    "skillsCoverage": "good or partial",
    "locationSpecificity": "good or needs_improvement",
    "seniorityLevel": "clear or unclear"
  },
  "summary": "Brief overall assessment"
}

Scores: overallScore is 0-100, every categoryScores value is 0-10."#;

pub fn generation_system_prompt() -> String {
    with_json_only(GENERATION_SYSTEM_TEMPLATE)
}

pub fn analysis_system_prompt() -> String {
    with_json_only(ANALYSIS_SYSTEM_TEMPLATE)
}

/// Builds the generation user message. Optional free-text fields are left out
/// when blank; location, work type and employment always appear.
pub fn build_generation_message(request: &GenerationRequest) -> String {
    let mut lines = vec![
        format!(
            "Create a professional job description for: {}",
            request.job_title.trim()
        ),
        String::new(),
        format!(
            "Location: {}",
            non_blank(&request.location).unwrap_or(PROMPT_DEFAULT_LOCATION)
        ),
        format!(
            "Work Type: {}",
            non_blank(&request.work_condition).unwrap_or(PROMPT_DEFAULT_WORK_TYPE)
        ),
        format!(
            "Employment: {}",
            non_blank(&request.employment_type).unwrap_or(PROMPT_DEFAULT_EMPLOYMENT)
        ),
    ];

    let optional = [
        ("Key Duties", &request.responsibilities),
        ("Must Have", &request.minimum_requirement),
        ("Nice to Have", &request.preferred_skills),
        ("Additional Requirements", &request.requirements),
    ];
    for (label, field) in optional {
        if let Some(value) = non_blank(field) {
            lines.push(format!("{label}: {value}"));
        }
    }

    lines.push(String::new());
    lines.push("Return only the JSON object.".to_string());
    lines.join("\n")
}

pub fn build_analysis_message(jd_text: &str) -> String {
    format!("Analyze this job description and provide actionable feedback:\n\n{jd_text}")
}
