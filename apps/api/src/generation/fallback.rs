//! Fallback Synthesizer: deterministic, network-free substitute results.
//!
//! Used whenever the AI path fails or returns unusable output. Both builders
//! are pure functions of their input and always produce a complete
//! `AnalysisResult`, so callers treat AI and fallback results identically.

use serde_json::Value;

use crate::generation::models::{
    non_blank, AnalysisResult, CategoryScores, GeneratedContent, GenerationRequest,
    MatchabilityHints, Suggestion, Suggestions,
};

const MAX_RESPONSIBILITIES: usize = 6;
const MAX_MINIMUM_QUALIFICATIONS: usize = 5;
const MAX_PREFERRED_QUALIFICATIONS: usize = 4;

const FALLBACK_GENERATION_SCORE: u8 = 85;

const DEFAULT_LOCATION: &str = "Various locations";
const DEFAULT_WORK_CONDITION: &str = "Flexible";
const DEFAULT_EMPLOYMENT_TYPE: &str = "Full-time";

const BENEFITS_TEXT: &str = "We offer a competitive compensation package including health \
    insurance, retirement plans, paid time off, professional development opportunities, and a \
    collaborative work environment that values work-life balance.";

/// Lowercase substrings that mark a recognisable role title.
const ROLE_WORDS: [&str; 3] = ["engineer", "manager", "developer"];
const RESPONSIBILITY_WORDS: [&str; 2] = ["responsibilities", "duties"];
const QUALIFICATION_WORDS: [&str; 2] = ["qualification", "requirement"];
const KNOWN_MISSPELLINGS: [&str; 2] = ["devloper", "experiance"];

const ANALYSIS_SUMMARY: &str = "Analysis completed. The job description covers basic elements \
    but could benefit from more specific details about responsibilities, qualifications, and \
    benefits to attract top candidates.";

// ────────────────────────────────────────────────────────────────────────────
// Shared list splitting
// ────────────────────────────────────────────────────────────────────────────

/// Splits free text on commas, periods and newlines, trims each piece, drops
/// empty pieces and keeps at most `max` items. Returns `generic` when the
/// text is absent or yields no items.
pub fn split_or_generic(text: Option<&str>, max: usize, generic: Vec<String>) -> Vec<String> {
    let items: Vec<String> = text
        .unwrap_or_default()
        .split([',', '.', '\n'])
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .take(max)
        .map(String::from)
        .collect();

    if items.is_empty() {
        generic
    } else {
        items
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn generic_responsibilities(job_title: &str) -> Vec<String> {
    vec![
        format!(
            "Perform {} duties with high quality standards",
            job_title.to_lowercase()
        ),
        "Collaborate effectively with team members and stakeholders".to_string(),
        "Contribute to project planning and execution".to_string(),
        "Maintain documentation and report on progress".to_string(),
        "Participate in continuous improvement initiatives".to_string(),
        "Ensure compliance with company policies and procedures".to_string(),
    ]
}

fn generic_minimum_qualifications() -> Vec<String> {
    owned(&[
        "Proven experience in relevant field",
        "Strong analytical and problem-solving abilities",
        "Excellent communication skills (written and verbal)",
        "Ability to work independently and as part of a team",
        "Bachelor's degree or equivalent experience",
    ])
}

fn generic_preferred_qualifications() -> Vec<String> {
    owned(&[
        "Additional certifications in the field",
        "Experience with industry-standard tools",
        "Demonstrated leadership capabilities",
    ])
}

fn suggestion(
    text: impl Into<String>,
    category: &str,
    action: &str,
    suggested_text: Option<&str>,
    reasoning: &str,
) -> Suggestion {
    Suggestion {
        text: text.into(),
        category: category.to_string(),
        action: action.to_string(),
        current_text: None,
        suggested_text: suggested_text.map(String::from),
        reasoning: reasoning.to_string(),
    }
}

fn hint(flag: bool, yes: &str, no: &str) -> String {
    let text = if flag { yes } else { no };
    text.to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Generation fallback
// ────────────────────────────────────────────────────────────────────────────

/// Builds the job description itself from the form fields.
pub fn generated_content(request: &GenerationRequest) -> GeneratedContent {
    let job_title = request.job_title.as_str();
    let location = non_blank(&request.location).unwrap_or(DEFAULT_LOCATION);
    let work_condition = non_blank(&request.work_condition).unwrap_or(DEFAULT_WORK_CONDITION);
    let employment_type = non_blank(&request.employment_type).unwrap_or(DEFAULT_EMPLOYMENT_TYPE);

    GeneratedContent {
        title: job_title.to_string(),
        summary: format!(
            "We are seeking a talented {job_title} to join our dynamic team. This role offers an \
             excellent opportunity to apply your skills and grow professionally in a supportive \
             environment. You will work on meaningful projects that make a real impact."
        ),
        responsibilities: split_or_generic(
            non_blank(&request.responsibilities),
            MAX_RESPONSIBILITIES,
            generic_responsibilities(job_title),
        ),
        minimum_qualifications: split_or_generic(
            non_blank(&request.minimum_requirement),
            MAX_MINIMUM_QUALIFICATIONS,
            generic_minimum_qualifications(),
        ),
        preferred_qualifications: split_or_generic(
            non_blank(&request.preferred_skills),
            MAX_PREFERRED_QUALIFICATIONS,
            generic_preferred_qualifications(),
        ),
        working_conditions: format!(
            "{work_condition} work arrangement. {location}. {employment_type} position with \
             standard business hours. Occasional flexibility may be required based on project needs."
        ),
        benefits: Value::String(BENEFITS_TEXT.to_string()),
    }
}

/// Full generation-flow result wrapping [`generated_content`].
pub fn generation_result(request: &GenerationRequest) -> AnalysisResult {
    let job_title = request.job_title.as_str();

    AnalysisResult {
        overall_score: FALLBACK_GENERATION_SCORE,
        category_scores: CategoryScores {
            job_title: 9,
            role_summary: 8,
            reporting_structure: 7,
            responsibilities: 8,
            qualifications: 8,
            company_culture: 7,
            benefits: 7,
            working_conditions: 8,
            language_clarity: 9,
            bias_compliance: 10,
        },
        suggestions: Suggestions {
            critical: Vec::new(),
            recommended: vec![
                suggestion(
                    format!(
                        "Add specific technical skills or certifications required for {job_title} role"
                    ),
                    "qualifications",
                    "add",
                    Some("List specific tools, technologies, or certifications needed"),
                    "Helps attract candidates with the right expertise",
                ),
                suggestion(
                    "Include information about company culture and values",
                    "companyCulture",
                    "add",
                    Some("Describe your team environment, company mission, and core values"),
                    "Cultural fit is important for long-term success",
                ),
                suggestion(
                    "Specify years of experience required",
                    "qualifications",
                    "add",
                    Some("e.g., \"3-5 years of experience in [field]\""),
                    "Helps candidates self-assess fit for the role",
                ),
            ],
            nice_to_have: vec![suggestion(
                "Consider adding salary range for transparency",
                "benefits",
                "add",
                Some("Competitive salary range: $X - $Y based on experience"),
                "Salary transparency increases quality applications by 30%",
            )],
        },
        matchability_hints: MatchabilityHints {
            title_clarity: "good".to_string(),
            skills_coverage: "partial - add more specific requirements".to_string(),
            location_specificity: "good".to_string(),
            seniority_level: "needs clarification - specify experience level".to_string(),
        },
        summary: None,
        generated_jd: Some(generated_content(request)),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Analysis fallback
// ────────────────────────────────────────────────────────────────────────────

/// Outcome of the four substring checks run against a raw job description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSignals {
    pub has_role_title: bool,
    pub has_responsibilities: bool,
    pub has_qualifications: bool,
    pub has_misspellings: bool,
}

impl TextSignals {
    /// All checks are case-insensitive substring matches.
    pub fn detect(jd_text: &str) -> Self {
        let lowered = jd_text.to_lowercase();
        let contains_any = |words: &[&str]| words.iter().any(|w| lowered.contains(w));

        Self {
            has_role_title: contains_any(&ROLE_WORDS),
            has_responsibilities: contains_any(&RESPONSIBILITY_WORDS),
            has_qualifications: contains_any(&QUALIFICATION_WORDS),
            has_misspellings: contains_any(&KNOWN_MISSPELLINGS),
        }
    }

    fn covers_basics(&self) -> bool {
        self.has_role_title && self.has_responsibilities && self.has_qualifications
    }
}

/// Basic assessment derived only from the raw text.
pub fn analysis_result(jd_text: &str) -> AnalysisResult {
    let signals = TextSignals::detect(jd_text);
    let pick = |flag: bool, yes: u8, no: u8| if flag { yes } else { no };

    let critical = if signals.has_misspellings {
        vec![suggestion(
            "Fix spelling errors in the job description",
            "languageClarity",
            "fix",
            None,
            "Spelling errors damage company credibility",
        )]
    } else {
        Vec::new()
    };

    AnalysisResult {
        overall_score: if signals.covers_basics() { 70 } else { 60 },
        category_scores: CategoryScores {
            job_title: pick(signals.has_role_title, 8, 6),
            role_summary: 7,
            reporting_structure: 6,
            responsibilities: pick(signals.has_responsibilities, 7, 5),
            qualifications: pick(signals.has_qualifications, 7, 5),
            company_culture: 6,
            benefits: 6,
            working_conditions: 6,
            language_clarity: pick(signals.has_misspellings, 6, 8),
            bias_compliance: 9,
        },
        suggestions: Suggestions {
            critical,
            recommended: vec![
                suggestion(
                    "Add more specific details about day-to-day responsibilities",
                    "responsibilities",
                    "add",
                    Some("Break down the role into 6-8 specific daily or weekly tasks"),
                    "Specific responsibilities help candidates understand the role better",
                ),
                suggestion(
                    "Include information about required tools and technologies",
                    "qualifications",
                    "add",
                    Some("List specific software, platforms, or systems candidates should know"),
                    "Technical specificity improves candidate quality",
                ),
                suggestion(
                    "Add details about compensation and benefits",
                    "benefits",
                    "add",
                    Some("Include salary range, health benefits, PTO, and unique perks"),
                    "Transparency about compensation increases application rates",
                ),
            ],
            nice_to_have: vec![suggestion(
                "Consider adding information about company culture",
                "companyCulture",
                "add",
                Some("Describe the team environment, values, and what makes your company unique"),
                "Culture fit is important for employee retention",
            )],
        },
        matchability_hints: MatchabilityHints {
            title_clarity: hint(signals.has_role_title, "good", "needs_improvement"),
            skills_coverage: hint(signals.has_qualifications, "partial", "missing"),
            location_specificity: "needs_improvement".to_string(),
            seniority_level: "unclear".to_string(),
        },
        summary: Some(ANALYSIS_SUMMARY.to_string()),
        generated_jd: None,
    }
}
