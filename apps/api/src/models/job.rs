use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::generation::models::{AnalysisResult, GeneratedContent, GenerationRequest};

/// Which flow produced the posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    SmartBuilder,
    ManualEntry,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Active,
    Draft,
}

/// A saved job posting, one element of `jobs.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    /// Creation time in epoch milliseconds, as a decimal string.
    pub id: String,
    /// Owner.
    pub email: String,
    /// The free-text fields the employer submitted.
    #[serde(flatten)]
    pub details: GenerationRequest,
    /// Original text of a manual-entry posting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
    #[serde(rename = "generatedJD", default, skip_serializing_if = "Option::is_none")]
    pub generated_jd: Option<GeneratedContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisResult>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<JobType>,
    #[serde(default)]
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// `GeneratedContent` keys that never name a form field. Any of them at the top
/// level of a job body means the client spread the generated description into it.
const SPREAD_CONTENT_KEYS: [&str; 6] = [
    "title",
    "summary",
    "minimumQualifications",
    "preferredQualifications",
    "workingConditions",
    "benefits",
];
/// Form free text, or the generated list when spread over it.
const RESPONSIBILITIES_KEY: &str = "responsibilities";

/// Body of `POST /api/jobs`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub details: GenerationRequest,
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(rename = "generatedJD", default)]
    pub generated_jd: Option<GeneratedContent>,
    #[serde(default)]
    pub analysis: Option<AnalysisResult>,
    #[serde(rename = "type", default)]
    pub job_type: Option<JobType>,
    #[serde(default)]
    pub status: Option<JobStatus>,
}

impl NewJob {
    /// Decodes a job body. A generated description spread into the top level
    /// is collected into `generated_jd` unless a nested `generatedJD` is given.
    pub fn from_body(mut body: Map<String, Value>) -> Result<Self, serde_json::Error> {
        let mut content = Map::new();
        for key in SPREAD_CONTENT_KEYS {
            if let Some(value) = body.remove(key) {
                content.insert(key.to_string(), value);
            }
        }
        if body.get(RESPONSIBILITIES_KEY).is_some_and(Value::is_array) {
            if let Some(list) = body.remove(RESPONSIBILITIES_KEY) {
                content.insert(RESPONSIBILITIES_KEY.to_string(), list);
            }
        }

        let mut job: NewJob = serde_json::from_value(Value::Object(body))?;
        if job.generated_jd.is_none() && !content.is_empty() {
            job.generated_jd = Some(serde_json::from_value(Value::Object(content))?);
        }
        Ok(job)
    }

    pub fn into_record(self, id: String, email: String, now: DateTime<Utc>) -> JobRecord {
        JobRecord {
            id,
            email,
            details: self.details,
            job_description: self.job_description,
            generated_jd: self.generated_jd,
            analysis: self.analysis,
            job_type: self.job_type,
            status: self.status.unwrap_or_default(),
            created_at: now,
            updated_at: None,
        }
    }
}

/// Body of `PUT /api/jobs/:id`. Supplied fields replace the stored ones;
/// absent fields are left alone. Identity fields (id, owner, creation time)
/// cannot be patched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobPatch {
    pub job_title: Option<String>,
    pub location: Option<String>,
    pub work_condition: Option<String>,
    pub employment_type: Option<String>,
    pub responsibilities: Option<String>,
    pub minimum_requirement: Option<String>,
    pub preferred_skills: Option<String>,
    pub requirements: Option<String>,
    pub job_description: Option<String>,
    #[serde(rename = "generatedJD")]
    pub generated_jd: Option<GeneratedContent>,
    pub analysis: Option<AnalysisResult>,
    #[serde(rename = "type")]
    pub job_type: Option<JobType>,
    pub status: Option<JobStatus>,
}

impl JobPatch {
    pub fn apply(self, job: &mut JobRecord, now: DateTime<Utc>) {
        let details = &mut job.details;
        if let Some(title) = self.job_title {
            details.job_title = title;
        }
        replace(&mut details.location, self.location);
        replace(&mut details.work_condition, self.work_condition);
        replace(&mut details.employment_type, self.employment_type);
        replace(&mut details.responsibilities, self.responsibilities);
        replace(&mut details.minimum_requirement, self.minimum_requirement);
        replace(&mut details.preferred_skills, self.preferred_skills);
        replace(&mut details.requirements, self.requirements);

        replace(&mut job.job_description, self.job_description);
        replace(&mut job.generated_jd, self.generated_jd);
        replace(&mut job.analysis, self.analysis);
        replace(&mut job.job_type, self.job_type);
        if let Some(status) = self.status {
            job.status = status;
        }
        job.updated_at = Some(now);
    }
}

fn replace<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}
