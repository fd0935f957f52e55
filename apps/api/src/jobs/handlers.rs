//! Axum route handlers for saved job postings.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::errors::{AppError, AppJson};
use crate::models::job::{JobPatch, JobRecord, NewJob};
use crate::models::session::Session;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub success: bool,
    pub job: JobRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub success: bool,
    pub jobs: Vec<JobRecord>,
    pub count: usize,
}

fn job_response(job: JobRecord, message: &'static str) -> Json<JobResponse> {
    Json(JobResponse {
        success: true,
        job,
        message: Some(message),
    })
}

fn not_found() -> AppError {
    AppError::NotFound("Job not found".to_string())
}

/// POST /api/jobs
///
/// The owner is the body `email`, else the session email. A generated
/// description may be nested as `generatedJD` or spread into the body.
pub async fn handle_create_job(
    State(state): State<AppState>,
    session: Option<Session>,
    AppJson(body): AppJson<Map<String, Value>>,
) -> Result<Json<JobResponse>, AppError> {
    let job = NewJob::from_body(body).map_err(|e| AppError::Validation(e.to_string()))?;
    let owner = job
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .or_else(|| session.map(|s| s.email));

    let Some(owner) = owner.filter(|_| !job.details.job_title.trim().is_empty()) else {
        return Err(AppError::Validation(
            "Email and job title are required".to_string(),
        ));
    };

    let record = state.store.jobs.create(job, owner, Utc::now()).await?;
    info!("Created job {} for {}", record.id, record.email);
    Ok(job_response(record, "Job posted successfully"))
}

/// GET /api/jobs?email=
///
/// Filters by the query email, else the session email. Lists every job when
/// neither is present.
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    session: Option<Session>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<JobListResponse>, AppError> {
    let owner = query
        .email
        .filter(|e| !e.trim().is_empty())
        .or_else(|| session.map(|s| s.email));

    let jobs = state.store.jobs.list(owner.as_deref()).await?;
    Ok(Json(JobListResponse {
        success: true,
        count: jobs.len(),
        jobs,
    }))
}

/// GET /api/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JobResponse>, AppError> {
    let job = state.store.jobs.get(&id).await?.ok_or_else(not_found)?;
    Ok(Json(JobResponse {
        success: true,
        job,
        message: None,
    }))
}

/// PUT /api/jobs/:id
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(patch): AppJson<JobPatch>,
) -> Result<Json<JobResponse>, AppError> {
    let job = state
        .store
        .jobs
        .update(&id, patch, Utc::now())
        .await?
        .ok_or_else(not_found)?;
    Ok(job_response(job, "Job updated successfully"))
}

/// DELETE /api/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JobResponse>, AppError> {
    let job = state.store.jobs.delete(&id).await?.ok_or_else(not_found)?;
    info!("Deleted job {id}");
    Ok(job_response(job, "Job deleted successfully"))
}
