//! Axum route handlers for the analyze API.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::errors::{AppError, AppJson};
use crate::extraction::{extract_text, FileKind};
use crate::generation::models::{AnalysisRequest, AnalysisResult, GenerationRequest};
use crate::generation::orchestrator::{analyze_text, generate_from_fields};
use crate::state::AppState;

const UPLOAD_FIELD: &str = "file";

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub analysis: AnalysisResult,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub success: bool,
    pub analysis: AnalysisResult,
    pub original_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub message: &'static str,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/analyze/smart-builder
pub async fn handle_smart_builder(
    State(state): State<AppState>,
    AppJson(request): AppJson<GenerationRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let analysis = generate_from_fields(state.gateway.as_ref(), &request).await?;
    Ok(Json(GenerateResponse {
        success: true,
        analysis,
        message: "Job description generated successfully",
    }))
}

/// POST /api/analyze/manual-entry
pub async fn handle_manual_entry(
    State(state): State<AppState>,
    AppJson(request): AppJson<AnalysisRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let analysis = analyze_text(state.gateway.as_ref(), &request.jd_text).await?;
    Ok(Json(AnalyzeResponse {
        success: true,
        analysis,
        original_text: request.jd_text,
        file_name: None,
        message: "Analysis completed successfully",
    }))
}

/// POST /api/analyze/file-upload
///
/// Multipart form with a single `file` field. Other fields are ignored.
pub async fn handle_file_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(multipart_error)?;
        upload = Some((file_name, content_type, data));
        break;
    }

    let Some((file_name, content_type, data)) = upload else {
        return Err(AppError::Validation("No file uploaded".to_string()));
    };

    let kind = FileKind::detect(&file_name, content_type.as_deref())?;
    info!("Analyzing upload {file_name:?} ({} bytes, {kind:?})", data.len());
    let text = extract_text(data, kind).await?;
    if text.trim().is_empty() {
        return Err(AppError::Validation(
            "File appears to be empty or unreadable".to_string(),
        ));
    }

    let analysis = analyze_text(state.gateway.as_ref(), &text).await?;
    Ok(Json(AnalyzeResponse {
        success: true,
        analysis,
        original_text: text,
        file_name: Some(file_name),
        message: "File analyzed successfully",
    }))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("File exceeds the upload size limit".to_string())
    } else {
        AppError::Validation(e.body_text())
    }
}
