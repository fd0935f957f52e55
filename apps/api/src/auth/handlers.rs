//! Email-only sign-in. There are no passwords; the browser keeps the returned
//! user and sends it back in the session headers.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppJson};
use crate::models::session::Session;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AuthRequest {
    pub email: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub user: Session,
    pub message: &'static str,
}

fn required_email(request: &AuthRequest) -> Result<&str, AppError> {
    request
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::Validation("Email is required".to_string()))
}

/// POST /api/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    AppJson(request): AppJson<AuthRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = required_email(&request)?;
    let user = state.store.users.login(email).await?;
    Ok(Json(AuthResponse {
        success: true,
        user: Session::from(&user),
        message: "Login successful",
    }))
}

/// POST /api/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    AppJson(request): AppJson<AuthRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = required_email(&request)?;
    let name = request
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());

    let user = state
        .store
        .users
        .register(email, name)
        .await?
        .ok_or_else(|| AppError::Conflict("User already exists".to_string()))?;

    Ok(Json(AuthResponse {
        success: true,
        user: Session::from(&user),
        message: "Registration successful",
    }))
}
