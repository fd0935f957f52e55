pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::generation::handlers as analyze;
use crate::jobs::handlers as jobs;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/api/health", get(health::health_handler))
        // Auth
        .route("/api/auth/login", post(auth::handle_login))
        .route("/api/auth/register", post(auth::handle_register))
        // Analyze
        .route(
            "/api/analyze/smart-builder",
            post(analyze::handle_smart_builder),
        )
        .route(
            "/api/analyze/manual-entry",
            post(analyze::handle_manual_entry),
        )
        .route(
            "/api/analyze/file-upload",
            post(analyze::handle_file_upload).layer(upload_limit),
        )
        // Jobs
        .route(
            "/api/jobs",
            post(jobs::handle_create_job).get(jobs::handle_list_jobs),
        )
        .route(
            "/api/jobs/:id",
            get(jobs::handle_get_job)
                .put(jobs::handle_update_job)
                .delete(jobs::handle_delete_job),
        )
        .with_state(state)
}
