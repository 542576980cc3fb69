pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::contact::handlers::handle_submit_form;
use crate::state::AppState;
use crate::upload::handlers::handle_upload;
use crate::upload::staging::MAX_FILE_SIZE_BYTES;

/// Body limit sits above the file cap so oversized uploads reach the
/// explicit 400 validation path instead of a framework 413.
const BODY_LIMIT_BYTES: usize = MAX_FILE_SIZE_BYTES + 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health::health_handler))
        // Upload pipeline
        .route("/api/upload", post(handle_upload))
        // Contact pipeline
        .route("/submit-form", post(handle_submit_form))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .with_state(state)
}

async fn root_handler() -> &'static str {
    "ResumeLens backend is running!"
}
