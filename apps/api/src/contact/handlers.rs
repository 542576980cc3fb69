//! Contact-form submission pipeline: validate, then insert into the hosted
//! `contact_submissions` table with a server-generated timestamp.

use axum::{extract::State, Json};
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;

const CONTACT_TABLE: &str = "contact_submissions";

/// Basic shape check only; deliverability is not our problem.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid"));

#[derive(Debug, Deserialize)]
pub struct ContactSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub message: String,
    /// Identifier of the inserted row, when the table returns one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
}

/// POST /submit-form
pub async fn handle_submit_form(
    State(state): State<AppState>,
    Json(submission): Json<ContactSubmission>,
) -> Result<Json<ContactResponse>, AppError> {
    validate_submission(&submission)?;

    let row = json!({
        "name": submission.name,
        "email": submission.email,
        "message": submission.message,
        "created_at": Utc::now().to_rfc3339(),
    });

    let inserted = state.store.insert(CONTACT_TABLE, &row).await?;
    info!("Contact submission stored");

    Ok(Json(ContactResponse {
        message: "Form submitted successfully and stored.".to_string(),
        id: inserted.get("id").cloned(),
    }))
}

/// Runs before any insert attempt; failures never reach the database.
fn validate_submission(submission: &ContactSubmission) -> Result<(), AppError> {
    if submission.name.trim().is_empty()
        || submission.email.trim().is_empty()
        || submission.message.trim().is_empty()
    {
        return Err(AppError::InvalidSubmission(
            "All fields (name, email, message) are required.".to_string(),
        ));
    }
    if !EMAIL_RE.is_match(submission.email.trim()) {
        return Err(AppError::InvalidSubmission(
            "Invalid email format.".to_string(),
        ));
    }
    Ok(())
}
