//! Axum handler for the resume upload pipeline.
//!
//! Straight-line sequence, no retries, no cancellation: validate → stage →
//! audit log → extract → truncate → analyze → respond. The staged file is
//! removed on every exit path via `StagedFile`'s drop guard.

use std::path::Path;

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use crate::analysis::{
    self,
    result::ResumeAnalysis,
    truncation::{ContentBudget, TruncationInfo},
};
use crate::errors::AppError;
use crate::state::AppState;
use crate::supabase::SupabaseClient;
use crate::upload::extract;
use crate::upload::staging::{validate_upload, StagedFile};

const AUDIT_TABLE: &str = "upload_logs";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    pub file_name: String,
    pub analysis: ResumeAnalysis,
    /// Present only when input had to be cut to fit the analysis budget.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncation_info: Option<TruncationInfo>,
    /// `null` when the audit insert failed and the request proceeded fail-open.
    pub log_id: Option<serde_json::Value>,
}

struct UploadFields {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
    job_description: Option<String>,
}

/// POST /api/upload
///
/// Multipart form with `resumeFile` (binary, required) and `jobDescription`
/// (text, optional).
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let fields = read_multipart(multipart).await?;

    validate_upload(&fields.content_type, fields.bytes.len())?;

    let staged = StagedFile::stage(
        Path::new(&state.config.upload_dir),
        &fields.file_name,
        &fields.bytes,
    )
    .await?;

    let log_id = record_upload(&state, &fields).await?;

    let extracted = {
        let path = staged.path().to_path_buf();
        let content_type = fields.content_type.clone();
        tokio::task::spawn_blocking(move || extract::extract_text(&path, &content_type))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Extraction task panicked: {e}")))?
    };

    let text = match extracted {
        Ok(text) => text,
        Err(e) => {
            finish_log(&state.store, &log_id, "error").await;
            return Err(e.into());
        }
    };
    info!(
        "Extracted {} characters from {}",
        text.chars().count(),
        fields.file_name
    );

    let budgeted = ContentBudget::default().apply(&text, fields.job_description.as_deref());
    if let Some(truncation) = &budgeted.truncation {
        info!("Input truncated to fit the analysis budget: {truncation:?}");
    }

    let analysis = match analysis::analyze_resume(
        &state.llm,
        &budgeted.resume_text,
        budgeted.job_description.as_deref(),
    )
    .await
    {
        Ok(analysis) => analysis,
        Err(e) => {
            finish_log(&state.store, &log_id, "error").await;
            return Err(e);
        }
    };

    finish_log(&state.store, &log_id, "analyzed").await;

    Ok(Json(UploadResponse {
        message: "Resume analyzed successfully.".to_string(),
        file_name: fields.file_name,
        analysis,
        truncation_info: budgeted.truncation,
        log_id,
    }))
}

/// Collects the expected multipart fields. Exactly one file field is
/// accepted; unknown fields are ignored.
async fn read_multipart(mut multipart: Multipart) -> Result<UploadFields, AppError> {
    let mut file: Option<(String, String, Vec<u8>)> = None;
    let mut job_description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart request: {e}")))?
    {
        match field.name() {
            Some("resumeFile") => {
                let file_name = field.file_name().unwrap_or("resume").to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read uploaded file: {e}"))
                })?;
                file = Some((file_name, content_type, bytes.to_vec()));
            }
            Some("jobDescription") => {
                let text = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read job description: {e}"))
                })?;
                if !text.trim().is_empty() {
                    job_description = Some(text);
                }
            }
            _ => {}
        }
    }

    let (file_name, content_type, bytes) =
        file.ok_or_else(|| AppError::Validation("No resume file uploaded.".to_string()))?;

    Ok(UploadFields {
        file_name,
        content_type,
        bytes,
        job_description,
    })
}

/// Inserts the audit row. Failure is non-fatal (logged, analysis proceeds)
/// unless `audit_fail_closed` is set.
async fn record_upload(
    state: &AppState,
    fields: &UploadFields,
) -> Result<Option<serde_json::Value>, AppError> {
    let jd_length = fields
        .job_description
        .as_deref()
        .map(|jd| jd.chars().count())
        .unwrap_or(0);
    let row = json!({
        "file_name": fields.file_name,
        "file_type": fields.content_type,
        "file_size_bytes": fields.bytes.len(),
        "job_description_provided": fields.job_description.is_some(),
        "job_description_length": jd_length,
        "status": "uploaded",
    });

    match state.store.insert(AUDIT_TABLE, &row).await {
        Ok(inserted) => Ok(inserted.get("id").cloned()),
        Err(e) if state.config.audit_fail_closed => Err(e.into()),
        Err(e) => {
            warn!("Failed to log upload, proceeding with analysis: {e}");
            Ok(None)
        }
    }
}

/// Best-effort status update on the audit row.
async fn finish_log(store: &SupabaseClient, log_id: &Option<serde_json::Value>, status: &str) {
    let Some(id) = log_id else { return };
    if let Err(e) = store
        .update_by_id(AUDIT_TABLE, id, &json!({ "status": status }))
        .await
    {
        warn!("Failed to update upload log status to '{status}': {e}");
    }
}
