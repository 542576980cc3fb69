use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::supabase::SupabaseError;
use crate::upload::extract::ExtractionError;

/// Application-level error type: a closed set of tagged kinds raised
/// explicitly by the pipeline components and mapped exhaustively to HTTP
/// status codes here. No status decision is made anywhere else.
///
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Client-input problem on the upload pipeline: bad file type/size,
    /// malformed multipart request.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Client-input problem on the contact form: missing fields, invalid
    /// email. Kept separate from `Validation` because the contact contract
    /// reports failures under an `error` key, not `message`.
    #[error("Invalid submission: {0}")]
    InvalidSubmission(String),

    /// The uploaded document could not be turned into usable text.
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// A required upstream credential is missing.
    #[error("Service not configured: {0}")]
    ServiceUnconfigured(String),

    /// The analysis call failed: transport error, non-2xx, or malformed response.
    #[error("Analysis failed: {0}")]
    Analysis(String),

    /// Persistence failure from the hosted table service.
    #[error("Database error: {0}")]
    Database(#[from] SupabaseError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "message": msg }))).into_response()
            }
            AppError::InvalidSubmission(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            AppError::Extraction(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "message": msg }))).into_response()
            }
            AppError::ServiceUnconfigured(msg) => {
                tracing::error!("Service misconfigured: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({ "message": msg })),
                )
                    .into_response()
            }
            AppError::Analysis(msg) => {
                tracing::error!("Analysis error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "message": format!("Failed to get analysis from AI service. Details: {msg}")
                    })),
                )
                    .into_response()
            }
            AppError::Database(err) => {
                tracing::error!("Supabase error: {err}");
                let mut body = json!({
                    "error": "Failed to store submission in the database.",
                });
                if let SupabaseError::Api {
                    message,
                    code,
                    hint,
                    ..
                } = &err
                {
                    body["details"] = json!(message);
                    if let Some(code) = code {
                        body["code"] = json!(code);
                    }
                    if let Some(hint) = hint {
                        body["hint"] = json!(hint);
                    }
                } else {
                    body["details"] = json!(err.to_string());
                }
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
            AppError::Internal(err) => {
                tracing::error!("Internal error: {err:?}");
                // Detailed cause only in debug builds; production gets the generic line.
                let message = if cfg!(debug_assertions) {
                    format!("An internal server error occurred: {err}")
                } else {
                    "An internal server error occurred.".to_string()
                };
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": message })),
                )
                    .into_response()
            }
        }
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MissingApiKey => AppError::ServiceUnconfigured(
                "AI service is not configured. Missing API key.".to_string(),
            ),
            other => AppError::Analysis(other.to_string()),
        }
    }
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        AppError::Extraction(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_400() {
        let response = AppError::Validation("missing field".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_contact_validation_body_uses_error_key() {
        let response =
            AppError::InvalidSubmission("All fields (name, email, message) are required.".to_string())
                .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "All fields (name, email, message) are required.");
        assert!(body.get("message").is_none());
    }

    #[test]
    fn test_extraction_maps_to_400() {
        let response = AppError::Extraction("empty document".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unconfigured_service_maps_to_503() {
        let response =
            AppError::ServiceUnconfigured("missing API key".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_analysis_failure_maps_to_500() {
        let response = AppError::Analysis("upstream said no".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_database_failure_maps_to_500() {
        let err = SupabaseError::Api {
            status: 409,
            message: "duplicate key".to_string(),
            code: Some("23505".to_string()),
            details: None,
            hint: None,
        };
        let response = AppError::Database(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_missing_llm_key_converts_to_unconfigured() {
        let err: AppError = LlmError::MissingApiKey.into();
        assert!(matches!(err, AppError::ServiceUnconfigured(_)));
    }

    #[test]
    fn test_llm_api_error_converts_to_analysis() {
        let err: AppError = LlmError::Api {
            status: 502,
            message: "bad gateway".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::Analysis(_)));
    }
}
