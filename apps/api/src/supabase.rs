//! Minimal PostgREST client for the hosted Supabase tables.
//!
//! Only the two operations the pipelines need: insert one row (returning
//! it) and patch a row by id. Upstream errors are decoded into the
//! structured `message`/`code`/`details`/`hint` shape PostgREST emits so
//! the HTTP layer can surface them instead of masking them.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Supabase error (status {status}): {message}")]
    Api {
        status: u16,
        message: String,
        code: Option<String>,
        details: Option<String>,
        hint: Option<String>,
    },

    #[error("Supabase returned no rows for an insert")]
    EmptyResponse,
}

/// PostgREST error body shape.
#[derive(Debug, Deserialize)]
struct PostgrestError {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    hint: Option<String>,
}

#[derive(Clone)]
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    service_key: String,
}

impl SupabaseClient {
    pub fn new(base_url: String, service_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key,
        }
    }

    /// Inserts one row and returns it (`Prefer: return=representation`).
    pub async fn insert(&self, table: &str, row: &Value) -> Result<Value, SupabaseError> {
        let response = self
            .client
            .post(format!("{}/rest/v1/{table}", self.base_url))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("Prefer", "return=representation")
            .json(&[row])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), body));
        }

        let rows: Vec<Value> = response.json().await?;
        rows.into_iter().next().ok_or(SupabaseError::EmptyResponse)
    }

    /// Patches the row with the given primary key (`Prefer: return=minimal`).
    pub async fn update_by_id(
        &self,
        table: &str,
        id: &Value,
        patch: &Value,
    ) -> Result<(), SupabaseError> {
        let response = self
            .client
            .patch(format!(
                "{}/rest/v1/{table}?id=eq.{}",
                self.base_url,
                id_literal(id)
            ))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("Prefer", "return=minimal")
            .json(patch)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), body));
        }
        Ok(())
    }
}

fn api_error(status: u16, body: String) -> SupabaseError {
    match serde_json::from_str::<PostgrestError>(&body) {
        Ok(parsed) => SupabaseError::Api {
            status,
            message: parsed.message.unwrap_or_else(|| body.clone()),
            code: parsed.code,
            details: parsed.details,
            hint: parsed.hint,
        },
        Err(_) => SupabaseError::Api {
            status,
            message: body,
            code: None,
            details: None,
            hint: None,
        },
    }
}

/// Primary keys come back as numbers (serial) or strings (uuid); both embed
/// directly into the `id=eq.` filter.
fn id_literal(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
