use anyhow::{Context, Result};

/// Application configuration loaded once from environment variables at
/// startup and passed into components via `AppState`.
#[derive(Debug, Clone)]
pub struct Config {
    /// OpenRouter credential. Absent means analysis requests fail with a
    /// configuration error; the server still starts.
    pub openrouter_api_key: Option<String>,
    pub openrouter_model: String,
    pub supabase_url: String,
    pub supabase_service_key: String,
    /// Directory for transient upload staging.
    pub upload_dir: String,
    pub port: u16,
    /// When true, a failed audit-log insert aborts the upload request
    /// instead of proceeding with the analysis.
    pub audit_fail_closed: bool,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openrouter_api_key: std::env::var("OPENROUTER_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            openrouter_model: std::env::var("OPENROUTER_MODEL_NAME")
                .unwrap_or_else(|_| "mistralai/mistral-7b-instruct:free".to_string()),
            supabase_url: require_env("SUPABASE_URL")?,
            supabase_service_key: require_env("SUPABASE_SERVICE_KEY")?,
            upload_dir: std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            audit_fail_closed: std::env::var("AUDIT_FAIL_CLOSED")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
