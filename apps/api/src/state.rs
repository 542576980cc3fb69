use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::supabase::SupabaseClient;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// The two pipelines (upload and contact) are independent; this is the only
/// thing they share, and nothing in it is mutable across requests.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub llm: LlmClient,
    pub store: SupabaseClient,
}
