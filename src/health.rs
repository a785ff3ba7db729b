use axum::{Json, extract::State};
use serde::Serialize;
use tracing::debug;
use utoipa::ToSchema;

use crate::app_state::AppState;

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    status: String,
    llm_model: String,
    /// False when no API key is configured; analysis calls will then fail
    /// against backends that require one.
    llm_configured: bool,
}

/// Liveness only. Neither the LLM backend nor any site is contacted.
#[utoipa::path(
    get,
    path = "/healthz",
    tag = "health",
    responses(
        (status = 200, description = "Health check successful", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    debug!(llm_configured = state.llm_configured, "Health check");
    Json(HealthResponse {
        status: "OK".to_string(),
        llm_model: state.llm_model.clone(),
        llm_configured: state.llm_configured,
    })
}
