//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub provider_configured: bool,
    pub version: &'static str,
    pub started_at: String,
}

/// `GET /api/health`: liveness plus whether the completion provider is wired.
pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        provider_configured: ctx.classifier.is_provider_configured(),
        version: crate::config::APP_VERSION,
        started_at: ctx.started_at.clone(),
    })
}
