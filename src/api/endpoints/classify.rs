//! Classification endpoint.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::pipeline::classification::{ClassificationVerdict, ContentKind, ContentSubmission};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyRequest {
    pub content: String,
    pub content_type: ContentKind,
}

/// `POST /api/classify`: classify one submission.
///
/// Malformed bodies and blank content are rejected with a structured 400;
/// everything else yields a verdict. The pipeline does blocking I/O, so it
/// runs on the blocking pool.
pub async fn classify(
    State(ctx): State<ApiContext>,
    payload: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Result<Json<ClassificationVerdict>, ApiError> {
    let Json(req) = payload?;
    let submission = ContentSubmission::new(req.content, req.content_type)?;

    let classifier = Arc::clone(&ctx.classifier);
    let verdict = tokio::task::spawn_blocking(move || classifier.classify(&submission)).await?;

    Ok(Json(verdict))
}
