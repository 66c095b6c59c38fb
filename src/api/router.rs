//! Classification API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::pipeline::classification::{ContentClassifier, MAX_INLINE_MEDIA_BASE64};

/// Request body cap: the largest inline media payload plus JSON envelope.
pub const MAX_REQUEST_BODY_BYTES: usize = MAX_INLINE_MEDIA_BASE64 + 64 * 1024;

/// Build the API router around a shared classifier.
pub fn classification_router(classifier: Arc<ContentClassifier>) -> Router {
    build_router(ApiContext::new(classifier))
}

fn build_router(ctx: ApiContext) -> Router {
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/classify", post(endpoints::classify::classify))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .with_state(ctx);

    Router::new().nest("/api", api)
}
