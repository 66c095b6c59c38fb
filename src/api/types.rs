//! Shared types for the API layer.

use std::sync::Arc;

use crate::pipeline::classification::ContentClassifier;

/// Shared context for all API routes.
#[derive(Clone)]
pub struct ApiContext {
    pub classifier: Arc<ContentClassifier>,
    /// When the server started (ISO 8601).
    pub started_at: String,
}

impl ApiContext {
    pub fn new(classifier: Arc<ContentClassifier>) -> Self {
        Self {
            classifier,
            started_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
