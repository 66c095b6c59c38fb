pub mod types;
pub mod policy;
pub mod prompt;
pub mod media;
pub mod ollama;
pub mod adapter;
pub mod analysis;
pub mod confidence;
pub mod extractor;
pub mod fallback;
pub mod orchestrator;

pub use types::*;
pub use policy::*;
pub use prompt::*;
pub use media::*;
pub use ollama::*;
pub use adapter::*;
pub use analysis::*;
pub use confidence::*;
pub use extractor::*;
pub use fallback::*;
pub use orchestrator::*;

use thiserror::Error;

/// Every way a provider round trip can fail.
///
/// None of these reach the caller of `ContentClassifier::classify`; the
/// orchestrator converts each one into a fallback verdict.
#[derive(Error, Debug)]
pub enum ClassificationError {
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("HTTP error (status {status}): {body}")]
    HttpError { status: u16, body: String },

    #[error("Malformed media: {0}")]
    MalformedMedia(String),

    #[error("Malformed provider response: {0}")]
    ProviderMalformedResponse(String),

    #[error("Completion provider is not configured")]
    ProviderNotConfigured,
}

impl ClassificationError {
    /// Stable label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NetworkFailure(_) => "network_failure",
            Self::HttpError { .. } => "http_error",
            Self::MalformedMedia(_) => "malformed_media",
            Self::ProviderMalformedResponse(_) => "provider_malformed_response",
            Self::ProviderNotConfigured => "provider_not_configured",
        }
    }
}
