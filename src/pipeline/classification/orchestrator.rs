use std::sync::Arc;

use uuid::Uuid;

use super::adapter::ProviderAdapter;
use super::extractor::extract_verdict;
use super::fallback::synthesize_fallback;
use super::media::HttpMediaFetcher;
use super::ollama::OllamaClient;
use super::policy::HeuristicPolicy;
use super::prompt::build_classification_prompt;
use super::types::{
    ClassificationVerdict, CompletionClient, ContentSubmission, MediaFetcher, VerdictSource,
};
use super::ClassificationError;
use crate::config::ClassifierConfig;

/// Runs the full classification pipeline for one submission:
/// prompt → dispatch → extract, with a deterministic fallback on any failure.
///
/// Holds no per-request state; one instance serves concurrent callers.
pub struct ContentClassifier {
    provider: Option<ProviderAdapter>,
    policy: HeuristicPolicy,
}

impl ContentClassifier {
    /// `provider = None` means the capability is unavailable: every
    /// submission goes straight to the fallback.
    pub fn new(provider: Option<ProviderAdapter>, policy: HeuristicPolicy) -> Self {
        Self { provider, policy }
    }

    /// Wire the given collaborators only if the configuration enables the
    /// capability. Otherwise they are dropped unused.
    pub fn from_config(
        config: &ClassifierConfig,
        client: Arc<dyn CompletionClient + Send + Sync>,
        fetcher: Arc<dyn MediaFetcher + Send + Sync>,
        policy: HeuristicPolicy,
    ) -> Self {
        let provider = config
            .is_configured()
            .then(|| ProviderAdapter::new(client, fetcher));
        Self::new(provider, policy)
    }

    /// Production wiring: Ollama at the configured URL plus an HTTP fetcher.
    pub fn from_env_config(config: &ClassifierConfig, policy: HeuristicPolicy) -> Self {
        let provider = config.provider_url.as_deref().map(|url| {
            ProviderAdapter::new(
                Arc::new(OllamaClient::new(url, &config.model)),
                Arc::new(HttpMediaFetcher::new()),
            )
        });
        Self::new(provider, policy)
    }

    pub fn is_provider_configured(&self) -> bool {
        self.provider.is_some()
    }

    pub fn policy(&self) -> &HeuristicPolicy {
        &self.policy
    }

    /// Classify a submission. Always returns a verdict.
    pub fn classify(&self, submission: &ContentSubmission) -> ClassificationVerdict {
        let submission_id = Uuid::new_v4();
        let _span = tracing::info_span!(
            "classify_content",
            submission_id = %submission_id,
            kind = %submission.kind(),
            content_len = submission.content().len(),
        )
        .entered();
        let start = std::time::Instant::now();

        let verdict = match self.try_provider(submission) {
            Ok(verdict) => verdict,
            Err(ClassificationError::ProviderNotConfigured) => {
                tracing::debug!("Completion provider not configured, using fallback");
                self.fallback(submission)
            }
            Err(e) => {
                tracing::warn!(error_kind = e.kind(), error = %e, "Classification failed, using fallback");
                self.fallback(submission)
            }
        };

        tracing::info!(
            elapsed_ms = %start.elapsed().as_millis(),
            safe = verdict.safe,
            category = %verdict.category,
            confidence = verdict.confidence,
            fallback = verdict.source == VerdictSource::Fallback,
            "Classification complete"
        );
        verdict
    }

    /// Build the prompt, dispatch it, extract a verdict.
    fn try_provider(
        &self,
        submission: &ContentSubmission,
    ) -> Result<ClassificationVerdict, ClassificationError> {
        let provider = self
            .provider
            .as_ref()
            .ok_or(ClassificationError::ProviderNotConfigured)?;

        let prompt = build_classification_prompt(submission.content(), submission.kind());
        let raw = provider.dispatch(&prompt, submission)?;
        extract_verdict(&raw, submission.kind(), &self.policy)
    }

    fn fallback(&self, submission: &ContentSubmission) -> ClassificationVerdict {
        synthesize_fallback(submission.content(), submission.kind(), &self.policy)
    }
}
