use std::sync::Arc;

use super::media::{resolve_media, MediaPayload};
use super::types::{CompletionClient, ContentSubmission, MediaFetcher};
use super::ClassificationError;

/// Delivers a prompt (and any media) to the completion capability.
///
/// One media fetch at most, one completion call, no retries.
#[derive(Clone)]
pub struct ProviderAdapter {
    client: Arc<dyn CompletionClient + Send + Sync>,
    fetcher: Arc<dyn MediaFetcher + Send + Sync>,
}

impl ProviderAdapter {
    pub fn new(
        client: Arc<dyn CompletionClient + Send + Sync>,
        fetcher: Arc<dyn MediaFetcher + Send + Sync>,
    ) -> Self {
        Self { client, fetcher }
    }

    /// Send the prompt for `submission` and return the raw completion text.
    pub fn dispatch(
        &self,
        prompt: &str,
        submission: &ContentSubmission,
    ) -> Result<String, ClassificationError> {
        let payload = resolve_media(submission.content(), submission.kind(), self.fetcher.as_ref())?;

        match payload {
            MediaPayload::None => self.client.complete(prompt, None),
            MediaPayload::Inline(media) if !self.client.accepts_media(&media.mime_type) => {
                tracing::debug!(
                    mime = %media.mime_type,
                    "Provider cannot take this media type, sending textual reference"
                );
                let reference = format!(
                    "Inline {} payload of {} base64 characters; the media itself could not be attached.",
                    media.mime_type,
                    media.data_base64.len()
                );
                let prompt = with_description(prompt, submission, &reference);
                self.client.complete(&prompt, None)
            }
            MediaPayload::Inline(media) => {
                tracing::debug!(
                    mime = %media.mime_type,
                    base64_len = media.data_base64.len(),
                    "Attaching inline media"
                );
                self.client.complete(prompt, Some(&media))
            }
            MediaPayload::Description(description) => {
                tracing::debug!(
                    kind = %submission.kind(),
                    "No binary media available, sending textual description"
                );
                let prompt = with_description(prompt, submission, &description);
                self.client.complete(&prompt, None)
            }
        }
    }
}

/// Append the submitter's textual stand-in for media that could not be attached.
fn with_description(prompt: &str, submission: &ContentSubmission, description: &str) -> String {
    format!(
        "{prompt}\n\nThe {kind} itself is not attached. Classify it from this description or reference:\n<content>\n{description}\n</content>",
        kind = submission.kind(),
    )
}
