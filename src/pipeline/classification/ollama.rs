use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use serde::Serialize;

use super::types::{CompletionClient, InlineMedia};
use super::ClassificationError;

/// Ollama HTTP client used as the completion capability.
///
/// Requests go to `/api/chat` so that vision models receive attached images.
/// No request timeout is set; cancellation belongs to the caller.
pub struct OllamaClient {
    base_url: String,
    model: String,
    client: reqwest::blocking::Client,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Request body for Ollama `/api/chat`.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
    /// Base64-encoded images (user message only).
    #[serde(skip_serializing_if = "Option::is_none")]
    images: Option<Vec<&'a str>>,
}

/// Sampling options. Temperature is kept low.
#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f32,
}

impl<'a> ChatRequest<'a> {
    fn new(model: &'a str, prompt: &'a str, media: Option<&'a InlineMedia>) -> Self {
        Self {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
                images: media.map(|m| vec![m.data_base64.as_str()]),
            }],
            stream: false,
            options: ChatOptions { temperature: 0.1 },
        }
    }
}

/// Pull `message.content` out of a `/api/chat` response body.
fn extract_chat_content(body: &serde_json::Value) -> Result<String, ClassificationError> {
    body.get("message")
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(str::to_string)
        .ok_or_else(|| {
            ClassificationError::ProviderMalformedResponse(
                "Response has no message.content".into(),
            )
        })
}

impl CompletionClient for OllamaClient {
    fn complete(
        &self,
        prompt: &str,
        media: Option<&InlineMedia>,
    ) -> Result<String, ClassificationError> {
        let url = format!("{}/api/chat", self.base_url);
        let body = ChatRequest::new(&self.model, prompt, media);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    ClassificationError::NetworkFailure(format!(
                        "Cannot reach completion provider at {}",
                        self.base_url
                    ))
                } else {
                    ClassificationError::NetworkFailure(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ClassificationError::HttpError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: serde_json::Value = response
            .json()
            .map_err(|e| ClassificationError::ProviderMalformedResponse(e.to_string()))?;

        extract_chat_content(&parsed)
    }

    /// `/api/chat` carries images only.
    fn accepts_media(&self, mime_type: &str) -> bool {
        mime_type.starts_with("image/")
    }
}

// ──────────────────────────────────────────────
// MockCompletionClient (testing)
// ──────────────────────────────────────────────

/// Mock completion client. Returns a configurable response and counts calls.
pub struct MockCompletionClient {
    response: String,
    failure: Option<fn() -> ClassificationError>,
    image_only: bool,
    calls: AtomicUsize,
    last_request: Mutex<Option<(String, Option<InlineMedia>)>>,
}

impl MockCompletionClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            failure: None,
            image_only: false,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Every call fails with the error produced by `failure`.
    pub fn failing(failure: fn() -> ClassificationError) -> Self {
        Self {
            failure: Some(failure),
            ..Self::new("")
        }
    }

    /// Accepts image media only, like `OllamaClient`.
    pub fn image_only(response: &str) -> Self {
        Self {
            image_only: true,
            ..Self::new(response)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompt and media of the most recent call.
    pub fn last_request(&self) -> Option<(String, Option<InlineMedia>)> {
        self.last_request.lock().ok()?.clone()
    }
}

impl CompletionClient for MockCompletionClient {
    fn complete(
        &self,
        prompt: &str,
        media: Option<&InlineMedia>,
    ) -> Result<String, ClassificationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some((prompt.to_string(), media.cloned()));
        }
        match self.failure {
            Some(failure) => Err(failure()),
            None => Ok(self.response.clone()),
        }
    }

    fn accepts_media(&self, mime_type: &str) -> bool {
        !self.image_only || mime_type.starts_with("image/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ollama_client_trims_trailing_slash() {
        let client = OllamaClient::new("http://localhost:11434/", "llava:7b");
        assert_eq!(client.base_url, "http://localhost:11434");
        assert_eq!(client.model(), "llava:7b");
    }

    #[test]
    fn chat_request_without_media_omits_images() {
        let req = ChatRequest::new("m", "classify this", None);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["model"], "m");
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "classify this");
        assert!(json["messages"][0].get("images").is_none());
    }

    #[test]
    fn chat_request_with_media_attaches_base64() {
        let media = InlineMedia {
            mime_type: "image/png".into(),
            data_base64: "aGVsbG8=".into(),
        };
        let req = ChatRequest::new("m", "p", Some(&media));
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["messages"][0]["images"][0], "aGVsbG8=");
    }

    #[test]
    fn ollama_accepts_images_only() {
        let client = OllamaClient::new("http://localhost:11434", "llava:7b");
        assert!(client.accepts_media("image/png"));
        assert!(!client.accepts_media("video/mp4"));
    }

    #[test]
    fn extracts_message_content() {
        let body = serde_json::json!({
            "model": "m",
            "message": {"role": "assistant", "content": "Overall Assessment: safe"},
            "done": true
        });
        assert_eq!(extract_chat_content(&body).unwrap(), "Overall Assessment: safe");
    }

    #[test]
    fn missing_content_is_malformed_response() {
        let body = serde_json::json!({"error": "model not found"});
        assert!(matches!(
            extract_chat_content(&body),
            Err(ClassificationError::ProviderMalformedResponse(_))
        ));
    }

    #[test]
    fn mock_counts_calls_and_records_request() {
        let mock = MockCompletionClient::new("fine");
        assert_eq!(mock.calls(), 0);
        assert_eq!(mock.complete("prompt", None).unwrap(), "fine");
        assert_eq!(mock.calls(), 1);
        let (prompt, media) = mock.last_request().unwrap();
        assert_eq!(prompt, "prompt");
        assert!(media.is_none());
    }

    #[test]
    fn failing_mock_returns_error() {
        let mock = MockCompletionClient::failing(|| ClassificationError::HttpError {
            status: 500,
            body: "boom".into(),
        });
        assert!(matches!(
            mock.complete("p", None),
            Err(ClassificationError::HttpError { status: 500, .. })
        ));
        assert_eq!(mock.calls(), 1);
    }
}
